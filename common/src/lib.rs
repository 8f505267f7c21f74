pub mod config;
pub mod types;

pub use config::{Config, Style};
pub use types::{
    Fact, FactLine, MainPoint, NormalizedOutline, NormalizedPoint, NormalizedSlide, SlideOutline,
    SlidePlan,
};
