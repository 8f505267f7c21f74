//! Terminal front end: a small form for topic/pages/style, then a
//! slide-by-slide preview of the planned outline before anything is
//! written to disk.

pub mod interactive;
pub mod preview;

pub use interactive::run_interactive;
pub use preview::SlidePreview;
