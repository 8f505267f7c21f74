//! Presentation writer: renders a normalized outline into a .pptx file,
//! either from a built-in blank deck or on top of a user template's
//! layouts. The document is modeled as an explicit slide/shape tree so
//! structural edits (placeholder removal, title injection) are testable
//! without touching XML or zip.

pub mod error;
pub mod model;
pub mod package;
pub mod render;
pub mod template;
pub mod writer;
mod xml;

pub use error::{PptxError, Result};
pub use template::{inspect_template, LayoutInfo, TemplateInfo};
pub use writer::PptWriter;
