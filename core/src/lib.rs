//! Orchestration: planner seam, outline normalization, and the
//! topic-to-file pipeline shared by the CLI and the interactive shell.

pub mod formatter;
pub mod pipeline;
pub mod planner;

pub use formatter::format_content;
pub use pipeline::{generate, write_outline, GenerateRequest, TemplateSource};
pub use planner::{ContentPlanner, OutlineSource};
