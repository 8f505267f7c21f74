use thiserror::Error;

#[derive(Error, Debug)]
pub enum PptxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(String),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("template has no slide layouts")]
    NoLayouts,

    #[error("template presentation.xml is not a presentation part")]
    UnusableTemplate,
}

impl PptxError {
    pub(crate) fn zip(err: impl std::fmt::Display) -> Self {
        Self::Zip(err.to_string())
    }

    pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
        Self::Xml(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PptxError>;
