use thiserror::Error;

/// A pattern a pass refuses to rewrite rather than rewrite wrongly.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum TransformError {
    #[error("[{pass}] unsupported construct: {construct}")]
    Unsupported { pass: &'static str, construct: String },
}

pub type Result<T> = std::result::Result<T, TransformError>;
