use thiserror::Error;
use unminify_surface::textual::ParseError;
use unminify_transforms::TransformError;

#[derive(Error, Debug)]
pub enum UnminifyError {
    #[error("{0}")]
    ParseError(#[from] ParseError),
    #[error("{0}")]
    TransformError(#[from] TransformError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid configuration file: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("{0}")]
    ConfError(#[from] ConfError),
}

/// Mistakes at the boundary: what was asked for does not exist or was not given.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ConfError {
    #[error(
        "Unknown safety level `{0}`; expected one of useless, safe, mostly-safe, unsafe, wildly-unsafe or 0-4"
    )]
    UnknownSafety(String),
    #[error("Unknown transform `{0}`")]
    UnknownTransform(String),
    #[error("Missing required input file parameter")]
    MissingInput,
}

pub type Result<T> = std::result::Result<T, UnminifyError>;
