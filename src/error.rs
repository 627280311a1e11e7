//! Error types shared by every layer of the crate

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Wrong command-line usage
    #[error("invalid arguments: {0}")]
    Argument(String),

    /// Malformed text: JSON, point literal, field literal, integer
    #[error("cannot parse {input:?}: {reason}")]
    Parse { input: String, reason: String },

    /// Coordinates parse but do not satisfy the curve equation
    #[error("point {coordinates} is not on {curve}")]
    InvalidPoint { coordinates: String, curve: String },

    #[error("singular curve: {0}")]
    SingularCurve(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid field: {0}")]
    InvalidField(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("points belong to different curves")]
    CurveMismatch,

    #[error("invalid key material: {0}")]
    InvalidKey(String),

    #[error("invalid scalar: {0}")]
    InvalidScalar(String),

    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
