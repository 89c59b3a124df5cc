//! echotext error types.

use std::fmt;

#[derive(Debug, Clone)]
pub enum EchoError {
    /// Invalid reservoir/experiment parameters or CLI arguments.
    Config(String),
    /// A document produced unusable data (e.g. empty after filtering).
    Data(String),
    DimensionMismatch { expected: usize, got: usize },
    Io(String),
}

impl fmt::Display for EchoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "ConfigError: {msg}"),
            Self::Data(msg) => write!(f, "DataError: {msg}"),
            Self::DimensionMismatch { expected, got } => {
                write!(f, "DimensionMismatch: expected {expected}, got {got}")
            }
            Self::Io(msg) => write!(f, "IoError: {msg}"),
        }
    }
}

impl std::error::Error for EchoError {}

impl From<std::io::Error> for EchoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for EchoError {
    fn from(e: serde_json::Error) -> Self {
        Self::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EchoError>;
