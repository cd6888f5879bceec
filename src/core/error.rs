// Error handling for the TRS codec

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrsError>;

#[derive(Error, Debug)]
pub enum TrsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or unsupported content in the file or in a value being encoded.
    #[error("TRS format error: {0}")]
    Format(String),

    /// Wrong session mode, out-of-range index, or an invalid value handed in by the caller.
    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(
        "Error reading TRS file: file size ({file_size}) != meta data ({header_size}) + trace size ({record_size}) * nr of traces ({trace_count})"
    )]
    Consistency {
        file_size: u64,
        header_size: u64,
        record_size: u64,
        trace_count: u64,
    },

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Parameter {key} holds a {actual} value, not a {expected} value")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Invalid UTF-8 string")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

impl TrsError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        TrsError::Format(msg.into())
    }

    pub(crate) fn argument(msg: impl Into<String>) -> Self {
        TrsError::Argument(msg.into())
    }

    pub fn is_format(&self) -> bool {
        matches!(self, TrsError::Format(_) | TrsError::InvalidUtf8(_))
    }

    pub fn is_argument(&self) -> bool {
        matches!(self, TrsError::Argument(_) | TrsError::TypeMismatch { .. })
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, TrsError::Unsupported(_))
    }
}
