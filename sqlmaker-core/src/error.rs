//! Error types for sqlmaker

use thiserror::Error;

/// The main error type for statement compilation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A value had a shape the compiler cannot handle at that position
    #[error("Unknown type: {message}")]
    UnknownType { message: String },

    /// A value had the right shape but unusable content
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

/// Convenience Result type for sqlmaker operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new unknown type error
    pub fn unknown_type(message: impl Into<String>) -> Self {
        Self::UnknownType {
            message: message.into(),
        }
    }

    /// Create a new invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Whether this error came from shape dispatch
    pub fn is_unknown_type(&self) -> bool {
        matches!(self, Self::UnknownType { .. })
    }

    /// Whether this error came from argument validation
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
