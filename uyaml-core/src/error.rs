//! Error types for UYAML parsing and writing

use std::io;
use thiserror::Error;

/// Result type alias for UYAML operations
pub type Result<T> = std::result::Result<T, UyamlError>;

/// Main error type for UYAML operations
#[derive(Error, Debug)]
pub enum UyamlError {
    /// IO errors when reading/writing files
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Structural parse error. `position` is the byte offset into the parsed
    /// text of the logical line that failed.
    #[error("{message}. (char @{position})")]
    Parse { message: String, position: usize },

    /// Document-level format errors (missing paths, bad arguments, ...)
    #[error("Format error: {0}")]
    Format(String),

    /// A component looked up by file id does not exist
    #[error("No component with fileID {file_id}")]
    ComponentNotFound { file_id: i64 },
}

impl UyamlError {
    /// Create a parse error at the given byte offset
    pub fn parse<S: Into<String>>(message: S, position: usize) -> Self {
        Self::Parse {
            message: message.into(),
            position,
        }
    }

    /// Create a format error
    pub fn format<S: Into<String>>(message: S) -> Self {
        Self::Format(message.into())
    }

    /// Byte offset of a parse error, if this is one
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Parse { position, .. } => Some(*position),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = UyamlError::format("test message");
        assert!(matches!(err, UyamlError::Format(_)));
        assert_eq!(err.position(), None);
    }

    #[test]
    fn test_parse_error_display() {
        let err = UyamlError::parse("Expecting 3 parts in the block header", 42);
        assert_eq!(err.position(), Some(42));
        assert_eq!(
            err.to_string(),
            "Expecting 3 parts in the block header. (char @42)"
        );
    }

    #[test]
    fn test_io_conversion() {
        let err: UyamlError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(err.to_string().contains("gone"));
    }
}
