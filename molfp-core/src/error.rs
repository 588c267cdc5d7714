//! Structured error types for the molfp workspace.

use thiserror::Error;

/// Unified error type for all molfp operations.
#[derive(Debug, Error)]
pub enum MolfpError {
    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error (malformed SMILES or other input data)
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Tabular read or write failure
    #[error("csv error: {0}")]
    Csv(String),

    /// Malformed or unreadable configuration
    #[error("config error: {0}")]
    Config(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl MolfpError {
    /// Whether this error came from parsing a molecule or other input text.
    pub fn is_parse(&self) -> bool {
        matches!(self, MolfpError::Parse(_))
    }
}

/// Convenience alias used throughout the molfp workspace.
pub type Result<T> = std::result::Result<T, MolfpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind() {
        let err = MolfpError::Parse("unexpected character 'X' at position 0".into());
        assert_eq!(
            err.to_string(),
            "parse error: unexpected character 'X' at position 0"
        );
        assert!(err.is_parse());
        assert!(!MolfpError::InvalidInput("width".into()).is_parse());
    }

    #[test]
    fn io_errors_convert() {
        fn open() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv"))?;
            Ok(())
        }
        assert!(matches!(open(), Err(MolfpError::Io(_))));
    }
}
