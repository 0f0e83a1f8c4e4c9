//! Error types.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TspError>;

/// Errors raised by the search engine and its reporting helpers.
///
/// Configuration and malformed-tour errors abort the current run before
/// (or instead of) producing a result. I/O and CSV errors only come from
/// the [`report`](crate::report) writers and never touch in-memory search
/// state.
#[derive(Error, Debug)]
pub enum TspError {
    /// Invalid parameter combination, detected before a search loop starts.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A sequence that is not a closed permutation of all nodes, or whose
    /// cached cost disagrees with the distance matrix.
    #[error("malformed tour: {0}")]
    MalformedTour(String),

    /// I/O failure while persisting results.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failure while persisting results.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl TspError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        TspError::Configuration(msg.into())
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        TspError::MalformedTour(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = TspError::config("alpha must be in (0, 1]");
        assert_eq!(
            err.to_string(),
            "invalid configuration: alpha must be in (0, 1]"
        );

        let err = TspError::malformed("node 3 appears twice");
        assert_eq!(err.to_string(), "malformed tour: node 3 appears twice");
    }

    #[test]
    fn test_io_conversion() {
        fn fails() -> Result<()> {
            let io: std::io::Result<()> = Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            ));
            io?;
            Ok(())
        }
        assert!(matches!(fails(), Err(TspError::Io(_))));
    }
}
