//! Error types for fileshelf.

use thiserror::Error;

/// Common error type for fileshelf.
#[derive(Error, Debug)]
pub enum ShelfError {
    /// Database error.
    ///
    /// Wraps any failure surfaced by the underlying query layer. These are
    /// propagated unchanged; the crate performs no retries of its own.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An empty or otherwise unusable path was given to the resolver.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Resource not found. An expected outcome, not a defect.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Redirect table failed validation.
    #[error("redirect table error: {0}")]
    Redirects(String),
}

impl From<sqlx::Error> for ShelfError {
    fn from(e: sqlx::Error) -> Self {
        ShelfError::Database(e.to_string())
    }
}

/// Result type alias for fileshelf operations.
pub type Result<T> = std::result::Result<T, ShelfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = ShelfError::NotFound("file".to_string());
        assert_eq!(err.to_string(), "file not found");
    }

    #[test]
    fn test_invalid_path_display() {
        let err = ShelfError::InvalidPath("empty segment list".to_string());
        assert_eq!(err.to_string(), "invalid path: empty segment list");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: ShelfError = io_err.into();
        assert!(matches!(err, ShelfError::Io(_)));
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn test_redirects_display() {
        let err = ShelfError::Redirects("circular redirect".to_string());
        assert_eq!(err.to_string(), "redirect table error: circular redirect");
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(7)
        }

        fn sample_err() -> Result<i32> {
            Err(ShelfError::Config("bad".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 7);
        assert!(sample_err().is_err());
    }
}
