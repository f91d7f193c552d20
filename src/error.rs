//! Error types for the csv-pager service

use thiserror::Error;

/// Result type alias for pager operations
pub type Result<T> = std::result::Result<T, PagerError>;

/// Error types that can occur while serving a paginated read
#[derive(Error, Debug, Clone)]
pub enum PagerError {
    #[error("{0}")]
    Validation(String),

    #[error("No records found")]
    NotFound,

    #[error("Mandatory headers are missing")]
    SchemaError,

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Network timeout: {0}")]
    Timeout(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for PagerError {
    fn from(err: std::io::Error) -> Self {
        PagerError::IoError(err.to_string())
    }
}

impl From<csv_async::Error> for PagerError {
    fn from(err: csv_async::Error) -> Self {
        PagerError::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for PagerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PagerError::Timeout(err.to_string())
        } else {
            PagerError::Fetch(err.to_string())
        }
    }
}

impl PagerError {
    /// Convert error to HTTP status code
    ///
    /// Validation and schema failures are the caller's to fix (400), an empty
    /// windowed result is 404, and anything that went wrong between this
    /// service and the origin is 500.
    pub fn to_http_status(&self) -> u16 {
        match self {
            PagerError::Validation(_) => 400,
            PagerError::SchemaError => 400,

            PagerError::NotFound => 404,

            PagerError::Fetch(_) => 500,
            PagerError::Timeout(_) => 500,
            PagerError::Parse(_) => 500,

            // Cache errors never reach a response in practice (reads degrade
            // to a miss, writes are logged and dropped), but map them anyway.
            PagerError::Cache(_) => 500,
            PagerError::ConfigError(_) => 500,
            PagerError::IoError(_) => 500,
        }
    }

    /// Determine if this error may be swallowed by degrading the cache
    ///
    /// Returns true only for cache-store failures: a failed read is treated
    /// as a miss and a failed write still returns the computed page. Every
    /// other error must surface to the caller.
    pub fn is_cache_degradable(&self) -> bool {
        matches!(self, PagerError::Cache(_))
    }

    /// Create a validation error with the given message
    pub fn validation(message: impl Into<String>) -> Self {
        PagerError::Validation(message.into())
    }

    /// Create an upstream error from an HTTP status code returned by the origin
    pub fn from_origin_status(status: u16) -> Self {
        PagerError::Fetch(format!("origin returned status {}", status))
    }
}
