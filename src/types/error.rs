use thiserror::Error;

/// watchfinder error types
#[derive(Error, Debug)]
pub enum WatchfinderError {
    /// Transport-level HTTP failure (connect, timeout, TLS)
    #[error("http error: {0}")]
    Http(String),

    /// Upstream answered with a non-success status
    #[error("upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Requested title does not exist upstream
    #[error("content not found")]
    NotFound,

    /// Upstream rejected the API key
    #[error("api authentication failed")]
    Auth,

    /// Upstream asked us to slow down
    #[error("too many requests, try again later")]
    RateLimited,

    /// Search query rejected before sending
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Failed to parse a response body
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for WatchfinderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            WatchfinderError::Parse(err.to_string())
        } else {
            WatchfinderError::Http(err.to_string())
        }
    }
}

/// Result type alias for watchfinder
pub type Result<T> = std::result::Result<T, WatchfinderError>;
