use thiserror::Error;

/// The result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never completed.
    #[error("status request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("status endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The body was not a JSON array of node readings.
    #[error("malformed status body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The collector URL could not be joined with the status path.
    #[error("invalid collector url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The global log subscriber could not be installed.
    #[error("failed to initialize logging: {0}")]
    Logging(String),

    /// Terminal or log file I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
