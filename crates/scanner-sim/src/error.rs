use thiserror::Error;

/// The result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The report could not be sent or its acknowledgement not read.
    #[error("report request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The collector rejected the report.
    #[error("collector returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The collector URL could not be joined with the occupancy path.
    #[error("invalid collector url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
