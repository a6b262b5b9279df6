use reqwest::StatusCode;
use thiserror::Error;

/// Typed outcome of a manifest fetch. The cache layer recovers all of
/// these; callers of the query surface never see them directly.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error talking to the license server: {0}")]
    Network(#[source] reqwest::Error),

    #[error("license server answered with HTTP {0}")]
    Http(StatusCode),

    #[error("manifest body is not a JSON record array: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("an I/O error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed cache file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level failure for the stand-alone driver.
#[derive(Debug, Error)]
pub enum UpdateManagerError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
