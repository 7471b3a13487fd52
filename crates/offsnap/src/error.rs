use reqwest::StatusCode;

/// Error type for a whole resolution/build cycle.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("manifest fetch for {url} returned status {status}")]
    ManifestFetch { url: String, status: StatusCode },

    #[error("invalid URL: {0}")]
    UrlError(String),

    #[error("snapshot store error: {0}")]
    Store(#[from] std::io::Error),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Failure of a single resource fetch. Network-level failures carry no
/// response at all; the retention policy turns them into fallbacks.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

/// Errors surfaced by the version ledger and its key-value store.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("ledger serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
