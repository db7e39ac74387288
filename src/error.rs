use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TMDB credential is absent. Remote data cannot be loaded at all.
    #[error("TMDB_API_KEY is not set")]
    MissingApiKey,

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Errors that can occur when talking to the remote catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Client not configured (missing API key, rejected key).
    #[error("Catalog client not configured: {0}")]
    NotConfigured(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl CatalogError {
    /// True for failures that retrying cannot fix until the configuration changes.
    pub fn is_configuration(&self) -> bool {
        matches!(self, CatalogError::NotConfigured(_))
    }
}

/// Errors from the durable liked-list slot.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O failed at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode liked list: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("In-memory slot is unusable after a panic")]
    Poisoned,
}
