use std::path::PathBuf;

use thiserror::Error;

/// Failure of a call against the Q&A service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status. `message` is the
    /// server-provided detail when there was one, else a generic text.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The request never produced a usable response (connection refused,
    /// timeout, undecodable body).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Cannot write token file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },

    #[error("No data directory available; set ASK_TOKEN_PATH")]
    NoDataDir,
}
