use ask_client::{ApiError, StoreError};
use thiserror::Error;

/// Failure of a session operation, shown to the user by whoever called it.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Rejected locally before any request was made.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
