//! Client side of the Q&A service: the HTTP API, the persisted session token,
//! and the settings that point them somewhere.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod token_store;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, StoreError};
pub use http::HttpApiClient;
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
