use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::token_store::TOKEN_KEY;

/// Origin of the Q&A API.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub token_path: PathBuf,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Read `ASK_API_URL`, `ASK_TOKEN_PATH` and `ASK_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("ASK_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.into())
            .trim_end_matches('/')
            .to_string();

        let token_path = match lookup("ASK_TOKEN_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_token_path()?,
        };

        let timeout = Duration::from_secs(parse_or(&lookup, "ASK_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?);

        Ok(Self {
            api_url,
            token_path,
            timeout,
        })
    }
}

/// Parse `key` from `lookup`, falling back to `default` when it is unset.
pub fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn default_token_path() -> Result<PathBuf, ConfigError> {
    let base = dirs::data_local_dir().ok_or(ConfigError::NoDataDir)?;
    Ok(base.join("ask").join(TOKEN_KEY))
}
