use std::time::Duration;

use ask_client::config::parse_or;
use ask_client::{ClientConfig, ConfigError};
use ask_core::ChatConfig;
use ask_core::chat::{DEFAULT_HISTORY_LIMIT, DEFAULT_REVEAL_STEP};

pub struct Settings {
    pub client: ClientConfig,
    pub chat: ChatConfig,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let lookup = |key: &str| std::env::var(key).ok();

        let client = ClientConfig::from_lookup(lookup)?;
        let default_step = DEFAULT_REVEAL_STEP.as_millis() as u64;
        let chat = ChatConfig {
            reveal_step: Duration::from_millis(parse_or(&lookup, "ASK_REVEAL_STEP_MS", default_step)?),
            reveal_errors: parse_or(&lookup, "ASK_REVEAL_ERRORS", true)?,
            history_limit: parse_or(&lookup, "ASK_HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT)?,
        };

        Ok(Self { client, chat })
    }
}
