use serde::{Deserialize, Serialize};
use crate::helpers::config_helper::ConfigHelper;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreConfig {
    #[serde(default)]
    pub redis_rest_url: Option<String>,

    #[serde(default)]
    pub redis_rest_token: Option<String>,

    #[serde(default = "ConfigHelper::default_progress_ttl_secs")]
    pub ttl_secs: u64,
}

impl StoreConfig {
    /// Both halves of the remote cache credentials, when present and non-empty.
    pub fn redis_credentials(&self) -> Option<(&str, &str)> {
        let url = self.redis_rest_url.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let token = self.redis_rest_token.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some((url, token))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            redis_rest_url: None,
            redis_rest_token: None,
            ttl_secs: ConfigHelper::default_progress_ttl_secs(),
        }
    }
}
