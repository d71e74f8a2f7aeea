use serde::{Deserialize, Serialize};
use crate::helpers::config_helper::ConfigHelper;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClientConfig {
    #[serde(default = "ConfigHelper::default_server_url")]
    pub server_url: String,

    #[serde(default = "ConfigHelper::default_web_base_url")]
    pub web_base_url: String,

    #[serde(default = "ConfigHelper::default_timeout_minutes")]
    pub timeout_minutes: u64,

    #[serde(default = "ConfigHelper::default_results_dir")]
    pub results_dir: String,

    #[serde(default)]
    pub open_browser: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: ConfigHelper::default_server_url(),
            web_base_url: ConfigHelper::default_web_base_url(),
            timeout_minutes: ConfigHelper::default_timeout_minutes(),
            results_dir: ConfigHelper::default_results_dir(),
            open_browser: false,
        }
    }
}
