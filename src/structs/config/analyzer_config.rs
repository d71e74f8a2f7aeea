use serde::{Deserialize, Serialize};
use crate::helpers::config_helper::ConfigHelper;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AnalyzerConfig {
    #[serde(default = "ConfigHelper::default_analyzer_url")]
    pub url: String,

    #[serde(default = "ConfigHelper::default_max_repositories")]
    pub max_repositories: usize,

    #[serde(default = "ConfigHelper::default_max_files")]
    pub max_files: u32,

    #[serde(default = "ConfigHelper::default_analyzer_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "ConfigHelper::default_requests_per_minute")]
    pub requests_per_minute: u32,

    #[serde(default = "ConfigHelper::default_burst_per_second")]
    pub burst_per_second: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            url: ConfigHelper::default_analyzer_url(),
            max_repositories: ConfigHelper::default_max_repositories(),
            max_files: ConfigHelper::default_max_files(),
            timeout_secs: ConfigHelper::default_analyzer_timeout_secs(),
            requests_per_minute: ConfigHelper::default_requests_per_minute(),
            burst_per_second: ConfigHelper::default_burst_per_second(),
        }
    }
}
