use crate::config::constants::{
    DEFAULT_ANALYZER_BURST_PER_SECOND, DEFAULT_ANALYZER_REQUESTS_PER_MINUTE, DEFAULT_ANALYZER_TIMEOUT_SECS,
    DEFAULT_ANALYZER_URL, DEFAULT_MAX_FILES_PER_REPOSITORY, DEFAULT_MAX_REPOSITORIES, DEFAULT_SERVER_PORT,
    DEFAULT_SERVER_URL, DEFAULT_WEB_BASE_URL, GITHUB_API_URL, CLIENT_TIMEOUT_MINUTES, PROGRESS_TTL_SECS,
};

pub struct ConfigHelper;

impl ConfigHelper {
    pub fn default_port() -> u16 {
        DEFAULT_SERVER_PORT
    }

    pub fn default_cors_origins() -> Vec<String> {
        vec![
            "http://localhost:3000".to_string(),
            "https://www.0unveiled.com".to_string(),
            "https://0unveiled.com".to_string(),
        ]
    }

    pub fn default_github_api_url() -> String {
        GITHUB_API_URL.to_string()
    }

    pub fn default_token_rotation() -> bool {
        true
    }

    pub fn default_analyzer_url() -> String {
        DEFAULT_ANALYZER_URL.to_string()
    }

    pub fn default_max_repositories() -> usize {
        DEFAULT_MAX_REPOSITORIES
    }

    pub fn default_max_files() -> u32 {
        DEFAULT_MAX_FILES_PER_REPOSITORY
    }

    pub fn default_analyzer_timeout_secs() -> u64 {
        DEFAULT_ANALYZER_TIMEOUT_SECS
    }

    pub fn default_requests_per_minute() -> u32 {
        DEFAULT_ANALYZER_REQUESTS_PER_MINUTE
    }

    pub fn default_burst_per_second() -> u32 {
        DEFAULT_ANALYZER_BURST_PER_SECOND
    }

    pub fn default_progress_ttl_secs() -> u64 {
        PROGRESS_TTL_SECS
    }

    pub fn default_server_url() -> String {
        DEFAULT_SERVER_URL.to_string()
    }

    pub fn default_web_base_url() -> String {
        DEFAULT_WEB_BASE_URL.to_string()
    }

    pub fn default_timeout_minutes() -> u64 {
        CLIENT_TIMEOUT_MINUTES
    }

    pub fn default_results_dir() -> String {
        dirs::home_dir()
            .map(|d| d.join(".unveiled/results"))
            .unwrap_or_else(|| "./unveiled-results".into())
            .to_string_lossy()
            .to_string()
    }
}
