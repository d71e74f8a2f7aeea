use std::fs;
use std::path::{Path, PathBuf};
use crate::config::constants::{
    ANALYZER_URL_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME, GITHUB_TOKENS_ENV, GITHUB_TOKEN_ENV, PORT_ENV,
    REDIS_REST_TOKEN_ENV, REDIS_REST_URL_ENV,
};
use crate::errors::{UnveiledError, UnveiledResult};
use crate::structs::config::config::Config;

pub struct ConfigManager;

impl ConfigManager {

    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Loads the config file (when present) and layers environment overrides on top.
    pub fn load() -> UnveiledResult<Config> {
        let mut config = Self::load_from(&Self::config_path())?;
        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> UnveiledResult<Config> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        log::info!("📋 Loading config from: {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| UnveiledError::ConfigurationFileError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| UnveiledError::ConfigurationFileError {
            path: path.display().to_string(),
            reason: e.message().to_string(),
        })
    }

    pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(token) = lookup(GITHUB_TOKEN_ENV) {
            config.github.token = Some(token);
        }
        if let Some(tokens) = lookup(GITHUB_TOKENS_ENV) {
            config.github.tokens = tokens
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(url) = lookup(ANALYZER_URL_ENV) {
            config.analyzer.url = url;
        }
        if let Some(url) = lookup(REDIS_REST_URL_ENV) {
            config.store.redis_rest_url = Some(url);
        }
        if let Some(token) = lookup(REDIS_REST_TOKEN_ENV) {
            config.store.redis_rest_token = Some(token);
        }
        if let Some(port) = lookup(PORT_ENV) {
            match port.parse::<u16>() {
                Ok(port) => config.server.port = port,
                Err(_) => log::warn!("⚠️ Ignoring invalid {} value: {}", PORT_ENV, port),
            }
        }
    }

    pub fn create_sample_config() -> UnveiledResult<PathBuf> {
        let sample_config = r#"# Unveiled profile analysis configuration

[server]
port = 8080
cors_origins = ["http://localhost:3000", "https://0unveiled.com"]

[github]
api_url = "https://api.github.com"
# Single token, or a pool rotated by remaining quota (GITHUB_TOKEN / GITHUB_TOKENS)
# token = "ghp_..."
tokens = []
token_rotation = true

[analyzer]
# External repository analysis service (ANALYZER_SERVICE_URL)
url = "http://127.0.0.1:8000"
max_repositories = 5
max_files = 50
timeout_secs = 300
requests_per_minute = 30
burst_per_second = 2

[store]
# Leave unset to keep progress in memory (UPSTASH_REDIS_REST_URL / UPSTASH_REDIS_REST_TOKEN)
# redis_rest_url = "https://example.upstash.io"
# redis_rest_token = "..."
ttl_secs = 7200

[client]
server_url = "http://127.0.0.1:8080"
web_base_url = "http://localhost:3000"
timeout_minutes = 10
open_browser = false
"#;
        let config_file_path = Self::config_path();
        if let Some(parent) = config_file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if config_file_path.exists() {
            return Err(UnveiledError::config_error(
                "Configuration file already exists",
                None,
                Some(&format!("Edit {} directly", config_file_path.display())),
            ));
        }
        fs::write(&config_file_path, sample_config)?;
        log::info!("✅ Created sample config at: {}", config_file_path.display());
        Ok(config_file_path)
    }

    pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (name, url) in [
            ("github.api_url", &config.github.api_url),
            ("analyzer.url", &config.analyzer.url),
            ("client.server_url", &config.client.server_url),
        ] {
            if reqwest::Url::parse(url).is_err() {
                errors.push(format!("'{}' is not a valid URL: {}", name, url));
            }
        }

        if config.analyzer.max_repositories == 0 {
            errors.push("analyzer.max_repositories must be at least 1".to_string());
        }
        if config.analyzer.requests_per_minute == 0 || config.analyzer.burst_per_second == 0 {
            errors.push("analyzer rate limits must be at least 1".to_string());
        }
        if config.client.timeout_minutes == 0 {
            errors.push("client.timeout_minutes must be at least 1".to_string());
        }

        match (&config.store.redis_rest_url, &config.store.redis_rest_token) {
            (Some(_), None) => errors.push("store.redis_rest_url is set but store.redis_rest_token is missing".to_string()),
            (None, Some(_)) => errors.push("store.redis_rest_token is set but store.redis_rest_url is missing".to_string()),
            _ => {}
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigManager::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.analyzer.max_repositories, 5);
        assert!(config.store.redis_credentials().is_none());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[analyzer]\nmax_repositories = 2\n").unwrap();

        let config = ConfigManager::load_from(&path).unwrap();
        assert_eq!(config.analyzer.max_repositories, 2);
        assert_eq!(config.analyzer.max_files, 50);
        assert_eq!(config.client.timeout_minutes, 10);
    }

    #[test]
    fn malformed_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server\nport = ").unwrap();

        let err = ConfigManager::load_from(&path).unwrap_err();
        assert!(matches!(err, UnveiledError::ConfigurationFileError { .. }));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (GITHUB_TOKENS_ENV, "ghp_a, ghp_b ,"),
            (REDIS_REST_URL_ENV, "https://cache.example"),
            (REDIS_REST_TOKEN_ENV, "secret"),
            (PORT_ENV, "not-a-port"),
        ]);
        let mut config = Config::default();
        ConfigManager::apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.github.tokens, vec!["ghp_a", "ghp_b"]);
        assert_eq!(config.store.redis_credentials(), Some(("https://cache.example", "secret")));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn validation_flags_half_configured_cache() {
        let mut config = Config::default();
        config.store.redis_rest_url = Some("https://cache.example".to_string());
        config.analyzer.max_repositories = 0;

        let errors = ConfigManager::validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
