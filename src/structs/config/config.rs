use serde::{Deserialize, Serialize};
use crate::structs::config::analyzer_config::AnalyzerConfig;
use crate::structs::config::client_config::ClientConfig;
use crate::structs::config::github_config::GithubConfig;
use crate::structs::config::server_config::ServerConfig;
use crate::structs::config::store_config::StoreConfig;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub client: ClientConfig,
}
