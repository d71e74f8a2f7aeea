use serde::{Deserialize, Serialize};
use crate::helpers::config_helper::ConfigHelper;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GithubConfig {
    #[serde(default = "ConfigHelper::default_github_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub tokens: Vec<String>,

    #[serde(default = "ConfigHelper::default_token_rotation")]
    pub token_rotation: bool,
}

impl GithubConfig {
    /// Every configured token, rotation pool first, without duplicates.
    pub fn all_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = Vec::new();
        let candidates = self.tokens.iter().chain(self.token.iter());
        for token in candidates {
            let token = token.trim();
            if !token.is_empty() && !tokens.iter().any(|t| t == token) {
                tokens.push(token.to_string());
            }
        }
        if !self.token_rotation {
            tokens.truncate(1);
        }
        tokens
    }

    pub fn is_configured(&self) -> bool {
        !self.all_tokens().is_empty()
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: ConfigHelper::default_github_api_url(),
            token: None,
            tokens: Vec::new(),
            token_rotation: ConfigHelper::default_token_rotation(),
        }
    }
}
