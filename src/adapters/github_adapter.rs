use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use crate::config::constants::{GITHUB_REPOS_PER_PAGE, GITHUB_REQUEST_ATTEMPTS};
use crate::errors::{UnveiledError, UnveiledResult};
use crate::services::token_rotator::TokenRotator;
use crate::structs::config::github_config::GithubConfig;
use crate::structs::github::github_profile::GithubProfile;
use crate::structs::github::github_repository::GithubRepository;
use crate::traits::profile_source::ProfileSource;

static USER_AGENT: Lazy<String> = Lazy::new(|| format!("unveiled-analyzer/{}", env!("CARGO_PKG_VERSION")));

const SERVICE: &str = "GitHub";

pub struct GithubAdapter {
    client: Client,
    api_url: String,
    rotator: TokenRotator,
}

impl GithubAdapter {

    pub fn new(config: &GithubConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            rotator: TokenRotator::new(config.all_tokens()),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.rotator.is_empty()
    }

    /// Requests left across usable tokens, and how many tokens are configured.
    pub fn capacity(&self) -> (u32, usize) {
        self.rotator.total_capacity()
    }

    async fn get_json<R>(&self, endpoint: &str, operation_name: &str) -> UnveiledResult<R> where R: DeserializeOwned {
        let url = format!("{}/{}", self.api_url, endpoint.trim_start_matches('/'));

        for attempt in 1..=GITHUB_REQUEST_ATTEMPTS {
            let token = self.rotator.next_token();
            if token.is_none() && !self.rotator.is_empty() {
                return Err(UnveiledError::upstream_error(SERVICE, operation_name, Some(429), "All GitHub tokens are rate limited"));
            }

            let mut request = self.client
                .get(&url)
                .header("Accept", "application/vnd.github.v3+json")
                .header("User-Agent", USER_AGENT.as_str());
            if let Some(token) = &token {
                request = request.header("Authorization", authorization_value(token));
            }

            let response = request.send().await.map_err(|e| UnveiledError::NetworkError {
                operation: operation_name.to_string(),
                url: Some(url.clone()),
                status_code: None,
                reason: e.to_string(),
            })?;

            let (remaining, reset_at) = rate_limit_headers(response.headers());
            if let (Some(token), Some(remaining)) = (&token, remaining) {
                self.rotator.record_rate_limit(token, remaining, reset_at);
            }

            match response.status() {
                StatusCode::OK => {
                    return response.json::<R>().await.map_err(|e| {
                        log::error!("Failed to parse JSON response for {}: {}", operation_name, e);
                        UnveiledError::upstream_error(SERVICE, operation_name, Some(200), "Invalid response format")
                    });
                }
                StatusCode::NOT_FOUND => {
                    return Err(UnveiledError::upstream_error(SERVICE, operation_name, Some(404), "Not found"));
                }
                status @ (StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS)
                    if remaining == Some(0) || status == StatusCode::TOO_MANY_REQUESTS =>
                {
                    log::warn!("⏳ GitHub rate limit hit during {} (attempt {}/{})", operation_name, attempt, GITHUB_REQUEST_ATTEMPTS);
                    match &token {
                        Some(token) => self.rotator.mark_exhausted(token, reset_at),
                        None => {
                            return Err(UnveiledError::upstream_error(SERVICE, operation_name, Some(429), "Unauthenticated rate limit exceeded"));
                        }
                    }
                }
                status => {
                    let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
                    log::error!("{} request failed with status {}: {}", operation_name, status, error_text);
                    return Err(UnveiledError::upstream_error(SERVICE, operation_name, Some(status.as_u16()), &error_text));
                }
            }
        }

        Err(UnveiledError::upstream_error(SERVICE, operation_name, Some(429), "Rate limited on every attempt"))
    }
}

/// Fine-grained and classic PATs use Bearer; older OAuth tokens use the `token` scheme.
pub(crate) fn authorization_value(token: &str) -> String {
    if token.starts_with("ghp_") || token.starts_with("github_pat_") {
        format!("Bearer {}", token)
    } else {
        format!("token {}", token)
    }
}

fn rate_limit_headers(headers: &HeaderMap) -> (Option<u32>, Option<DateTime<Utc>>) {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    let remaining = header("x-ratelimit-remaining").and_then(|v| v.parse::<u32>().ok());
    let reset_at = header("x-ratelimit-reset")
        .and_then(|v| v.parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0));
    (remaining, reset_at)
}

#[async_trait]
impl ProfileSource for GithubAdapter {
    async fn fetch_profile(&self, username: &str) -> UnveiledResult<GithubProfile> {
        self.get_json(&format!("users/{}", username), "fetch profile")
            .await
            .map_err(|e| match e {
                UnveiledError::UpstreamError { status_code: Some(404), .. } => UnveiledError::not_found("GitHub user", username),
                other => other,
            })
    }

    async fn fetch_repositories(&self, username: &str) -> UnveiledResult<Vec<GithubRepository>> {
        self.get_json(
            &format!("users/{}/repos?per_page={}&sort=pushed&type=owner", username, GITHUB_REPOS_PER_PAGE),
            "fetch repositories",
        )
        .await
    }

    fn access_token(&self) -> Option<String> {
        self.rotator.next_token()
    }
}
