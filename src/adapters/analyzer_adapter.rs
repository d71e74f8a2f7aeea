use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use crate::config::constants::ANALYZE_REPOSITORY_ENDPOINT;
use crate::errors::{UnveiledError, UnveiledResult};
use crate::services::rate_limiter::ApiRateLimiter;
use crate::structs::analyze_repository_request::AnalyzeRepositoryRequest;
use crate::structs::config::analyzer_config::AnalyzerConfig;
use crate::structs::github::github_repository::GithubRepository;
use crate::traits::repository_analyzer::RepositoryAnalyzer;

const SERVICE: &str = "Analyzer";

/// Client for the external repository analysis service.
pub struct AnalyzerAdapter {
    client: Client,
    base_url: String,
    max_files: u32,
    rate_limiter: ApiRateLimiter,
}

impl AnalyzerAdapter {

    pub fn new(config: &AnalyzerConfig) -> UnveiledResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UnveiledError::system_error("build analyzer client", &e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            max_files: config.max_files,
            rate_limiter: ApiRateLimiter::new(config.requests_per_minute, config.burst_per_second),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json(&self, endpoint: &str, request_body: &AnalyzeRepositoryRequest, operation_name: &str) -> UnveiledResult<Value> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));

        self.rate_limiter.acquire().await;

        let response = match self.client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request_body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                log::error!("Network error during {} request: {}", operation_name, e);
                let reason = if e.is_timeout() {
                    "Analysis service timed out".to_string()
                } else {
                    "Failed to connect to analysis service".to_string()
                };
                return Err(UnveiledError::upstream_error(SERVICE, operation_name, None, &reason));
            }
        };

        let status = response.status();
        let body: Value = match status {
            status if status.is_success() => match response.json().await {
                Ok(data) => data,
                Err(e) => {
                    log::error!("Failed to parse JSON response for {}: {}", operation_name, e);
                    return Err(UnveiledError::upstream_error(SERVICE, operation_name, Some(status.as_u16()), "Invalid response format from analysis service"));
                }
            },
            status => {
                let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
                log::error!("{} request failed with status {}: {}", operation_name, status, error_text);
                return Err(UnveiledError::upstream_error(
                    SERVICE,
                    operation_name,
                    Some(status.as_u16()),
                    &error_detail(&error_text),
                ));
            }
        };

        if body.get("success").and_then(Value::as_bool) == Some(false) {
            let message = body
                .get("message")
                .or_else(|| body.get("detail"))
                .and_then(Value::as_str)
                .unwrap_or("analysis reported failure");
            log::error!("Analysis service returned error for {}: {}", operation_name, message);
            return Err(UnveiledError::upstream_error(SERVICE, operation_name, Some(200), message));
        }

        Ok(body)
    }
}

/// FastAPI puts the useful text under `detail`; fall back to the raw body.
fn error_detail(error_text: &str) -> String {
    serde_json::from_str::<Value>(error_text)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| error_text.to_string())
}

#[async_trait]
impl RepositoryAnalyzer for AnalyzerAdapter {
    async fn analyze_repository(&self, repository: &GithubRepository, access_token: Option<String>) -> UnveiledResult<Value> {
        let request = AnalyzeRepositoryRequest {
            access_token: access_token.unwrap_or_default(),
            owner: repository.owner().to_string(),
            repo: repository.name.clone(),
            max_files: self.max_files,
        };

        log::info!("🔬 Analyzing {} (max {} files)", repository.full_name, self.max_files);
        self.post_json(ANALYZE_REPOSITORY_ENDPOINT, &request, &format!("analyze {}", repository.full_name)).await
    }
}
