use serde::{Deserialize, Serialize};

/// Body of `POST /api/analyze/profile`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

impl AnalyzeRequest {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            job_id: None,
        }
    }

    /// Progress is tracked per username unless the caller picked a job id.
    pub fn job_id(&self) -> String {
        self.job_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.username.trim())
            .to_string()
    }
}
