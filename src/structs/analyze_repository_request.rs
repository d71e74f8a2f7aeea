use serde::Serialize;

/// Body sent to the external analyzer for one repository.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRepositoryRequest {
    pub access_token: String,
    pub owner: String,
    pub repo: String,
    pub max_files: u32,
}
