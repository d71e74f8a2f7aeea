use async_trait::async_trait;
use serde_json::Value;
use crate::errors::UnveiledResult;
use crate::structs::github::github_repository::GithubRepository;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryAnalyzer: Send + Sync {
    async fn analyze_repository(&self, repository: &GithubRepository, access_token: Option<String>) -> UnveiledResult<Value>;
}
