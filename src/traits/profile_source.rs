use async_trait::async_trait;
use crate::errors::UnveiledResult;
use crate::structs::github::github_profile::GithubProfile;
use crate::structs::github::github_repository::GithubRepository;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self, username: &str) -> UnveiledResult<GithubProfile>;

    async fn fetch_repositories(&self, username: &str) -> UnveiledResult<Vec<GithubRepository>>;

    /// Token forwarded to the analyzer so it can read the same repositories.
    fn access_token(&self) -> Option<String>;
}
