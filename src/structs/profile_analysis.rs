use std::collections::BTreeMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::structs::github::github_profile::GithubProfile;
use crate::structs::github::github_repository::GithubRepository;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedRepository {
    pub repository: GithubRepository,
    /// Whatever the external analyzer returned, untouched.
    pub analysis: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub repositories_analyzed: usize,
    pub average_score: f64,
    pub total_lines_of_code: u64,
    pub languages: BTreeMap<String, usize>,
    pub strengths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileAnalysis {
    pub username: String,
    pub profile: GithubProfile,
    pub repositories: Vec<AnalyzedRepository>,
    pub summary: ProfileSummary,
    pub analyzed_at: DateTime<Utc>,
}
