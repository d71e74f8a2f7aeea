use std::collections::BTreeMap;
use serde_json::Value;
use crate::config::constants::MAX_SUMMARY_STRENGTHS;
use crate::structs::profile_analysis::{AnalyzedRepository, ProfileSummary};

/// Rolls per-repository analyzer output up into a profile-level summary.
///
/// The analyzer payload stays opaque; only `overall_score`, `metrics.lines_of_code`,
/// `repository.language` and `ai_insights.strengths` are read, and each is optional.
pub struct ProfileAggregator;

impl ProfileAggregator {
    pub fn summarize(repositories: &[AnalyzedRepository]) -> ProfileSummary {
        let mut scores = Vec::new();
        let mut total_lines_of_code = 0u64;
        let mut languages: BTreeMap<String, usize> = BTreeMap::new();
        let mut strengths: Vec<String> = Vec::new();

        for analyzed in repositories {
            let analysis = &analyzed.analysis;

            if let Some(score) = analysis.get("overall_score").and_then(Value::as_f64) {
                scores.push(score);
            }

            total_lines_of_code += analysis
                .pointer("/metrics/lines_of_code")
                .and_then(Value::as_u64)
                .unwrap_or(0);

            let language = analysis
                .pointer("/repository/language")
                .and_then(Value::as_str)
                .map(String::from)
                .or_else(|| analyzed.repository.language.clone());
            if let Some(language) = language {
                *languages.entry(language).or_insert(0) += 1;
            }

            let repo_strengths = analysis
                .pointer("/ai_insights/strengths")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(Value::as_str);
            for strength in repo_strengths {
                if strengths.len() >= MAX_SUMMARY_STRENGTHS {
                    break;
                }
                if !strengths.iter().any(|s| s == strength) {
                    strengths.push(strength.to_string());
                }
            }
        }

        let average_score = if scores.is_empty() {
            0.0
        } else {
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            (mean * 10.0).round() / 10.0
        };

        ProfileSummary {
            repositories_analyzed: repositories.len(),
            average_score,
            total_lines_of_code,
            languages,
            strengths,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::structs::github::github_repository::GithubRepository;

    fn repo(name: &str, language: Option<&str>) -> GithubRepository {
        GithubRepository {
            name: name.to_string(),
            full_name: format!("alice/{}", name),
            description: None,
            language: language.map(String::from),
            html_url: None,
            stargazers_count: 0,
            forks_count: 0,
            fork: false,
            archived: false,
            pushed_at: None,
        }
    }

    #[test]
    fn summarizes_scores_lines_and_languages() {
        let repositories = vec![
            AnalyzedRepository {
                repository: repo("api", Some("Go")),
                analysis: json!({
                    "overall_score": 80.0,
                    "metrics": { "lines_of_code": 1200 },
                    "repository": { "language": "Rust" },
                    "ai_insights": { "strengths": ["Clear modules", "Good tests"] }
                }),
            },
            AnalyzedRepository {
                repository: repo("web", Some("TypeScript")),
                analysis: json!({
                    "overall_score": 65.25,
                    "metrics": { "lines_of_code": 300 },
                    "ai_insights": { "strengths": ["Good tests", "Typed API"] }
                }),
            },
        ];

        let summary = ProfileAggregator::summarize(&repositories);
        assert_eq!(summary.repositories_analyzed, 2);
        assert!((summary.average_score - 72.6).abs() < f64::EPSILON);
        assert_eq!(summary.total_lines_of_code, 1500);
        assert_eq!(summary.languages.get("Rust"), Some(&1));
        assert_eq!(summary.languages.get("TypeScript"), Some(&1));
        assert_eq!(summary.strengths, vec!["Clear modules", "Good tests", "Typed API"]);
    }

    #[test]
    fn opaque_payloads_without_known_fields_are_tolerated() {
        let repositories = vec![AnalyzedRepository {
            repository: repo("misc", None),
            analysis: json!({ "something": "else" }),
        }];

        let summary = ProfileAggregator::summarize(&repositories);
        assert_eq!(summary.average_score, 0.0);
        assert_eq!(summary.total_lines_of_code, 0);
        assert!(summary.languages.is_empty());
        assert!(summary.strengths.is_empty());
    }
}
