use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;
use unveiled_analyzer::errors::{UnveiledError, UnveiledResult};
use unveiled_analyzer::enums::consumer_error::ConsumerError;
use unveiled_analyzer::enums::consumer_state::ConsumerState;
use unveiled_analyzer::services::analysis_pipeline::AnalysisPipeline;
use unveiled_analyzer::services::file_result_sink::FileResultSink;
use unveiled_analyzer::services::leaderboard::LeaderboardService;
use unveiled_analyzer::services::progress_store::memory_store::MemoryProgressStore;
use unveiled_analyzer::services::progress_tracker::ProgressTracker;
use unveiled_analyzer::services::stream_consumer::StreamConsumer;
use unveiled_analyzer::structs::analyze_request::AnalyzeRequest;
use unveiled_analyzer::structs::github::github_profile::GithubProfile;
use unveiled_analyzer::structs::github::github_repository::GithubRepository;
use unveiled_analyzer::structs::progress_record::ProgressRecord;
use unveiled_analyzer::traits::navigator::Navigator;
use unveiled_analyzer::traits::profile_source::ProfileSource;
use unveiled_analyzer::traits::repository_analyzer::RepositoryAnalyzer;
use unveiled_analyzer::ui::analysis_server::AnalysisServer;

/// GitHub stand-in that knows a fixed set of users, each with a fixed score.
struct FakeGithub {
    users: Vec<(&'static str, f64)>,
}

#[async_trait]
impl ProfileSource for FakeGithub {
    async fn fetch_profile(&self, username: &str) -> UnveiledResult<GithubProfile> {
        if !self.users.iter().any(|(login, _)| *login == username) {
            return Err(UnveiledError::not_found("GitHub user", username));
        }
        Ok(GithubProfile {
            login: username.to_string(),
            name: None,
            bio: None,
            avatar_url: None,
            html_url: None,
            public_repos: 2,
            followers: 0,
            following: 0,
        })
    }

    async fn fetch_repositories(&self, username: &str) -> UnveiledResult<Vec<GithubRepository>> {
        Ok(["service", "forked"]
            .iter()
            .map(|name| GithubRepository {
                name: name.to_string(),
                full_name: format!("{}/{}", username, name),
                description: None,
                language: Some("Rust".to_string()),
                html_url: None,
                stargazers_count: 0,
                forks_count: 0,
                fork: *name == "forked",
                archived: false,
                pushed_at: None,
            })
            .collect())
    }

    fn access_token(&self) -> Option<String> {
        None
    }
}

struct FakeAnalyzer {
    users: Vec<(&'static str, f64)>,
}

#[async_trait]
impl RepositoryAnalyzer for FakeAnalyzer {
    async fn analyze_repository(&self, repository: &GithubRepository, _access_token: Option<String>) -> UnveiledResult<Value> {
        let score = self.users
            .iter()
            .find(|(login, _)| *login == repository.owner())
            .map(|(_, score)| *score)
            .unwrap_or(0.0);
        Ok(json!({ "overall_score": score, "metrics": { "lines_of_code": 420 } }))
    }
}

#[derive(Default)]
struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visited.lock().unwrap().push(path.to_string());
    }
}

async fn start_server() -> anyhow::Result<(AnalysisServer, String)> {
    let users = vec![("alice", 82.5), ("bob", 64.0)];
    let tracker = ProgressTracker::new(Arc::new(MemoryProgressStore::new()));
    let pipeline = AnalysisPipeline::new(
        Arc::new(FakeGithub { users: users.clone() }),
        Arc::new(FakeAnalyzer { users }),
        tracker,
        5,
    );
    let mut server = AnalysisServer::new(pipeline, true, "http://analyzer.test", Vec::new());
    let addr = server.start(0).await?;
    Ok((server, format!("http://{}", addr)))
}

fn consumer(username: &str, results: &TempDir, navigator: Arc<RecordingNavigator>) -> StreamConsumer {
    StreamConsumer::new(
        username,
        Arc::new(FileResultSink::new(results.path())),
        navigator,
        Duration::from_secs(600),
    )
}

#[tokio::test]
async fn streamed_analysis_is_persisted_and_ranked() -> anyhow::Result<()> {
    let (mut server, base_url) = start_server().await?;
    let results = TempDir::new()?;
    let client = Client::new();

    for username in ["bob", "alice"] {
        let navigator = Arc::new(RecordingNavigator::default());
        let mut consumer = consumer(username, &results, navigator.clone());

        let view = consumer.start(&client, &base_url, &AnalyzeRequest::new(username), None).await?;

        assert!(view.complete);
        assert_eq!(view.progress, 100);
        assert_eq!(view.status, "Analysis complete");
        assert_eq!(consumer.state(), ConsumerState::Complete);
        assert_eq!(*navigator.visited.lock().unwrap(), vec![format!("/analyze/profile/{}/results", username)]);
    }

    let stored = FileResultSink::new(results.path()).load("alice", "profileAnalysisResult")?;
    assert!(stored.success);
    assert_eq!(stored.data["summary"]["repositories_analyzed"], 1);
    assert_eq!(stored.data["repositories"][0]["repository"]["name"], "service");

    let entries = LeaderboardService::new(results.path()).update()?;
    let ranking: Vec<&str> = entries.iter().map(|e| e.username.as_str()).collect();
    assert_eq!(ranking, vec!["alice", "bob"]);
    assert!(results.path().join("leaderboard.json").exists());

    let record: ProgressRecord = client
        .get(format!("{}/api/progress/alice", base_url))
        .send()
        .await?
        .json()
        .await?;
    assert!(record.complete);
    assert_eq!(record.progress, 100);

    server.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn unknown_user_ends_in_error_without_redirect() -> anyhow::Result<()> {
    let (mut server, base_url) = start_server().await?;
    let results = TempDir::new()?;
    let navigator = Arc::new(RecordingNavigator::default());
    let mut consumer = consumer("ghost", &results, navigator.clone());

    let err = consumer
        .start(&Client::new(), &base_url, &AnalyzeRequest::new("ghost"), None)
        .await
        .unwrap_err();

    assert_eq!(err, ConsumerError::Remote("GitHub user 'ghost' not found".to_string()));
    assert!(consumer.view().complete);
    assert!(navigator.visited.lock().unwrap().is_empty());
    assert!(!results.path().join("ghost").exists());

    let record: ProgressRecord = Client::new()
        .get(format!("{}/api/progress/ghost", base_url))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(record.error.as_deref(), Some("GitHub user 'ghost' not found"));
    assert!(record.complete);

    server.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn explicit_job_id_is_tracked() -> anyhow::Result<()> {
    let (mut server, base_url) = start_server().await?;
    let results = TempDir::new()?;
    let mut consumer = consumer("alice", &results, Arc::new(RecordingNavigator::default()));

    let request = AnalyzeRequest { username: "alice".to_string(), job_id: Some("job-42".to_string()) };
    consumer.start(&Client::new(), &base_url, &request, None).await?;

    let record: ProgressRecord = Client::new()
        .get(format!("{}/api/progress/job-42", base_url))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(record.job_id, "job-42");
    assert!(record.complete);

    server.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() -> anyhow::Result<()> {
    let results = TempDir::new()?;
    let mut consumer = consumer("alice", &results, Arc::new(RecordingNavigator::default()));

    let err = consumer
        .start(&Client::new(), "http://127.0.0.1:9", &AnalyzeRequest::new("alice"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ConsumerError::Network(_)));
    assert_eq!(consumer.state(), ConsumerState::Errored);
    Ok(())
}

#[tokio::test]
async fn health_reports_memory_store() -> anyhow::Result<()> {
    let (mut server, base_url) = start_server().await?;

    let health: Value = Client::new().get(format!("{}/health", base_url)).send().await?.json().await?;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["services"]["progress_store"], "memory");

    server.shutdown().await?;
    Ok(())
}
