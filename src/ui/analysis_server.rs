use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use futures::StreamExt;
use serde_json::json;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::sse::Event;
use warp::{Filter, Reply};
use crate::config::constants::{DEFAULT_SERVER_HOST, SSE_KEEP_ALIVE_SECS};
use crate::errors::{UnveiledError, UnveiledResult};
use crate::helpers::validation::sanitize_job_id;
use crate::services::analysis_pipeline::AnalysisPipeline;
use crate::structs::analyze_request::AnalyzeRequest;
use crate::structs::health_report::HealthReport;
use crate::structs::stream_event::StreamEvent;

const MAX_BODY_BYTES: u64 = 16 * 1024;

struct ServerState {
    pipeline: Arc<AnalysisPipeline>,
    github_configured: bool,
    analyzer_url: String,
}

/// HTTP front of the analysis pipeline: the SSE analyze endpoint, progress polling and health.
pub struct AnalysisServer {
    state: Arc<ServerState>,
    cors_origins: Vec<String>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl AnalysisServer {
    pub fn new(pipeline: AnalysisPipeline, github_configured: bool, analyzer_url: &str, cors_origins: Vec<String>) -> Self {
        Self {
            state: Arc::new(ServerState {
                pipeline: Arc::new(pipeline),
                github_configured,
                analyzer_url: analyzer_url.to_string(),
            }),
            cors_origins,
            shutdown_tx: None,
            handle: None,
        }
    }

    pub fn routes(&self) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let state = Arc::clone(&self.state);
        let with_state = warp::any().map(move || Arc::clone(&state));

        let analyze = warp::path!("api" / "analyze" / "profile")
            .and(warp::post())
            .and(warp::body::content_length_limit(MAX_BODY_BYTES))
            .and(warp::body::bytes())
            .and(with_state.clone())
            .and_then(analyze_handler);

        let progress = warp::path!("api" / "progress" / String)
            .and(warp::get())
            .and(with_state.clone())
            .and_then(progress_handler);

        let health = warp::path!("health")
            .and(warp::get())
            .and(with_state)
            .and_then(health_handler);

        analyze
            .or(progress)
            .or(health)
            .with(cors(&self.cors_origins))
            .with(warp::log("unveiled::http"))
    }

    /// Binds and serves in the background. Port 0 picks a free port; the bound address is returned.
    pub async fn start(&mut self, port: u16) -> UnveiledResult<SocketAddr> {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let addr: SocketAddr = (DEFAULT_SERVER_HOST, port).into();

        let (bound, server) = warp::serve(self.routes())
            .try_bind_with_graceful_shutdown(addr, async {
                shutdown_rx.await.ok();
            })
            .map_err(|e| UnveiledError::system_error("bind analysis server", &e.to_string()))?;

        self.shutdown_tx = Some(shutdown_tx);
        self.handle = Some(tokio::spawn(server));

        log::info!("🌐 Analysis server listening on http://{}", bound);
        Ok(bound)
    }

    pub async fn shutdown(&mut self) -> UnveiledResult<()> {
        log::info!("🛑 Shutting down analysis server...");

        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            shutdown_tx.send(()).map_err(|_|
                UnveiledError::system_error("shutdown", "Failed to send shutdown signal")
            )?;
        }
        if let Some(handle) = self.handle.take() {
            handle.await.map_err(|e| UnveiledError::system_error("shutdown", &e.to_string()))?;
        }

        log::info!("✅ Analysis server shutdown complete");
        Ok(())
    }
}

fn cors(origins: &[String]) -> warp::cors::Builder {
    let builder = warp::cors()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "OPTIONS"]);

    let valid: Vec<&str> = origins.iter().map(String::as_str).filter(|o| is_valid_origin(o)).collect();
    if valid.len() < origins.len() {
        log::warn!("⚠️ Ignoring {} malformed CORS origin(s)", origins.len() - valid.len());
    }

    if valid.is_empty() {
        builder.allow_any_origin()
    } else {
        builder.allow_origins(valid)
    }
}

/// `scheme://host[:port]` with nothing after the authority.
pub(crate) fn is_valid_origin(origin: &str) -> bool {
    match origin.split_once("://") {
        Some((scheme, authority)) => {
            matches!(scheme, "http" | "https")
                && !authority.is_empty()
                && !authority.contains('/')
                && authority.parse::<warp::http::uri::Authority>().is_ok()
        }
        None => false,
    }
}

async fn analyze_handler(body: Bytes, state: Arc<ServerState>) -> Result<impl warp::Reply, Infallible> {
    let (tx, rx) = mpsc::unbounded_channel();

    match serde_json::from_slice::<AnalyzeRequest>(&body) {
        Ok(request) => {
            log::info!("📥 Analysis requested for '{}' (job {})", request.username.trim(), request.job_id());
            let pipeline = Arc::clone(&state.pipeline);
            tokio::spawn(async move {
                pipeline.run(request, tx).await;
            });
        }
        Err(e) => {
            log::warn!("⚠️ Rejected analysis request body: {}", e);
            let message = UnveiledError::validation_error(
                "request body",
                "",
                "expected a JSON object with a username",
                None,
            )
            .short_message();
            let _ = tx.send(StreamEvent::failure(&message));
        }
    }

    let events = UnboundedReceiverStream::new(rx).map(|event| Event::default().json_data(event));
    let keep_alive = warp::sse::keep_alive().interval(Duration::from_secs(SSE_KEEP_ALIVE_SECS));

    Ok(warp::sse::reply(keep_alive.stream(events)))
}

async fn progress_handler(job_id: String, state: Arc<ServerState>) -> Result<warp::reply::Response, Infallible> {
    let sanitized = sanitize_job_id(&job_id);
    if sanitized.is_empty() {
        let body = warp::reply::json(&json!({ "error": "Invalid job ID" }));
        return Ok(warp::reply::with_status(body, StatusCode::BAD_REQUEST).into_response());
    }

    let record = state.pipeline.tracker().get_progress(&sanitized).await;
    Ok(warp::reply::json(&record).into_response())
}

async fn health_handler(state: Arc<ServerState>) -> Result<impl warp::Reply, Infallible> {
    let report = HealthReport::new(
        state.github_configured,
        &state.analyzer_url,
        state.pipeline.tracker().backend_name(),
    );
    Ok(warp::reply::json(&report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use crate::helpers::line_buffer::{parse_data_line, LineBuffer};
    use crate::services::progress_store::memory_store::MemoryProgressStore;
    use crate::services::progress_tracker::ProgressTracker;
    use crate::structs::github::github_profile::GithubProfile;
    use crate::structs::github::github_repository::GithubRepository;
    use crate::traits::profile_source::MockProfileSource;
    use crate::traits::repository_analyzer::MockRepositoryAnalyzer;

    fn server(github_configured: bool) -> AnalysisServer {
        let mut profiles = MockProfileSource::new();
        profiles.expect_fetch_profile().returning(|login| Ok(GithubProfile {
            login: login.to_string(),
            name: None,
            bio: None,
            avatar_url: None,
            html_url: None,
            public_repos: 1,
            followers: 0,
            following: 0,
        }));
        profiles.expect_fetch_repositories().returning(|login| Ok(vec![GithubRepository {
            name: "tool".to_string(),
            full_name: format!("{}/tool", login),
            description: None,
            language: Some("Rust".to_string()),
            html_url: None,
            stargazers_count: 1,
            forks_count: 0,
            fork: false,
            archived: false,
            pushed_at: None,
        }]));
        profiles.expect_access_token().returning(|| None);

        let mut analyzer = MockRepositoryAnalyzer::new();
        analyzer.expect_analyze_repository().returning(|_, _| Ok(json!({ "overall_score": 88.0 })));

        let tracker = ProgressTracker::new(Arc::new(MemoryProgressStore::new()));
        let pipeline = AnalysisPipeline::new(Arc::new(profiles), Arc::new(analyzer), tracker, 5);
        AnalysisServer::new(pipeline, github_configured, "http://analyzer.test", vec!["http://localhost:3000".to_string()])
    }

    fn events(body: &[u8]) -> Vec<StreamEvent> {
        let mut buffer = LineBuffer::new();
        buffer
            .push(body)
            .iter()
            .filter_map(|line| parse_data_line(line))
            .map(|parsed| parsed.unwrap())
            .collect()
    }

    #[tokio::test]
    async fn analyze_streams_progress_then_result() {
        let server = server(true);
        let response = warp::test::request()
            .method("POST")
            .path("/api/analyze/profile")
            .body(r#"{"username":"alice"}"#)
            .reply(&server.routes())
            .await;

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["content-type"], "text/event-stream");

        let events = events(response.body());
        assert_eq!(events.first().and_then(|e| e.step.as_deref()), Some("Validating request"));
        let last = events.last().unwrap();
        assert_eq!(last.progress, Some(100));
        assert_eq!(last.result.as_ref().unwrap()["summary"]["average_score"], 88.0);
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    }

    #[tokio::test]
    async fn invalid_body_yields_single_validation_error() {
        let server = server(true);
        let response = warp::test::request()
            .method("POST")
            .path("/api/analyze/profile")
            .body("not json")
            .reply(&server.routes())
            .await;

        assert_eq!(response.status(), 200);
        let events = events(response.body());
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].error.as_deref(),
            Some("Invalid request body: expected a JSON object with a username")
        );
    }

    #[tokio::test]
    async fn progress_is_readable_after_a_run() {
        let server = server(true);
        let routes = server.routes();
        warp::test::request()
            .method("POST")
            .path("/api/analyze/profile")
            .body(r#"{"username":"alice"}"#)
            .reply(&routes)
            .await;

        let response = warp::test::request().path("/api/progress/alice").reply(&routes).await;
        let record: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(record["progress"], 100);
        assert_eq!(record["complete"], true);
        assert_eq!(record["status"], "Analysis complete");

        let unknown = warp::test::request().path("/api/progress/nobody").reply(&routes).await;
        let record: Value = serde_json::from_slice(unknown.body()).unwrap();
        assert_eq!(record["status"], "Pending");
        assert_eq!(record["progress"], 0);
    }

    #[tokio::test]
    async fn progress_rejects_unusable_job_ids() {
        let server = server(true);
        let response = warp::test::request().path("/api/progress/~~~").reply(&server.routes()).await;
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn health_reports_degraded_without_github() {
        let response = warp::test::request().path("/health").reply(&server(false).routes()).await;
        let report: HealthReport = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(report.status, "degraded");
        assert_eq!(report.services.progress_store, "memory");
        assert_eq!(report.services.analyzer, "http://analyzer.test");
    }

    #[tokio::test]
    async fn server_binds_and_shuts_down() {
        let mut server = server(true);
        let addr = server.start(0).await.unwrap();
        assert_ne!(addr.port(), 0);
        server.shutdown().await.unwrap();
    }

    #[test]
    fn origin_validation() {
        assert!(is_valid_origin("http://localhost:3000"));
        assert!(is_valid_origin("https://0unveiled.com"));
        assert!(!is_valid_origin("0unveiled.com"));
        assert!(!is_valid_origin("https://0unveiled.com/app"));
        assert!(!is_valid_origin("ftp://files.example"));
    }
}
