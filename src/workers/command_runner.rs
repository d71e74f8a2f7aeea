use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use reqwest::Client;
use tokio::sync::oneshot;
use crate::adapters::analyzer_adapter::AnalyzerAdapter;
use crate::adapters::github_adapter::GithubAdapter;
use crate::config::config_manager::ConfigManager;
use crate::config::constants::timeout_duration;
use crate::enums::commands::Commands;
use crate::errors::{UnveiledError, UnveiledResult};
use crate::helpers::validation::{sanitize_job_id, validate_username};
use crate::logger::progress_logger::ProgressLogger;
use crate::services::analysis_pipeline::AnalysisPipeline;
use crate::services::file_result_sink::FileResultSink;
use crate::services::leaderboard::LeaderboardService;
use crate::services::progress_store::build_progress_store;
use crate::services::progress_tracker::ProgressTracker;
use crate::services::stream_consumer::StreamConsumer;
use crate::structs::analyze_request::AnalyzeRequest;
use crate::structs::config::config::Config;
use crate::structs::progress_record::ProgressRecord;
use crate::ui::analysis_server::AnalysisServer;
use crate::ui::browser_navigator::BrowserNavigator;

pub struct CommandRunner {
    start_time: Option<Instant>,
}

impl CommandRunner {
    pub fn new() -> Self {
        Self {
            start_time: None,
        }
    }

    pub async fn run_command(&mut self, command: Commands) -> UnveiledResult<()> {
        self.start_time = Some(Instant::now());

        let result = match command {
            Commands::Init => self.init_command().await,
            Commands::Validate => self.validate_command().await,
            Commands::Serve { port } => self.serve_command(port).await,
            Commands::Analyze { username, server, job_id, open } => self.analyze_command(username, server, job_id, open).await,
            Commands::Progress { job_id, server } => self.progress_command(job_id, server).await,
            Commands::Leaderboard => self.leaderboard_command().await,
        };

        if let Some(start) = self.start_time {
            let duration = start.elapsed();
            log::info!("⏱️  Command completed in {:.2}s", duration.as_secs_f64());
        }

        result
    }

    async fn init_command(&self) -> UnveiledResult<()> {
        log::info!("🚀 Initializing unveiled configuration...");

        match ConfigManager::create_sample_config() {
            Ok(_) => {
                log::info!("✅ Configuration file created successfully!");
                log::info!("📝 Add a GitHub token and point the analyzer URL at your analysis service.");
                log::info!("🔧 Run 'unveiled validate' to check your configuration.");
            }
            Err(e) => {
                log::error!("❌ Failed to create configuration: {}", e);
                return Err(e);
            }
        }

        Ok(())
    }

    async fn validate_command(&self) -> UnveiledResult<()> {
        log::info!("🔍 Validating configuration...");
        let config = Self::load_config()?;

        match ConfigManager::validate_config(&config) {
            Ok(()) => {
                log::info!("✅ Configuration is valid");
                if config.github.is_configured() {
                    let (remaining, tokens) = GithubAdapter::new(&config.github).capacity();
                    log::info!("🔑 {} GitHub token(s), up to {} requests/hour", tokens, remaining);
                } else {
                    log::warn!("⚠️ No GitHub token configured; requests will hit the unauthenticated rate limit");
                }
                let backend = if config.store.redis_credentials().is_some() { "redis" } else { "memory" };
                log::info!("📦 Progress store: {}", backend);
                Ok(())
            }
            Err(errors) => {
                for error in &errors {
                    log::error!("   • {}", error);
                }
                Err(UnveiledError::config_error(
                    &format!("Configuration has {} problem(s)", errors.len()),
                    None,
                    Some(&format!("Fix {}", ConfigManager::config_path().display())),
                ))
            }
        }
    }

    async fn serve_command(&self, port: Option<u16>) -> UnveiledResult<()> {
        let config = Self::load_config()?;
        ConfigManager::validate_config(&config).map_err(|errors| {
            UnveiledError::config_error(&errors.join("; "), None, Some("Run 'unveiled validate' for details"))
        })?;

        let github = GithubAdapter::new(&config.github);
        let github_configured = github.is_configured();
        if github_configured {
            let (remaining, tokens) = github.capacity();
            log::info!("🔑 Serving with {} GitHub token(s), {} requests available", tokens, remaining);
        } else {
            log::warn!("⚠️ No GitHub token configured; serving in degraded mode");
        }
        let analyzer = AnalyzerAdapter::new(&config.analyzer)?;
        let analyzer_url = analyzer.base_url().to_string();

        let tracker = ProgressTracker::new(build_progress_store(&config.store));
        let pipeline = AnalysisPipeline::new(
            Arc::new(github),
            Arc::new(analyzer),
            tracker,
            config.analyzer.max_repositories,
        );

        let mut server = AnalysisServer::new(pipeline, github_configured, &analyzer_url, config.server.cors_origins.clone());
        server.start(port.unwrap_or(config.server.port)).await?;

        log::info!("👂 Press Ctrl-C to stop");
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| UnveiledError::system_error("wait for Ctrl-C", &e.to_string()))?;

        server.shutdown().await
    }

    async fn analyze_command(&self, username: String, server: Option<String>, job_id: Option<String>, open: bool) -> UnveiledResult<()> {
        let config = Self::load_config()?;
        let username = validate_username(&username)?;
        let server_url = server.unwrap_or_else(|| config.client.server_url.clone());

        log::info!("🔍 Analyzing GitHub profile '{}' via {}", username, server_url);

        let sink = Arc::new(FileResultSink::new(Self::results_dir(&config)));
        let navigator = Arc::new(BrowserNavigator::new(&config.client.web_base_url, open || config.client.open_browser));
        let mut consumer = StreamConsumer::new(&username, sink, navigator, timeout_duration(config.client.timeout_minutes));

        let mut logger = ProgressLogger::new();
        logger.start(consumer.subscribe());

        let (cancel_tx, cancel_rx) = oneshot::channel();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = cancel_tx.send(());
            }
        });

        let request = AnalyzeRequest { username: username.clone(), job_id };
        match consumer.start(&Client::new(), &server_url, &request, Some(cancel_rx)).await {
            Ok(view) => {
                logger.stop(&view.status).await;
                if consumer.result().is_none() {
                    log::warn!("⚠️ Analysis finished without a result payload");
                }
                Ok(())
            }
            Err(e) => {
                logger.error(&e.to_string()).await;
                Err(UnveiledError::stream_error("consume analysis stream", &e.to_string()))
            }
        }
    }

    async fn progress_command(&self, job_id: String, server: Option<String>) -> UnveiledResult<()> {
        let config = Self::load_config()?;
        let server_url = server.unwrap_or_else(|| config.client.server_url.clone());
        let job_id = sanitize_job_id(&job_id);
        if job_id.is_empty() {
            return Err(UnveiledError::validation_error("job_id", "", "must contain letters, digits, '-' or '_'", None));
        }

        let url = format!("{}/api/progress/{}", server_url.trim_end_matches('/'), job_id);
        let response = Client::new().get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UnveiledError::upstream_error(
                "Analysis server",
                "fetch progress",
                Some(status.as_u16()),
                &response.text().await.unwrap_or_default(),
            ));
        }

        let record: ProgressRecord = response.json().await?;
        log::info!("📊 Job {}: {} [{}%]", record.job_id, record.status, record.progress);
        if let Some(error) = &record.error {
            log::error!("❌ {}", error);
        } else if record.complete {
            log::info!("✅ Job complete");
        }
        println!("{}", serde_json::to_string_pretty(&record)?);
        Ok(())
    }

    async fn leaderboard_command(&self) -> UnveiledResult<()> {
        let config = Self::load_config()?;
        let entries = LeaderboardService::new(Self::results_dir(&config)).update()?;

        if entries.is_empty() {
            log::info!("📭 No stored results yet. Run 'unveiled analyze <username>' first.");
            return Ok(());
        }

        for entry in &entries {
            log::info!("{:>3}. {:<39} {:>6.1}  ({} repositories)", entry.rank, entry.username, entry.score, entry.repositories_analyzed);
        }
        Ok(())
    }

    fn load_config() -> UnveiledResult<Config> {
        ConfigManager::load().map_err(|e| {
            log::error!("❌ Failed to load configuration: {}", e);
            log::error!("💡 Run 'unveiled init' to create a configuration file.");
            e
        })
    }

    fn results_dir(config: &Config) -> PathBuf {
        PathBuf::from(&config.client.results_dir)
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}
