use std::time::Duration;

pub const DEFAULT_SERVER_HOST: [u8; 4] = [127, 0, 0, 1];
pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_WEB_BASE_URL: &str = "http://localhost:3000";
pub const MAX_JOB_ID_LENGTH: usize = 64;
pub const SSE_KEEP_ALIVE_SECS: u64 = 15;

pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const GITHUB_USERNAME_MAX_LENGTH: usize = 39;
pub const GITHUB_DEFAULT_RATE_LIMIT: u32 = 5000;
pub const GITHUB_REQUEST_ATTEMPTS: usize = 3;
pub const GITHUB_REPOS_PER_PAGE: u32 = 100;

pub const DEFAULT_ANALYZER_URL: &str = "http://127.0.0.1:8000";
pub const ANALYZE_REPOSITORY_ENDPOINT: &str = "api/auth/analyze-repository";
pub const DEFAULT_MAX_REPOSITORIES: usize = 5;
pub const DEFAULT_MAX_FILES_PER_REPOSITORY: u32 = 50;
pub const DEFAULT_ANALYZER_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_ANALYZER_REQUESTS_PER_MINUTE: u32 = 30;
pub const DEFAULT_ANALYZER_BURST_PER_SECOND: u32 = 2;

pub const PROGRESS_KEY_PREFIX: &str = "progress:";
pub const PROGRESS_TTL_SECS: u64 = 2 * 60 * 60;
pub const STATUS_INITIALIZING: &str = "Initializing...";
pub const STATUS_PENDING: &str = "Pending";

pub const CLIENT_TIMEOUT_MINUTES: u64 = 10;
pub const RESULT_STORAGE_KEY: &str = "profileAnalysisResult";
pub const LEADERBOARD_FILE_NAME: &str = "leaderboard.json";
pub const MAX_SUMMARY_STRENGTHS: usize = 10;

pub const CONFIG_DIR_NAME: &str = ".unveiled";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const GITHUB_TOKENS_ENV: &str = "GITHUB_TOKENS";
pub const ANALYZER_URL_ENV: &str = "ANALYZER_SERVICE_URL";
pub const REDIS_REST_URL_ENV: &str = "UPSTASH_REDIS_REST_URL";
pub const REDIS_REST_TOKEN_ENV: &str = "UPSTASH_REDIS_REST_TOKEN";
pub const PORT_ENV: &str = "PORT";

pub fn timeout_duration(minutes: u64) -> Duration {
    Duration::from_secs(minutes * 60)
}
