pub mod analysis_pipeline;
pub mod file_result_sink;
pub mod leaderboard;
pub mod profile_aggregator;
pub mod progress_store;
pub mod progress_tracker;
pub mod rate_limiter;
pub mod stream_consumer;
pub mod token_rotator;
