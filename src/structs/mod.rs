pub mod analyze_repository_request;
pub mod analyze_request;
pub mod cli;
pub mod config;
pub mod consumer_view;
pub mod github;
pub mod health_report;
pub mod leaderboard_entry;
pub mod profile_analysis;
pub mod progress_record;
pub mod progress_update;
pub mod stored_result;
pub mod stream_event;
