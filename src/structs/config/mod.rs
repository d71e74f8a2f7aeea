pub mod analyzer_config;
pub mod client_config;
pub mod config;
pub mod github_config;
pub mod server_config;
pub mod store_config;
