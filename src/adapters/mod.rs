pub mod analyzer_adapter;
pub mod github_adapter;
