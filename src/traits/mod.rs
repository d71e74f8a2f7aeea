pub mod navigator;
pub mod profile_source;
pub mod progress_store;
pub mod repository_analyzer;
pub mod result_sink;
