pub mod analysis_server;
pub mod browser_navigator;
