//! Streaming GitHub profile analysis: a warp server that runs the analysis pipeline and reports
//! each milestone over server-sent events, a progress store (Redis REST or in-memory) for polling,
//! and a client that consumes the stream, persists the result and ranks stored profiles.

pub mod adapters;
pub mod config;
pub mod enums;
pub mod errors;
pub mod helpers;
pub mod logger;
pub mod services;
pub mod structs;
pub mod traits;
pub mod ui;
pub mod workers;
