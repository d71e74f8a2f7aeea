use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsumerError {
    #[error("Failed to reach analysis server: {0}")]
    Network(String),

    #[error("Analysis request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Remote(String),

    #[error("Analysis timed out after {} minutes", .0.as_secs() / 60)]
    Timeout(Duration),

    #[error("Stream ended before the analysis finished")]
    Incomplete,

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("Failed to store analysis result: {0}")]
    Persist(String),
}
