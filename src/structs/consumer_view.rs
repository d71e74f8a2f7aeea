use serde::Serialize;

/// What a consumer exposes to whatever is rendering the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumerView {
    pub status: String,
    pub progress: u8,
    pub complete: bool,
    pub error: Option<String>,
}

impl Default for ConsumerView {
    fn default() -> Self {
        Self {
            status: "Starting analysis...".to_string(),
            progress: 0,
            complete: false,
            error: None,
        }
    }
}
