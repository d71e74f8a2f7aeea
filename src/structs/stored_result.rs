use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Artifact persisted by the consumer once a run finishes, read back by the results view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    pub success: bool,
    pub data: Value,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl StoredResult {
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
