use serde::{Deserialize, Serialize};

/// Partial write to a job's progress record. Absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProgressUpdate {
    pub fn step(status: &str, progress: u8) -> Self {
        Self {
            status: Some(status.to_string()),
            progress: Some(progress),
            ..Self::default()
        }
    }

    pub fn completed(status: &str) -> Self {
        Self {
            status: Some(status.to_string()),
            progress: Some(100),
            complete: Some(true),
            error: None,
        }
    }

    pub fn failed(message: &str) -> Self {
        Self {
            status: Some("Failed".to_string()),
            progress: None,
            complete: Some(true),
            error: Some(message.to_string()),
        }
    }
}
