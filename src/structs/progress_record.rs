use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::config::constants::{STATUS_INITIALIZING, STATUS_PENDING};
use crate::structs::progress_update::ProgressUpdate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub job_id: String,
    pub status: String,
    pub progress: u8,
    pub updated_at: DateTime<Utc>,
    pub complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProgressRecord {
    fn blank(job_id: &str, status: &str) -> Self {
        Self {
            job_id: job_id.to_string(),
            status: status.to_string(),
            progress: 0,
            updated_at: Utc::now(),
            complete: false,
            error: None,
        }
    }

    /// Base record for the first write of a job.
    pub fn initializing(job_id: &str) -> Self {
        Self::blank(job_id, STATUS_INITIALIZING)
    }

    /// What readers see for a job nobody has written yet.
    pub fn pending(job_id: &str) -> Self {
        Self::blank(job_id, STATUS_PENDING)
    }

    /// Merges every present field of `update` and stamps `updated_at`.
    pub fn merge(&mut self, update: &ProgressUpdate, now: DateTime<Utc>) {
        if let Some(status) = &update.status {
            self.status.clone_from(status);
        }
        if let Some(progress) = update.progress {
            self.progress = progress.min(100);
        }
        if let Some(complete) = update.complete {
            self.complete = complete;
        }
        if let Some(error) = &update.error {
            self.error = Some(error.clone());
        }
        self.updated_at = now;
    }
}
