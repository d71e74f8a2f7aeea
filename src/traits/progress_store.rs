use async_trait::async_trait;
use crate::errors::UnveiledResult;
use crate::structs::progress_record::ProgressRecord;

/// Backing storage for job progress records, keyed by job id.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn get(&self, job_id: &str) -> UnveiledResult<Option<ProgressRecord>>;

    async fn set(&self, record: &ProgressRecord) -> UnveiledResult<()>;

    /// Short label for logs and health output.
    fn backend_name(&self) -> &'static str;
}
