use crate::errors::UnveiledResult;
use crate::structs::stored_result::StoredResult;

/// Where a consumer leaves the finished result for the results view.
pub trait ResultSink: Send + Sync {
    fn persist(&self, username: &str, key: &str, result: &StoredResult) -> UnveiledResult<()>;
}
