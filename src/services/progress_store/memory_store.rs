use std::sync::Arc;
use async_trait::async_trait;
use dashmap::DashMap;
use crate::errors::UnveiledResult;
use crate::structs::progress_record::ProgressRecord;
use crate::traits::progress_store::ProgressStore;

/// Process-local store. Records are never evicted and vanish with the process.
#[derive(Clone, Default)]
pub struct MemoryProgressStore {
    records: Arc<DashMap<String, ProgressRecord>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn get(&self, job_id: &str) -> UnveiledResult<Option<ProgressRecord>> {
        Ok(self.records.get(job_id).map(|entry| entry.clone()))
    }

    async fn set(&self, record: &ProgressRecord) -> UnveiledResult<()> {
        self.records.insert(record.job_id.clone(), record.clone());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
