use std::sync::Arc;
use chrono::Utc;
use crate::errors::UnveiledResult;
use crate::structs::progress_record::ProgressRecord;
use crate::structs::progress_update::ProgressUpdate;
use crate::traits::progress_store::ProgressStore;

/// Read-merge-write front for a [`ProgressStore`].
///
/// There is no locking: two writers on the same job race and the later merge wins.
/// In practice only the pipeline serving that job ever writes to it.
#[derive(Clone)]
pub struct ProgressTracker {
    store: Arc<dyn ProgressStore>,
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self { store }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub async fn set_progress(&self, job_id: &str, update: &ProgressUpdate) -> UnveiledResult<ProgressRecord> {
        let mut record = self.store
            .get(job_id)
            .await?
            .unwrap_or_else(|| ProgressRecord::initializing(job_id));

        record.merge(update, Utc::now());
        self.store.set(&record).await?;

        log::debug!("Progress {} -> {}% {}", job_id, record.progress, record.status);
        Ok(record)
    }

    /// First write of a run: replaces whatever an earlier run on the same job left behind.
    pub async fn start_job(&self, job_id: &str, update: &ProgressUpdate) -> UnveiledResult<ProgressRecord> {
        let mut record = ProgressRecord::initializing(job_id);
        record.merge(update, Utc::now());
        self.store.set(&record).await?;

        log::debug!("Progress {} restarted at {}% {}", job_id, record.progress, record.status);
        Ok(record)
    }

    /// Never fails: unknown jobs and store errors both read as a pending record.
    pub async fn get_progress(&self, job_id: &str) -> ProgressRecord {
        match self.store.get(job_id).await {
            Ok(Some(record)) => record,
            Ok(None) => ProgressRecord::pending(job_id),
            Err(e) => {
                log::warn!("⚠️ Failed to read progress for {}: {}", job_id, e.short_message());
                ProgressRecord::pending(job_id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use crate::errors::UnveiledError;
    use crate::services::progress_store::memory_store::MemoryProgressStore;

    fn tracker() -> ProgressTracker {
        ProgressTracker::new(Arc::new(MemoryProgressStore::new()))
    }

    struct BrokenStore;

    #[async_trait]
    impl ProgressStore for BrokenStore {
        async fn get(&self, _job_id: &str) -> UnveiledResult<Option<ProgressRecord>> {
            Err(UnveiledError::store_error("broken", "get", "connection refused"))
        }

        async fn set(&self, _record: &ProgressRecord) -> UnveiledResult<()> {
            Err(UnveiledError::store_error("broken", "set", "connection refused"))
        }

        fn backend_name(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn unknown_job_reads_as_pending() {
        let record = tracker().get_progress("nobody").await;
        assert_eq!(record.status, "Pending");
        assert_eq!(record.progress, 0);
        assert!(!record.complete);
        assert!(record.error.is_none());
    }

    #[tokio::test]
    async fn first_write_starts_from_initializing() {
        let tracker = tracker();
        let record = tracker
            .set_progress("alice", &ProgressUpdate { progress: Some(10), ..ProgressUpdate::default() })
            .await
            .unwrap();

        assert_eq!(record.status, "Initializing...");
        assert_eq!(record.progress, 10);
        assert_eq!(tracker.get_progress("alice").await, record);
    }

    #[tokio::test]
    async fn start_job_discards_a_finished_record() {
        let tracker = tracker();
        tracker.set_progress("alice", &ProgressUpdate::failed("Analyzer down")).await.unwrap();

        let record = tracker.start_job("alice", &ProgressUpdate::step("Fetching GitHub profile...", 10)).await.unwrap();

        assert_eq!(record.progress, 10);
        assert!(!record.complete);
        assert!(record.error.is_none());
        assert_eq!(tracker.get_progress("alice").await, record);
    }

    #[tokio::test]
    async fn updates_stamp_a_later_time() {
        let tracker = tracker();
        let first = tracker.set_progress("alice", &ProgressUpdate::step("A", 10)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = tracker.set_progress("alice", &ProgressUpdate::step("B", 20)).await.unwrap();
        assert!(second.updated_at > first.updated_at);
    }

    #[tokio::test]
    async fn store_failures_read_as_pending_but_writes_report_them() {
        let tracker = ProgressTracker::new(Arc::new(BrokenStore));
        assert_eq!(tracker.get_progress("alice").await.status, "Pending");
        assert!(tracker.set_progress("alice", &ProgressUpdate::step("A", 10)).await.is_err());
    }

    fn update_strategy() -> impl Strategy<Value = ProgressUpdate> {
        (
            proptest::option::of("[a-z ]{1,12}"),
            proptest::option::of(0u8..=100),
            proptest::option::of(any::<bool>()),
            proptest::option::of("[a-z]{1,8}"),
        )
            .prop_map(|(status, progress, complete, error)| ProgressUpdate { status, progress, complete, error })
    }

    proptest! {
        #[test]
        fn last_write_wins_per_field(updates in proptest::collection::vec(update_strategy(), 1..12)) {
            let tracker = tracker();
            let stored = tokio_test::block_on(async {
                for update in &updates {
                    tracker.set_progress("job", update).await.unwrap();
                }
                tracker.get_progress("job").await
            });

            let last_status = updates.iter().rev().find_map(|u| u.status.clone()).unwrap_or_else(|| "Initializing...".to_string());
            let last_progress = updates.iter().rev().find_map(|u| u.progress).unwrap_or(0);
            let last_complete = updates.iter().rev().find_map(|u| u.complete).unwrap_or(false);
            let last_error = updates.iter().rev().find_map(|u| u.error.clone());

            prop_assert_eq!(stored.status, last_status);
            prop_assert_eq!(stored.progress, last_progress);
            prop_assert_eq!(stored.complete, last_complete);
            prop_assert_eq!(stored.error, last_error);
        }
    }
}
