pub mod memory_store;
pub mod redis_store;

use std::sync::Arc;
use crate::structs::config::store_config::StoreConfig;
use crate::traits::progress_store::ProgressStore;
use memory_store::MemoryProgressStore;
use redis_store::RedisProgressStore;

/// Remote cache when both credentials are configured, otherwise process memory.
pub fn build_progress_store(config: &StoreConfig) -> Arc<dyn ProgressStore> {
    match config.redis_credentials() {
        Some((url, token)) => {
            log::info!("🗄️ Progress store: redis ({})", url);
            Arc::new(RedisProgressStore::new(url, token, config.ttl_secs))
        }
        None => {
            log::info!("🗄️ Progress store: in-memory (no cache credentials configured)");
            Arc::new(MemoryProgressStore::new())
        }
    }
}
