use std::sync::Arc;

use surisink_core::DedupeConfig;

use crate::{DedupStore, MemoryDedupStore, SqliteDedupStore, StoreResult};

/// The dedup store handed to workers, plus the persistent backend when one is
/// configured (needed for retention GC).
#[derive(Clone)]
pub struct DedupStores {
    pub store: Arc<dyn DedupStore>,
    pub persistent: Option<Arc<SqliteDedupStore>>,
}

/// Create a dedup store based on configuration
pub async fn create_dedup_store(config: &DedupeConfig) -> StoreResult<DedupStores> {
    if config.enabled {
        let sqlite = Arc::new(SqliteDedupStore::open(&config.sqlite_path).await?);
        tracing::info!(
            event = "dedupe_sqlite_enabled",
            path = %config.sqlite_path.display(),
            retention_days = config.retention_days,
            "Persistent dedupe enabled"
        );
        Ok(DedupStores {
            store: sqlite.clone(),
            persistent: Some(sqlite),
        })
    } else {
        tracing::info!("In-memory dedupe enabled; history is lost on restart");
        Ok(DedupStores {
            store: Arc::new(MemoryDedupStore::new()),
            persistent: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DedupBackend;

    fn config(enabled: bool, path: std::path::PathBuf) -> DedupeConfig {
        DedupeConfig {
            enabled,
            sqlite_path: path,
            retention_days: 0,
            gc_interval_secs: 3600,
        }
    }

    #[tokio::test]
    async fn disabled_uses_memory() {
        let stores = create_dedup_store(&config(false, "unused.db".into()))
            .await
            .unwrap();
        assert_eq!(stores.store.backend_type(), DedupBackend::Memory);
        assert!(stores.persistent.is_none());
    }

    #[tokio::test]
    async fn enabled_opens_sqlite_creating_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/surisink.db");
        let stores = create_dedup_store(&config(true, path.clone())).await.unwrap();

        assert_eq!(stores.store.backend_type(), DedupBackend::Sqlite);
        assert!(stores.persistent.is_some());
        assert!(path.exists());
    }
}
