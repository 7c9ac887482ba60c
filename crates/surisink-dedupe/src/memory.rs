//! Volatile dedup store.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::traits::{DedupBackend, DedupStore, StoreError, StoreResult};

/// In-process set of seen content hashes.
///
/// Grows for the lifetime of the process and is never persisted; a restart
/// forgets everything and previously uploaded content will be uploaded again.
#[derive(Debug, Default)]
pub struct MemoryDedupStore {
    seen: Mutex<HashSet<String>>,
}

impl MemoryDedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.seen.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DedupStore for MemoryDedupStore {
    async fn check(&self, content_hash: &str) -> StoreResult<bool> {
        let seen = self.seen.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(seen.contains(content_hash))
    }

    async fn mark(
        &self,
        content_hash: &str,
        _object_key: &str,
        _size_bytes: u64,
        _mime_type: &str,
    ) -> StoreResult<()> {
        let mut seen = self.seen.lock().map_err(|_| StoreError::LockPoisoned)?;
        seen.insert(content_hash.to_string());
        Ok(())
    }

    fn backend_type(&self) -> DedupBackend {
        DedupBackend::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unseen_until_marked() {
        let store = MemoryDedupStore::new();
        assert!(!store.check("abc").await.unwrap());

        store.mark("abc", "k", 3, "text/plain").await.unwrap();
        assert!(store.check("abc").await.unwrap());
        assert!(!store.check("abd").await.unwrap());
    }

    #[tokio::test]
    async fn marking_twice_keeps_one_entry() {
        let store = MemoryDedupStore::new();
        store.mark("abc", "k1", 3, "text/plain").await.unwrap();
        store.mark("abc", "k2", 3, "text/plain").await.unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn starts_empty() {
        let store = MemoryDedupStore::new();
        assert!(store.is_empty());
        assert_eq!(store.backend_type(), DedupBackend::Memory);
    }
}
