//! Surisink Dedupe Library
//!
//! Answers "has this content been uploaded before" for the worker pool.
//! Two backends share the [`DedupStore`] trait:
//!
//! - [`MemoryDedupStore`]: a process-lifetime hash set, forgotten on restart.
//! - [`SqliteDedupStore`]: a durable `seen` table with retention-based GC.
//!
//! # Check-then-mark
//!
//! `check` and `mark` are separate calls. Two workers that hash identical
//! content at the same time can both see `check == false` and both upload
//! before either marks. The stores prevent steady-state reprocessing of known
//! content; they do not give at-most-once uploads under a concurrent first
//! sighting.

pub mod factory;
pub mod gc;
pub mod memory;
pub mod sqlite;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_dedup_store, DedupStores};
pub use gc::spawn_retention_reaper;
pub use memory::MemoryDedupStore;
pub use sqlite::{DedupRecord, SqliteDedupStore};
pub use traits::{DedupBackend, DedupStore, StoreError, StoreResult};
