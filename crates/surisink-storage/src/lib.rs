//! Surisink Storage Library
//!
//! This crate provides the object sink abstraction and its S3-compatible
//! implementation.
//!
//! # Object key format
//!
//! `{prefix}/{yyyy}/{mm}/{dd}/{flow_id}/{sha256}_{basename}`, with the date taken
//! from the event's observation time. Key generation is centralized in the
//! `keys` module and must stay byte-for-byte stable: existing buckets are
//! laid out with it.

pub mod factory;
pub mod keys;
pub mod metadata;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_sink;
pub use keys::{base_name, object_key};
#[cfg(feature = "storage-s3")]
pub use s3::S3Sink;
pub use traits::{ObjectSink, StorageError, StorageResult};
