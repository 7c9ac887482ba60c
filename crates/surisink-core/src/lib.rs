//! Surisink Core Library
//!
//! This crate provides the domain models, error types, configuration, content
//! hashing and MIME guessing shared by every Surisink component.

pub mod config;
pub mod constants;
pub mod content;
pub mod error;
pub mod mime;
pub mod models;

// Re-export commonly used types
pub use config::{
    Config, DedupeConfig, LogFormat, LoggingConfig, PathStrategy, S3Config, SuricataConfig,
    UploaderConfig,
};
pub use content::{hash_file, ContentDigest};
pub use error::{AppError, LogLevel};
pub use mime::guess_mime;
pub use models::{FileEvent, FileRecord};
