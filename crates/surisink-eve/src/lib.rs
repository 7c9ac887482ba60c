//! Surisink EVE Library
//!
//! Tails a Suricata `eve.json` log from its current end and turns stored
//! `fileinfo` events into [`FileEvent`](surisink_core::FileEvent)s on a
//! bounded queue.
//!
//! Delivery is at-least-once only for lines appended after the tailer opened
//! the file. Lines written before start are never replayed and events that
//! find the queue full are dropped.

pub mod decode;
pub mod record;
pub mod resolve;
pub mod tailer;

// Re-export commonly used types
pub use decode::EventDecoder;
pub use resolve::PathResolver;
pub use tailer::{EveTailer, TailError};
