//! Domain models flowing through the pipeline.

mod event;
mod record;

pub use event::FileEvent;
pub use record::FileRecord;
