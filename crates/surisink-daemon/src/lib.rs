//! Surisink daemon wiring: CLI, logging, startup and shutdown.

pub mod cli;
pub mod setup;
pub mod shutdown;
pub mod telemetry;

pub use cli::{Cli, Command};
pub use setup::{run_daemon, run_gc};
pub use telemetry::init_tracing;
