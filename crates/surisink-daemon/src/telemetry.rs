use surisink_core::{LogFormat, LoggingConfig};
use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const LEVELS: [&str; 4] = ["debug", "info", "warn", "error"];

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(&config.level)))?;
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false),
            )
            .try_init()?,
        LogFormat::Console => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .event_format(Format::default().compact().with_target(false)),
            )
            .try_init()?,
    }

    Ok(())
}

/// Filter for the configured level; SDK and driver chatter is held at `warn`.
fn default_directives(level: &str) -> String {
    let level = if LEVELS.contains(&level) { level } else { "info" };
    format!(
        "{},aws_config=warn,aws_smithy_runtime=warn,hyper=warn,sqlx=warn",
        level
    )
}
