//! Configuration module
//!
//! Settings come from `SURISINK_*` environment variables. The config file named
//! on the command line is a dotenv-style file loaded with `dotenvy`; variables
//! already set in the process environment take precedence over the file.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;

use crate::constants::{
    DEFAULT_MAX_LINE_BYTES, DEFAULT_POLL_INTERVAL_MS, DEFAULT_QUEUE_CAPACITY, FILE_ID_PLACEHOLDER,
};

const ENV_PREFIX: &str = "SURISINK_";

/// How an eve.json file event is mapped to a path on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStrategy {
    /// Trust the logged filename, but only when it is already absolute.
    Absolute,
    /// Build the filename from the naming pattern and the numeric file id.
    FileId,
}

impl FromStr for PathStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "absolute" => Ok(PathStrategy::Absolute),
            "file_id" | "file-id" => Ok(PathStrategy::FileId),
            _ => Err(anyhow::anyhow!("Invalid path strategy: {}", s)),
        }
    }
}

impl Display for PathStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PathStrategy::Absolute => write!(f, "absolute"),
            PathStrategy::FileId => write!(f, "file_id"),
        }
    }
}

/// Output format of the process log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Console,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "console" => Ok(LogFormat::Console),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Suricata input settings
#[derive(Clone, Debug)]
pub struct SuricataConfig {
    pub eve_json_path: PathBuf,
    pub filestore_dir: PathBuf,
    pub path_strategy: PathStrategy,
    pub file_naming_pattern: String,
    pub use_date_subdirs: bool,
    /// chrono strftime layout of the date subdirectory.
    pub date_layout: String,
    pub poll_interval_ms: u64,
    pub max_line_bytes: usize,
    pub queue_capacity: usize,
}

/// Worker pool and retry settings
#[derive(Clone, Debug)]
pub struct UploaderConfig {
    pub workers: usize,
    pub prefix: String,
    pub max_retries: u32,
    pub backoff_ms: i64,
    pub sensor: Option<String>,
}

/// S3-compatible object store settings
#[derive(Clone, Debug)]
pub struct S3Config {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub use_ssl: bool,
    pub region: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// debug | info | warn | error
    pub level: String,
    pub format: LogFormat,
}

/// Persistent dedupe settings
#[derive(Clone, Debug)]
pub struct DedupeConfig {
    pub enabled: bool,
    pub sqlite_path: PathBuf,
    /// Rows not seen for this many days are garbage-collected. 0 = disabled.
    pub retention_days: u32,
    pub gc_interval_secs: u64,
}

/// Root configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub suricata: SuricataConfig,
    pub uploader: UploaderConfig,
    pub s3: S3Config,
    pub logging: LoggingConfig,
    pub dedupe: DedupeConfig,
}

impl Config {
    /// Load the dotenv-style file at `path`, then read the environment.
    pub fn load(path: &Path) -> Result<Self, anyhow::Error> {
        dotenvy::from_path(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from a key lookup (keys include the `SURISINK_` prefix).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        const WORKERS: usize = 4;
        const MAX_RETRIES: u32 = 5;
        const BACKOFF_MS: i64 = 500;
        const GC_INTERVAL_SECS: u64 = 3600;

        let var = |name: &str| {
            lookup(&format!("{}{}", ENV_PREFIX, name))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let suricata = SuricataConfig {
            eve_json_path: var("EVE_JSON_PATH")
                .map(PathBuf::from)
                .ok_or_else(|| anyhow::anyhow!("SURISINK_EVE_JSON_PATH must be set"))?,
            filestore_dir: var("FILESTORE_DIR").map(PathBuf::from).unwrap_or_default(),
            path_strategy: var("PATH_STRATEGY")
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or(PathStrategy::FileId),
            file_naming_pattern: var("FILE_NAMING_PATTERN")
                .unwrap_or_else(|| format!("file.{}", FILE_ID_PLACEHOLDER)),
            use_date_subdirs: parse_bool_or(&var, "USE_DATE_SUBDIRS", false)?,
            date_layout: var("DATE_LAYOUT").unwrap_or_else(|| "%Y/%m/%d".to_string()),
            poll_interval_ms: parse_or(&var, "POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?,
            max_line_bytes: parse_or(&var, "MAX_LINE_BYTES", DEFAULT_MAX_LINE_BYTES)?,
            queue_capacity: parse_or(&var, "QUEUE_CAPACITY", DEFAULT_QUEUE_CAPACITY)?,
        };

        let uploader = UploaderConfig {
            workers: parse_or(&var, "WORKERS", WORKERS)?.max(1),
            prefix: var("PREFIX").unwrap_or_else(|| "suricata".to_string()),
            max_retries: parse_or(&var, "MAX_RETRIES", MAX_RETRIES)?,
            backoff_ms: parse_or(&var, "BACKOFF_MS", BACKOFF_MS)?,
            sensor: var("SENSOR"),
        };

        let s3 = S3Config {
            endpoint: var("S3_ENDPOINT").unwrap_or_default(),
            access_key: var("S3_ACCESS_KEY").unwrap_or_default(),
            secret_key: var("S3_SECRET_KEY").unwrap_or_default(),
            bucket: var("S3_BUCKET").unwrap_or_default(),
            use_ssl: parse_bool_or(&var, "S3_USE_SSL", false)?,
            region: var("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
        };

        let logging = LoggingConfig {
            level: var("LOG_LEVEL")
                .unwrap_or_else(|| "info".to_string())
                .to_lowercase(),
            format: var("LOG_FORMAT")
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or(LogFormat::Json),
        };

        let dedupe = DedupeConfig {
            enabled: parse_bool_or(&var, "DEDUPE_ENABLED", false)?,
            sqlite_path: var("DEDUPE_SQLITE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data/surisink.db")),
            retention_days: parse_or(&var, "DEDUPE_RETENTION_DAYS", 0)?,
            gc_interval_secs: parse_or(&var, "DEDUPE_GC_INTERVAL_SECS", GC_INTERVAL_SECS)?,
        };

        let config = Config {
            suricata,
            uploader,
            s3,
            logging,
            dedupe,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.suricata.path_strategy == PathStrategy::FileId {
            if self.suricata.filestore_dir.as_os_str().is_empty() {
                return Err(anyhow::anyhow!(
                    "SURISINK_FILESTORE_DIR must be set when using the file_id path strategy"
                ));
            }
            if !self.suricata.file_naming_pattern.contains(FILE_ID_PLACEHOLDER) {
                return Err(anyhow::anyhow!(
                    "SURISINK_FILE_NAMING_PATTERN must contain {}",
                    FILE_ID_PLACEHOLDER
                ));
            }
        }

        if self.suricata.poll_interval_ms == 0 {
            return Err(anyhow::anyhow!("SURISINK_POLL_INTERVAL_MS must be positive"));
        }
        if self.suricata.max_line_bytes == 0 || self.suricata.queue_capacity == 0 {
            return Err(anyhow::anyhow!(
                "SURISINK_MAX_LINE_BYTES and SURISINK_QUEUE_CAPACITY must be positive"
            ));
        }

        if self.uploader.max_retries == 0 {
            return Err(anyhow::anyhow!("SURISINK_MAX_RETRIES must be at least 1"));
        }

        if self.s3.endpoint.is_empty() || self.s3.bucket.is_empty() {
            return Err(anyhow::anyhow!(
                "SURISINK_S3_ENDPOINT and SURISINK_S3_BUCKET must be set"
            ));
        }
        if self.s3.access_key.is_empty() || self.s3.secret_key.is_empty() {
            return Err(anyhow::anyhow!(
                "SURISINK_S3_ACCESS_KEY and SURISINK_S3_SECRET_KEY must be set"
            ));
        }

        if self.dedupe.enabled && self.dedupe.sqlite_path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!(
                "SURISINK_DEDUPE_SQLITE_PATH must be set when dedupe is enabled"
            ));
        }

        Ok(())
    }
}

fn parse_or<T, V>(var: V, name: &str, default: T) -> Result<T, anyhow::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    V: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(v) => v
            .parse()
            .with_context(|| format!("Invalid value for {}{}: {}", ENV_PREFIX, name, v)),
        None => Ok(default),
    }
}

/// Accepts the usual boolean spellings: true/false, t/f, 1/0, yes/no, on/off.
fn parse_bool_or<V>(var: V, name: &str, default: bool) -> Result<bool, anyhow::Error>
where
    V: Fn(&str) -> Option<String>,
{
    let Some(v) = var(name) else {
        return Ok(default);
    };
    match v.to_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" | "on" => Ok(true),
        "false" | "f" | "0" | "no" | "n" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "Invalid boolean for {}{}: {}",
            ENV_PREFIX,
            name,
            v
        )),
    }
}
