//! Mapping from a logged file id / filename to the file on disk.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use surisink_core::constants::FILE_ID_PLACEHOLDER;
use surisink_core::{PathStrategy, SuricataConfig};

/// Resolves where Suricata's filestore put an extracted file.
#[derive(Debug, Clone)]
pub struct PathResolver {
    strategy: PathStrategy,
    filestore_dir: PathBuf,
    naming_pattern: String,
    date_layout: Option<String>,
}

impl PathResolver {
    pub fn new(config: &SuricataConfig) -> Self {
        Self {
            strategy: config.path_strategy,
            filestore_dir: config.filestore_dir.clone(),
            naming_pattern: config.file_naming_pattern.clone(),
            date_layout: config
                .use_date_subdirs
                .then(|| config.date_layout.clone()),
        }
    }

    /// Local path for an event, or `None` when the strategy cannot produce one.
    pub fn resolve(
        &self,
        observed_at: &DateTime<FixedOffset>,
        file_id: i64,
        original_name: &str,
    ) -> Option<PathBuf> {
        match self.strategy {
            PathStrategy::Absolute => {
                let path = Path::new(original_name);
                path.is_absolute().then(|| path.to_path_buf())
            }
            PathStrategy::FileId => {
                let name = self
                    .naming_pattern
                    .replace(FILE_ID_PLACEHOLDER, &file_id.to_string());
                match &self.date_layout {
                    Some(layout) => {
                        let mut subdir = String::new();
                        // An invalid layout fails here instead of panicking in Display.
                        write!(subdir, "{}", observed_at.format(layout)).ok()?;
                        Some(self.filestore_dir.join(subdir).join(name))
                    }
                    None => Some(self.filestore_dir.join(name)),
                }
            }
        }
    }
}
