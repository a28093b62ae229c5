use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{Result, SorterError};

/// Runtime settings for one intake run. Every field has a default, so a
/// missing settings file behaves like a stock install.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Gates the whole cleaning stage (dedup + validation)
    pub enable_cleaning: bool,
    /// Gates duplicate collapsing inside the cleaning stage
    pub remove_duplicates: bool,
    /// Move consumed input files into the archive subdirectory after a run
    pub auto_archive: bool,
    /// Write the JSON run report after generation
    pub generate_report: bool,
    /// Column separator used in generated export files
    pub delimiter: String,
    /// Text encoding for file I/O; only utf-8 is supported
    pub encoding: String,
    /// Declared for the outer scheduler; the pipeline itself never retries
    pub retry_attempts: u32,
    /// Declared for the outer scheduler; the pipeline runs once per invocation
    pub process_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_cleaning: true,
            remove_duplicates: true,
            auto_archive: true,
            generate_report: true,
            delimiter: ",".to_string(),
            encoding: "utf-8".to_string(),
            retry_attempts: 3,
            process_interval_secs: 60,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file, falling back to defaults when the
    /// file does not exist. Settings are validated before any stage runs.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                SorterError::Config(format!(
                    "Failed to read settings file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            toml::from_str(&content)?
        } else {
            info!("No settings file at {}; using defaults", path.display());
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.delimiter.chars().count() != 1 {
            return Err(SorterError::Config(format!(
                "delimiter must be a single character, got '{}'",
                self.delimiter
            )));
        }
        if !self.encoding.eq_ignore_ascii_case("utf-8") {
            return Err(SorterError::Config(format!(
                "unsupported encoding '{}'; only utf-8 is supported",
                self.encoding
            )));
        }
        if self.retry_attempts > 10 {
            return Err(SorterError::Config(format!(
                "retry_attempts must be at most 10, got {}",
                self.retry_attempts
            )));
        }
        if self.process_interval_secs == 0 {
            return Err(SorterError::Config(
                "process_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
