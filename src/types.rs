use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants;

/// A single logical data item flowing through the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Assigned when the record is parsed, not carried over from the source
    pub timestamp: DateTime<Utc>,
    /// Always constructed false; reserved for downstream consumers
    pub processed: bool,
}

/// Input formats recognized by the intake scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    DelimitedText,
}

impl RecordFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case(constants::JSON_EXT) {
            Some(RecordFormat::Json)
        } else if ext.eq_ignore_ascii_case(constants::DELIMITED_EXT) {
            Some(RecordFormat::DelimitedText)
        } else {
            None
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}
