use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::Result;

/// Summary artifact written at the end of a successful run. A failed run
/// aborts before this is built, so "SUCCESS" is the only status ever
/// recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub total_records: u64,
    pub output_dir: String,
    pub status: String,
    /// Wall-clock completion instant in epoch milliseconds. A point in
    /// time, not an elapsed duration.
    pub finished_at_ms: i64,
}

impl RunReport {
    pub fn success(total_records: u64, output_dir: &Path) -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            generated_at: now,
            total_records,
            output_dir: output_dir.to_string_lossy().to_string(),
            status: "SUCCESS".to_string(),
            finished_at_ms: now.timestamp_millis(),
        }
    }
}

/// Serialize the report next to the generated export files.
pub fn write_report(report: &RunReport, output_dir: &Path, run_token: &str) -> Result<PathBuf> {
    let path = output_dir.join(format!("report_{run_token}.json"));
    fs::write(&path, serde_json::to_string_pretty(report)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn success_report_carries_run_totals() {
        let report = RunReport::success(42, Path::new("output"));
        assert_eq!(report.status, "SUCCESS");
        assert_eq!(report.total_records, 42);
        assert_eq!(report.output_dir, "output");
        assert_eq!(report.finished_at_ms, report.generated_at.timestamp_millis());
    }

    #[test]
    fn written_report_round_trips() {
        let dir = tempdir().unwrap();
        let report = RunReport::success(2, dir.path());

        let path = write_report(&report, dir.path(), "20250115_083000").unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "report_20250115_083000.json"
        );

        let parsed: RunReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.run_id, report.run_id);
        assert_eq!(parsed.total_records, 2);
        assert_eq!(parsed.status, "SUCCESS");
    }
}
