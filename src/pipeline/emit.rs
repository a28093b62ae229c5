use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::pipeline::organize::CategoryBuckets;
use crate::types::Record;

const HEADER_COLUMNS: [&str; 5] = ["ID", "Name", "Category", "Timestamp", "Processed"];

/// What the emitter wrote for one run.
#[derive(Debug, Default)]
pub struct EmitSummary {
    pub records_written: u64,
    pub files: Vec<PathBuf>,
}

/// Write one delimited-text file per bucket into the output dir and return
/// the running total of records written.
pub fn emit_buckets(
    buckets: &CategoryBuckets,
    output_dir: &Path,
    run_token: &str,
    delimiter: &str,
) -> Result<EmitSummary> {
    let mut summary = EmitSummary::default();
    let mut used_names: HashSet<String> = HashSet::new();

    for (category, records) in buckets {
        let filename = output_filename(category, run_token, &mut used_names);
        let path = output_dir.join(&filename);
        fs::write(&path, render_table(records, delimiter))?;
        info!("💾 Wrote {} records to {}", records.len(), filename);
        summary.records_written += records.len() as u64;
        summary.files.push(path);
    }

    Ok(summary)
}

/// Lower-cased category name plus the run token. Categories that collapse to
/// the same lower-cased name within one run get a numeric suffix.
fn output_filename(category: &str, run_token: &str, used: &mut HashSet<String>) -> String {
    let base = format!("{}_{}", category.to_lowercase(), run_token);
    let mut candidate = base.clone();
    let mut n = 1;
    while !used.insert(candidate.clone()) {
        n += 1;
        candidate = format!("{base}_{n}");
    }
    format!("{candidate}.csv")
}

/// Header row plus one row per record. Field values are wrapped in double
/// quotes verbatim; embedded quotes or delimiters are not escaped.
fn render_table(records: &[Record], delimiter: &str) -> String {
    let mut out = String::new();
    out.push_str(&HEADER_COLUMNS.join(delimiter));
    out.push('\n');
    for record in records {
        let row = [
            format!("\"{}\"", record.id),
            format!("\"{}\"", record.name),
            format!("\"{}\"", record.category),
            format!("\"{}\"", record.timestamp.to_rfc3339()),
            record.processed.to_string(),
        ];
        out.push_str(&row.join(delimiter));
        out.push('\n');
    }
    out
}
