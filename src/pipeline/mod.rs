pub mod clean;
pub mod emit;
pub mod organize;
pub mod parser;

use chrono::Utc;
use metrics::{counter, histogram};
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

use crate::archive;
use crate::config::Settings;
use crate::error::{Result, SorterError};
use crate::report::{self, RunReport};
use crate::types::{Record, RecordFormat};

/// Stages of one run, in execution order. `Failed` is reachable from any of
/// them; there is no retry and no resumption from a later stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Init,
    Read,
    Clean,
    Organize,
    Generate,
    Archive,
    Report,
    Done,
    Failed,
}

impl std::fmt::Display for RunStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunStage::Init => "Init",
            RunStage::Read => "Read",
            RunStage::Clean => "Clean",
            RunStage::Organize => "Organize",
            RunStage::Generate => "Generate",
            RunStage::Archive => "Archive",
            RunStage::Report => "Report",
            RunStage::Done => "Done",
            RunStage::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// Per-run state threaded through the stages. Every run owns its own
/// context, so independent runs stay isolated.
struct RunContext {
    settings: Settings,
    input_dir: PathBuf,
    output_dir: PathBuf,
    run_token: String,
    stage: RunStage,
    started: std::time::Instant,
}

impl RunContext {
    fn new(settings: Settings, input_dir: &Path, output_dir: &Path) -> Self {
        Self {
            settings,
            input_dir: input_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            run_token: Utc::now().format("%Y%m%d_%H%M%S").to_string(),
            stage: RunStage::Init,
            started: std::time::Instant::now(),
        }
    }

    fn enter(&mut self, stage: RunStage) {
        self.stage = stage;
        info!("▶️  Stage: {}", stage);
    }
}

/// Result of a complete pipeline run
#[derive(Debug)]
pub struct RunOutcome {
    pub files_read: usize,
    pub records_parsed: usize,
    pub duplicates_removed: usize,
    pub invalid_removed: usize,
    pub buckets: usize,
    pub records_written: u64,
    pub output_files: Vec<PathBuf>,
    pub report_file: Option<PathBuf>,
}

pub struct Sorter;

impl Sorter {
    /// Run the complete intake pipeline once over the given directories.
    #[instrument(skip_all, fields(input = %input_dir.display(), output = %output_dir.display()))]
    pub async fn run(
        settings: Settings,
        input_dir: &Path,
        output_dir: &Path,
    ) -> Result<RunOutcome> {
        let mut ctx = RunContext::new(settings, input_dir, output_dir);
        info!("🚀 Starting intake run {}", ctx.run_token);
        println!("🚀 Starting intake run {}", ctx.run_token);
        counter!("sorter_runs_total").increment(1);

        match Self::run_stages(&mut ctx).await {
            Ok(outcome) => {
                ctx.stage = RunStage::Done;
                let total_secs = ctx.started.elapsed().as_secs_f64();
                histogram!("sorter_run_duration_seconds").record(total_secs);
                info!("✅ Run {} finished: {} records written", ctx.run_token, outcome.records_written);
                Ok(outcome)
            }
            Err(e) => {
                let failed_during = ctx.stage;
                ctx.stage = RunStage::Failed;
                error!("Run {} failed during {}: {}", ctx.run_token, failed_during, e);
                counter!("sorter_run_failures_total").increment(1);
                Err(e)
            }
        }
    }

    async fn run_stages(ctx: &mut RunContext) -> Result<RunOutcome> {
        // Init: make sure both directories exist before anything is read
        ctx.enter(RunStage::Init);
        tokio::fs::create_dir_all(&ctx.input_dir).await?;
        tokio::fs::create_dir_all(&ctx.output_dir).await?;

        // Read: scan the input dir and parse every qualifying file
        ctx.enter(RunStage::Read);
        let input_files = Self::scan_input_dir(&ctx.input_dir).await?;
        info!("📥 Found {} input files", input_files.len());
        println!("📥 Found {} input files", input_files.len());

        let mut records: Vec<Record> = Vec::new();
        for file in &input_files {
            records.extend(Self::parse_file(file).await?);
        }
        let records_parsed = records.len();
        info!("✅ Parsed {} raw records", records_parsed);
        println!("✅ Parsed {} raw records", records_parsed);
        histogram!("sorter_records_parsed_per_run").record(records_parsed as f64);

        // Clean: collapse duplicate ids, drop records missing required fields
        ctx.enter(RunStage::Clean);
        let (cleaned, duplicates_removed, invalid_removed) = if ctx.settings.enable_cleaning {
            let before = records.len();
            let deduped = if ctx.settings.remove_duplicates {
                clean::dedupe(records)
            } else {
                records
            };
            let duplicates_removed = before - deduped.len();
            let after_dedup = deduped.len();
            let validated = clean::validate(deduped);
            let invalid_removed = after_dedup - validated.len();
            info!(
                "🧹 Cleaned records: {} kept ({} duplicates, {} invalid removed)",
                validated.len(),
                duplicates_removed,
                invalid_removed
            );
            println!(
                "🧹 Cleaned records: {} kept ({} duplicates, {} invalid removed)",
                validated.len(),
                duplicates_removed,
                invalid_removed
            );
            (validated, duplicates_removed, invalid_removed)
        } else {
            warn!("Cleaning disabled; passing {} records through", records.len());
            (records, 0, 0)
        };
        counter!("sorter_duplicates_removed_total").increment(duplicates_removed as u64);
        counter!("sorter_invalid_removed_total").increment(invalid_removed as u64);

        // Organize: bucket by category
        ctx.enter(RunStage::Organize);
        let buckets = organize::organize(cleaned);
        info!("🗂️  Organized records into {} categories", buckets.len());
        println!("🗂️  Organized records into {} categories", buckets.len());

        // Generate: one export file per bucket
        ctx.enter(RunStage::Generate);
        let summary = emit::emit_buckets(
            &buckets,
            &ctx.output_dir,
            &ctx.run_token,
            &ctx.settings.delimiter,
        )?;
        counter!("sorter_records_written_total").increment(summary.records_written);

        // Archive: relocate the consumed inputs
        ctx.enter(RunStage::Archive);
        if ctx.settings.auto_archive {
            archive::archive_inputs(&ctx.input_dir, &input_files)?;
        } else {
            warn!("Auto-archive disabled; leaving input files in place");
        }

        // Report: one JSON summary per run
        ctx.enter(RunStage::Report);
        let report_file = if ctx.settings.generate_report {
            let report = RunReport::success(summary.records_written, &ctx.output_dir);
            let path = report::write_report(&report, &ctx.output_dir, &ctx.run_token)?;
            info!("📄 Wrote run report to {}", path.display());
            println!("📄 Wrote run report to {}", path.display());
            Some(path)
        } else {
            warn!("Report generation disabled");
            None
        };

        Ok(RunOutcome {
            files_read: input_files.len(),
            records_parsed,
            duplicates_removed,
            invalid_removed,
            buckets: buckets.len(),
            records_written: summary.records_written,
            output_files: summary.files,
            report_file,
        })
    }

    /// Non-recursive scan for files in the two supported formats. Entries
    /// are sorted by file name so record arrival order is deterministic.
    async fn scan_input_dir(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if RecordFormat::from_path(&path).is_some() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Read one input file fully and run it through the parser for its
    /// format. A malformed file aborts the whole run; there is no per-file
    /// isolation.
    async fn parse_file(path: &Path) -> Result<Vec<Record>> {
        let Some(format) = RecordFormat::from_path(path) else {
            return Ok(Vec::new());
        };
        let raw = tokio::fs::read_to_string(path).await?;
        match parser::parser_for(format).parse(&raw) {
            Ok(records) => Ok(records),
            Err(SorterError::Json(source)) => Err(SorterError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) => Err(e),
        }
    }
}
