use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

mod archive;
mod config;
mod constants;
mod error;
mod logging;
mod pipeline;
mod report;
mod types;

use crate::config::Settings;
use crate::pipeline::Sorter;

#[derive(Parser)]
#[command(name = "record_sorter")]
#[command(about = "Batch record intake: dedupe, categorize, and export by category")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one intake pass over the input directory
    Run {
        /// Directory scanned for incoming record files
        #[arg(long, default_value = "data/incoming")]
        input: PathBuf,
        /// Directory that category exports and the run report are written to
        #[arg(long, default_value = "output")]
        output: PathBuf,
        /// Path to the TOML settings file
        #[arg(long, default_value = "config.toml")]
        config: PathBuf,
    },
    /// Validate the settings file and print the effective values
    CheckConfig {
        /// Path to the TOML settings file
        #[arg(long, default_value = "config.toml")]
        config: PathBuf,
    },
}

fn load_settings(path: &PathBuf) -> Settings {
    match Settings::load(path) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Invalid settings: {}", e);
            eprintln!("❌ Invalid settings: {e}");
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            output,
            config,
        } => {
            let settings = load_settings(&config);

            match Sorter::run(settings, &input, &output).await {
                Ok(outcome) => {
                    println!("\n📊 Run Results:");
                    println!("   Input files: {}", outcome.files_read);
                    println!("   Records parsed: {}", outcome.records_parsed);
                    println!("   Duplicates removed: {}", outcome.duplicates_removed);
                    println!("   Invalid removed: {}", outcome.invalid_removed);
                    println!("   Categories: {}", outcome.buckets);
                    println!("   Records written: {}", outcome.records_written);
                    for file in &outcome.output_files {
                        println!("   Output file: {}", file.display());
                    }
                    if let Some(report) = &outcome.report_file {
                        println!("   Report: {}", report.display());
                    }
                    println!("✅ Intake run completed successfully");
                }
                Err(e) => {
                    error!("Intake run failed: {}", e);
                    eprintln!("❌ Intake run failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::CheckConfig { config } => {
            let settings = load_settings(&config);
            println!("✅ Settings are valid:");
            println!("   enable_cleaning: {}", settings.enable_cleaning);
            println!("   remove_duplicates: {}", settings.remove_duplicates);
            println!("   auto_archive: {}", settings.auto_archive);
            println!("   generate_report: {}", settings.generate_report);
            println!("   delimiter: '{}'", settings.delimiter);
            println!("   encoding: {}", settings.encoding);
            println!("   retry_attempts: {}", settings.retry_attempts);
            println!("   process_interval_secs: {}", settings.process_interval_secs);
        }
    }
}
