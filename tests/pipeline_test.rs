use anyhow::Result;
use std::fs;
use tempfile::tempdir;

use record_sorter::config::Settings;
use record_sorter::pipeline::Sorter;
use record_sorter::report::RunReport;

fn find_output(dir: &std::path::Path, prefix: &str, ext: &str) -> Vec<std::path::PathBuf> {
    let mut found: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            let name = p.file_name().unwrap().to_str().unwrap();
            name.starts_with(prefix) && name.ends_with(ext)
        })
        .collect();
    found.sort();
    found
}

#[tokio::test]
async fn full_run_dedupes_buckets_and_reports() -> Result<()> {
    let input = tempdir()?;
    let output = tempdir()?;

    fs::write(
        input.path().join("records.json"),
        r#"[
            {"id": "1", "name": "Alice", "category": "Team"},
            {"id": "2", "name": "Bob", "category": "Team"},
            {"id": "1", "name": "Alice2", "category": "Team"}
        ]"#,
    )?;

    let outcome = Sorter::run(Settings::default(), input.path(), output.path()).await?;

    assert_eq!(outcome.files_read, 1);
    assert_eq!(outcome.records_parsed, 3);
    assert_eq!(outcome.duplicates_removed, 1);
    assert_eq!(outcome.invalid_removed, 0);
    assert_eq!(outcome.buckets, 1);
    assert_eq!(outcome.records_written, 2);

    // one export for the single Team bucket: header plus two quoted rows
    let exports = find_output(output.path(), "team_", ".csv");
    assert_eq!(exports.len(), 1);
    let content = fs::read_to_string(&exports[0])?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "ID,Name,Category,Timestamp,Processed");
    // the duplicate id kept the later payload
    assert!(content.contains("\"Alice2\""));
    assert!(!content.contains("\"Alice\","));
    assert!(content.contains("\"Bob\""));

    // report totals match what was written
    let report_path = outcome.report_file.expect("report should be written");
    let report: RunReport = serde_json::from_str(&fs::read_to_string(&report_path)?)?;
    assert_eq!(report.status, "SUCCESS");
    assert_eq!(report.total_records, 2);

    // the consumed input moved into the archive subdir with content intact
    assert!(!input.path().join("records.json").exists());
    let archived = input.path().join("archive").join("records.json");
    assert!(fs::read_to_string(&archived)?.contains("Alice2"));

    Ok(())
}

#[tokio::test]
async fn empty_category_record_never_reaches_an_export() -> Result<()> {
    let input = tempdir()?;
    let output = tempdir()?;

    fs::write(
        input.path().join("records.json"),
        r#"[
            {"id": "1", "name": "Keep", "category": "Team"},
            {"id": "2", "name": "Drop", "category": ""}
        ]"#,
    )?;

    let outcome = Sorter::run(Settings::default(), input.path(), output.path()).await?;

    assert_eq!(outcome.invalid_removed, 1);
    assert_eq!(outcome.records_written, 1);
    for export in find_output(output.path(), "", ".csv") {
        assert!(!fs::read_to_string(&export)?.contains("Drop"));
    }

    Ok(())
}

#[tokio::test]
async fn malformed_input_aborts_the_run_without_a_report() -> Result<()> {
    let input = tempdir()?;
    let output = tempdir()?;

    fs::write(input.path().join("bad.json"), "{not valid json")?;

    let result = Sorter::run(Settings::default(), input.path(), output.path()).await;
    assert!(result.is_err());

    // no partial artifacts: the run failed before generation and reporting
    assert!(find_output(output.path(), "", ".csv").is_empty());
    assert!(find_output(output.path(), "report_", ".json").is_empty());
    // the malformed file is not archived either
    assert!(input.path().join("bad.json").exists());

    Ok(())
}

#[tokio::test]
async fn disabled_toggles_skip_their_stages() -> Result<()> {
    let input = tempdir()?;
    let output = tempdir()?;

    fs::write(
        input.path().join("records.json"),
        r#"[
            {"id": "1", "name": "A", "category": "Team"},
            {"id": "1", "name": "B", "category": "Team"}
        ]"#,
    )?;

    let settings = Settings {
        remove_duplicates: false,
        auto_archive: false,
        generate_report: false,
        ..Settings::default()
    };
    let outcome = Sorter::run(settings, input.path(), output.path()).await?;

    // both occurrences of id "1" survive with dedup off
    assert_eq!(outcome.duplicates_removed, 0);
    assert_eq!(outcome.records_written, 2);
    // inputs stay in place and no report is produced
    assert!(input.path().join("records.json").exists());
    assert!(outcome.report_file.is_none());
    assert!(find_output(output.path(), "report_", ".json").is_empty());

    Ok(())
}

#[tokio::test]
async fn delimited_text_inputs_contribute_no_records_but_are_archived() -> Result<()> {
    let input = tempdir()?;
    let output = tempdir()?;

    fs::write(
        input.path().join("legacy.csv"),
        "id,name,category\n1,Alice,Team\n",
    )?;
    fs::write(
        input.path().join("records.json"),
        r#"[{"id": "1", "name": "Alice", "category": "Team"}]"#,
    )?;

    let outcome = Sorter::run(Settings::default(), input.path(), output.path()).await?;

    // only the json file contributes records, but both files are consumed
    assert_eq!(outcome.files_read, 2);
    assert_eq!(outcome.records_parsed, 1);
    assert_eq!(outcome.records_written, 1);
    assert!(input.path().join("archive").join("legacy.csv").exists());
    assert!(input.path().join("archive").join("records.json").exists());

    Ok(())
}
