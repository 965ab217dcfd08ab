//! The `import` command against an on-disk project.

mod common;

use common::{row, write_export};
use taskroll::cli::commands::import::{run, ImportArgs};
use taskroll::cli::output::CommandOutput;
use taskroll::domain::models::{Config, SurveyField};

fn project_config(dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.database.path = dir.join("store/taskroll.db").display().to_string();
    config
}

#[tokio::test]
async fn test_import_writes_listing_and_persists_across_runs() {
    let rows = vec![
        row("Ada", "Power of One", "North", &[(SurveyField::HoursConfirmed, "Yes"), (SurveyField::HoursVolunteered, "5")]),
        row("Ben", "One Voice", "South", &[(SurveyField::VideoShared, "No")]),
        row("", "One Voice", "South", &[]),
    ];
    let (dir, input) = write_export(&rows);
    let config = project_config(dir.path());
    let output_path = dir.path().join("output.csv");

    let args = ImportArgs {
        input: Some(input.clone()),
        output: Some(output_path.clone()),
        quiet: false,
    };
    let first = run(&args, &config, false).await.unwrap();

    assert_eq!(first.summary.rows_read, 3);
    assert_eq!(first.summary.rows_skipped(), 1);
    assert_eq!(first.summary.records_created, 2);

    let listing = std::fs::read_to_string(&output_path).unwrap();
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines[0], "Name,Campus,Tasks Completed");
    assert_eq!(lines.len(), 3);
    assert!(lines.contains(&"Ada,North,1"));
    assert!(lines.contains(&"Ben,South,0"));

    let human = first.to_human();
    assert!(human.contains("line 4: identifier field is empty"));
    assert!(human.contains("Total expected hours volunteered: 5"));

    let second = run(&args, &config, false).await.unwrap();
    assert_eq!(second.summary.records_created, 0);
    assert_eq!(second.summary.transitions, 0);
    let report = second.report.unwrap();
    assert_eq!(report.participants.len(), 2);
    assert!(report.changed.is_empty());
}

#[tokio::test]
async fn test_quiet_import_omits_reports() {
    let (dir, input) = write_export(&[row("Ada", "One to Many", "North", &[])]);
    let config = project_config(dir.path());
    let args = ImportArgs {
        input: Some(input),
        output: Some(dir.path().join("out.csv")),
        quiet: true,
    };

    let result = run(&args, &config, false).await.unwrap();
    assert!(result.report.is_none());
    assert_eq!(result.to_json()["summary"]["records_created"], 1);
}

#[tokio::test]
async fn test_missing_export_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = project_config(dir.path());
    let output_path = dir.path().join("out.csv");
    let args = ImportArgs {
        input: Some(dir.path().join("absent.csv")),
        output: Some(output_path.clone()),
        quiet: false,
    };

    let err = run(&args, &config, false).await.unwrap_err();
    assert!(format!("{err:#}").contains("absent.csv"));
    assert!(!output_path.exists());
}
