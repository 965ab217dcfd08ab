//! Implementation of the `taskroll import` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::adapters::tabular::{CsvReportSink, CsvRowSource};
use crate::cli::commands::{build_engine, open_store};
use crate::cli::output::progress::{create_import_spinner, ProgressBarExt};
use crate::cli::output::{output, CommandOutput, TableFormatter, TerminalSink};
use crate::domain::models::{Config, ReportView, RunSummary};
use crate::domain::ports::ReportSink;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Survey export to read (defaults to import.input_path)
    pub input: Option<PathBuf>,

    /// Where to write the participant listing (defaults to import.output_path)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print only the run summary
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct ImportOutput {
    pub summary: RunSummary,
    pub output_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportView>,
}

impl CommandOutput for ImportOutput {
    fn to_human(&self) -> String {
        let s = &self.summary;
        let mut lines = vec![
            format!("{} {}", console::style("Imported").green().bold(), s.source),
            format!("  Rows read:       {}", s.rows_read),
            format!("  Rows processed:  {}", s.rows_processed),
            format!("  Rows skipped:    {}", s.rows_skipped()),
            format!("  Records created: {}", s.records_created),
            format!("  Records changed: {}", s.records_changed),
            format!("  Transitions:     {}", s.transitions),
        ];

        if !s.skipped.is_empty() {
            lines.push("\nSkipped rows:".to_string());
            for skipped in &s.skipped {
                lines.push(format!("  line {}: {}", skipped.line, skipped.defect));
            }
        }

        if !s.field_diagnostics.is_empty() {
            lines.push("\nUnreadable values (treated as absent):".to_string());
            for d in &s.field_diagnostics {
                lines.push(format!(
                    "  line {}: {} / {}: {} = '{}'",
                    d.line, d.identifier, d.task, d.field, d.value
                ));
            }
        }

        lines.push(format!("\nParticipant listing written to {}", self.output_path.display()));

        if let Some(report) = &self.report {
            lines.push(String::new());
            lines.push(render_reports(report));
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Render the post-import reports as terminal tables.
pub fn render_reports(report: &ReportView) -> String {
    let mut sink = TerminalSink::new(Vec::new(), TableFormatter::new());
    let tables = [
        report.fully_complete_table(),
        report.location_table(),
        report.task_table(),
        report.changed_table(),
    ];
    for table in &tables {
        if let Err(err) = sink.write_table(table) {
            tracing::warn!(error = %err, table = %table.title, "Failed to render report table");
        }
    }

    let mut text = String::from_utf8_lossy(&sink.into_inner()).into_owned();
    for total in &report.auxiliary_totals {
        text.push_str(&format!("{}: {}\n", total.label, total.total));
    }
    text
}

pub async fn execute(args: ImportArgs, config: &Config, json_mode: bool) -> Result<()> {
    let interactive = !json_mode && !args.quiet && console::Term::stderr().is_term();
    let output_data = run(&args, config, interactive).await?;
    output(&output_data, json_mode);
    Ok(())
}

/// Reconcile the export, then write the participant listing.
pub async fn run(args: &ImportArgs, config: &Config, interactive: bool) -> Result<ImportOutput> {
    let input = args
        .input
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.import.input_path));
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.import.output_path));

    let source = CsvRowSource::open(&input, config.import.header_rows)
        .with_context(|| format!("Failed to open survey export {}", input.display()))?;

    let pool = open_store(config).await?;
    let engine = build_engine(&pool);

    let spinner = interactive.then(|| create_import_spinner(&input.display().to_string()));
    let mut rows_seen = 0u64;
    let result = engine
        .run_import_observed(source, |_| {
            rows_seen += 1;
            if let Some(spinner) = &spinner {
                spinner.record_row(rows_seen);
            }
        })
        .await;

    let (summary, report) = match result {
        Ok(done) => {
            if let Some(spinner) = &spinner {
                spinner.finish_success(format!("{rows_seen} rows reconciled"));
            }
            done
        }
        Err(err) => {
            if let Some(spinner) = &spinner {
                spinner.finish_error("import aborted");
            }
            return Err(err).context("Import failed");
        }
    };

    let mut sink = CsvReportSink::create(&output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    sink.write_table(&report.participant_table())
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    pool.close().await;

    Ok(ImportOutput {
        summary,
        output_path,
        report: (!args.quiet).then_some(report),
    })
}
