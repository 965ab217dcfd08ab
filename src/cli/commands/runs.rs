//! Implementation of the `taskroll runs` command.

use anyhow::{Context, Result};
use clap::Args;

use crate::adapters::sqlite::SqliteRunHistoryRepository;
use crate::cli::commands::open_store;
use crate::cli::output::{output, truncate, CommandOutput, TableFormatter};
use crate::domain::models::{Config, ReportTable, RunRecord};
use crate::domain::ports::RunHistoryRepository;

#[derive(Args, Debug)]
pub struct RunsArgs {
    /// Maximum number of runs to display, newest first
    #[arg(short, long, default_value = "10")]
    pub limit: usize,
}

#[derive(Debug, serde::Serialize)]
pub struct RunListOutput {
    pub runs: Vec<RunRecord>,
    pub total: usize,
}

impl CommandOutput for RunListOutput {
    fn to_human(&self) -> String {
        if self.runs.is_empty() {
            return "No import runs recorded.".to_string();
        }

        let mut table = ReportTable::new(
            "Import runs",
            &["Run", "Source", "Finished", "Read", "Processed", "Skipped", "Created", "Changed"],
        );
        for run in &self.runs {
            table.push_row(vec![
                run.id.to_string()[..8].to_string(),
                truncate(&run.source, 40),
                run.finished_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                run.rows_read.to_string(),
                run.rows_processed.to_string(),
                run.rows_skipped.to_string(),
                run.records_created.to_string(),
                run.records_changed.to_string(),
            ]);
        }

        format!(
            "Showing {} run(s):\n{}",
            self.total,
            TableFormatter::new().format_report(&table)
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: RunsArgs, config: &Config, json_mode: bool) -> Result<()> {
    let pool = open_store(config).await?;
    let repo = SqliteRunHistoryRepository::new(pool.clone());
    let runs = repo.list(args.limit).await.context("Failed to list import runs")?;
    pool.close().await;

    let total = runs.len();
    output(&RunListOutput { runs, total }, json_mode);
    Ok(())
}
