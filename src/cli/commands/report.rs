//! Implementation of the `taskroll report` command.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::commands::{build_engine, open_store};
use crate::cli::output::{output, CommandOutput, TableFormatter, TerminalSink};
use crate::domain::models::{Config, ReportTable, ReportView};
use crate::domain::ports::ReportSink;

/// Without any section flag every section is printed.
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Records changed by the most recent import
    #[arg(long)]
    pub changed: bool,

    /// Participants that completed every task
    #[arg(long)]
    pub complete: bool,

    /// Participant counts per campus
    #[arg(long)]
    pub campus: bool,

    /// Completion counts per task
    #[arg(long)]
    pub tasks: bool,
}

impl ReportArgs {
    fn all(&self) -> bool {
        !(self.changed || self.complete || self.campus || self.tasks)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ReportOutput {
    #[serde(flatten)]
    pub report: ReportView,
    #[serde(skip)]
    pub tables: Vec<ReportTable>,
    #[serde(skip)]
    pub show_totals: bool,
}

impl ReportOutput {
    pub fn select(report: ReportView, args: &ReportArgs) -> Self {
        let all = args.all();
        let mut tables = Vec::new();
        if all || args.complete {
            tables.push(report.fully_complete_table());
        }
        if all || args.campus {
            tables.push(report.location_table());
        }
        if all || args.tasks {
            tables.push(report.task_table());
        }
        if all || args.changed {
            tables.push(report.changed_table());
        }

        Self {
            report,
            tables,
            show_totals: all || args.tasks,
        }
    }
}

impl CommandOutput for ReportOutput {
    fn to_human(&self) -> String {
        if self.report.participants.is_empty() {
            return "No participants recorded yet. Run `taskroll import` first.".to_string();
        }

        let mut sink = TerminalSink::new(Vec::new(), TableFormatter::new());
        for table in &self.tables {
            if let Err(err) = sink.write_table(table) {
                tracing::warn!(error = %err, table = %table.title, "Failed to render report table");
            }
        }

        let mut text = String::from_utf8_lossy(&sink.into_inner()).into_owned();
        if self.show_totals {
            for total in &self.report.auxiliary_totals {
                text.push_str(&format!("{}: {}\n", total.label, total.total));
            }
        }
        text.trim_end().to_string()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: ReportArgs, config: &Config, json_mode: bool) -> Result<()> {
    let pool = open_store(config).await?;
    let engine = build_engine(&pool);
    let report = engine.report().await.context("Failed to build reports")?;
    pool.close().await;

    output(&ReportOutput::select(report, &args), json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_selects_every_section() {
        let selected = ReportOutput::select(ReportView::default(), &ReportArgs::default());
        assert_eq!(selected.tables.len(), 4);
        assert!(selected.show_totals);
    }

    #[test]
    fn test_single_flag_selects_one_section() {
        let args = ReportArgs {
            campus: true,
            ..ReportArgs::default()
        };
        let selected = ReportOutput::select(ReportView::default(), &args);
        assert_eq!(selected.tables.len(), 1);
        assert_eq!(selected.tables[0].header[0], "Campus");
        assert!(!selected.show_totals);
    }
}
