//! Table output formatting for CLI commands
//!
//! Renders report tables with comfy-table. Colors are skipped when the
//! terminal cannot show them.

use comfy_table::{presets, Attribute, Cell, CellAlignment, ContentArrangement, Table};
use std::env;
use std::io::Write;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ReportTable;
use crate::domain::ports::ReportSink;

/// Table formatter for CLI output
pub struct TableFormatter {
    use_colors: bool,
    max_width: Option<u16>,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    pub fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format a report table. Numeric columns are right-aligned.
    pub fn format_report(&self, report: &ReportTable) -> String {
        let mut table = self.create_base_table();

        table.set_header(report.header.iter().map(|h| {
            let cell = Cell::new(h);
            if self.use_colors {
                cell.add_attribute(Attribute::Bold)
            } else {
                cell
            }
        }));

        for row in &report.rows {
            table.add_row(row.iter().map(|value| {
                let cell = Cell::new(value);
                if !value.is_empty() && value.parse::<i64>().is_ok() {
                    cell.set_alignment(CellAlignment::Right)
                } else {
                    cell
                }
            }));
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }
        if !self.use_colors {
            table.force_no_tty();
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    console::Term::stdout().features().colors_supported()
}

/// Report sink that prints titled tables to a terminal stream
pub struct TerminalSink<W: Write> {
    out: W,
    formatter: TableFormatter,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, formatter: TableFormatter) -> Self {
        Self { out, formatter }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TerminalSink<W> {
    fn write_table(&mut self, table: &ReportTable) -> DomainResult<()> {
        let title = if self.formatter.use_colors {
            console::style(&table.title).bold().cyan().to_string()
        } else {
            table.title.clone()
        };
        let body = if table.is_empty() {
            "  (none)".to_string()
        } else {
            self.formatter.format_report(table)
        };

        writeln!(self.out, "{title}\n{body}\n").map_err(|e| DomainError::OutputError(e.to_string()))
    }
}
