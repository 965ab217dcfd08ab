//! Command-line interface.
//!
//! `taskroll [--json] [--config PATH] <command>`

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{import::ImportArgs, init::InitArgs, report::ReportArgs, runs::RunsArgs, show::ShowArgs};

pub use output::progress::{create_import_spinner, ProgressBarExt};

#[derive(Parser, Debug)]
#[command(name = "taskroll")]
#[command(about = "Taskroll - reconcile survey exports into participant progress", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Read configuration from this file instead of .taskroll/
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the project configuration and database
    Init(InitArgs),
    /// Reconcile a survey export into the participant store
    Import(ImportArgs),
    /// Print reports over the current store
    Report(ReportArgs),
    /// Show one participant's task states
    Show(ShowArgs),
    /// List recent import runs
    Runs(RunsArgs),
}

/// Print an error (with its cause chain) and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({
            "success": false,
            "error": err.to_string(),
            "causes": causes,
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err}", console::style("error:").red().bold());
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
    }
    std::process::exit(1);
}
