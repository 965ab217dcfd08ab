//! Implementation of the `taskroll show` command.

use anyhow::{Context, Result};
use clap::Args;
use std::collections::BTreeMap;

use crate::adapters::sqlite::SqliteParticipantRepository;
use crate::cli::commands::open_store;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::errors::DomainError;
use crate::domain::models::{CompletionState, Config, ParticipantRecord, ReportTable};
use crate::domain::ports::ParticipantRepository;
use crate::services::TaskRegistry;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Participant identifier, exactly as it appears in the export
    pub identifier: String,
}

#[derive(Debug, serde::Serialize)]
pub struct TaskStateOutput {
    pub key: String,
    pub name: String,
    pub state: CompletionState,
}

#[derive(Debug, serde::Serialize)]
pub struct ParticipantOutput {
    pub identifier: String,
    pub location: String,
    pub tasks_completed: usize,
    pub task_count: usize,
    pub change_count: u32,
    pub tasks: Vec<TaskStateOutput>,
    pub auxiliary: BTreeMap<String, String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ParticipantOutput {
    /// Lay out a record's tasks in registry order.
    pub fn from_record(record: &ParticipantRecord, registry: &TaskRegistry) -> Self {
        let tasks: Vec<TaskStateOutput> = registry
            .tasks()
            .iter()
            .map(|t| TaskStateOutput {
                key: t.key.clone(),
                name: t.name.clone(),
                state: record.state(&t.key),
            })
            .collect();

        Self {
            identifier: record.identifier.clone(),
            location: record.location.clone(),
            tasks_completed: tasks.iter().filter(|t| t.state.is_complete()).count(),
            task_count: registry.len(),
            change_count: record.change_count,
            tasks,
            auxiliary: record
                .auxiliary
                .iter()
                .map(|(k, v)| (k.clone(), v.to_string()))
                .collect(),
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

impl CommandOutput for ParticipantOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("{}", console::style(&self.identifier).bold()),
            format!("  Campus:          {}", self.location),
            format!("  Tasks completed: {}/{}", self.tasks_completed, self.task_count),
            format!("  Changes (last run): {}", self.change_count),
            format!("  First seen:      {}", self.created_at),
            format!("  Last updated:    {}", self.updated_at),
        ];

        let mut table = ReportTable::new("Tasks", &["Task", "State"]);
        for task in &self.tasks {
            table.push_row(vec![task.name.clone(), task.state.to_string()]);
        }
        lines.push(TableFormatter::new().format_report(&table));

        for (key, value) in &self.auxiliary {
            lines.push(format!("  {key}: {value}"));
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: ShowArgs, config: &Config, json_mode: bool) -> Result<()> {
    let pool = open_store(config).await?;
    let repo = SqliteParticipantRepository::new(pool.clone());

    let record = repo
        .get(&args.identifier)
        .await
        .context("Failed to load participant")?
        .ok_or_else(|| DomainError::ParticipantNotFound(args.identifier.clone()))?;
    pool.close().await;

    output(&ParticipantOutput::from_record(&record, &TaskRegistry::standard()), json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_follow_registry_order() {
        let registry = TaskRegistry::standard();
        let mut record = ParticipantRecord::new("Ada", "North", registry.task_keys());
        record.complete_task("one_voice");

        let out = ParticipantOutput::from_record(&record, &registry);
        assert_eq!(out.task_count, 6);
        assert_eq!(out.tasks_completed, 1);
        assert_eq!(out.tasks[0].name, "Power of One");
        assert_eq!(out.tasks[0].state, CompletionState::NotSeen);
        assert!(out.tasks.iter().any(|t| t.key == "one_voice" && t.state.is_complete()));
    }
}
