//! Read-side report projections.

use serde::Serialize;

/// Completed count for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskTotal {
    pub key: String,
    pub name: String,
    pub completed: u64,
}

/// Record count for one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationTotal {
    pub location: String,
    pub participants: u64,
}

/// Sum of an integer auxiliary value over records whose task is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuxiliaryTotal {
    pub task_key: String,
    pub aux_key: String,
    pub label: String,
    pub total: i64,
}

/// One line of a participant listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantSummary {
    pub identifier: String,
    pub location: String,
    pub tasks_completed: usize,
    pub change_count: u32,
}

/// Every aggregate produced from the store after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ReportView {
    /// Registry size.
    pub task_count: usize,
    /// Per-task totals, in registry order.
    pub task_totals: Vec<TaskTotal>,
    /// Tasks-completed descending, then identifier ascending.
    pub participants: Vec<ParticipantSummary>,
    /// Participants with every task complete, identifier ascending.
    pub fully_complete: Vec<ParticipantSummary>,
    /// Participant count descending, then location ascending.
    pub locations: Vec<LocationTotal>,
    pub auxiliary_totals: Vec<AuxiliaryTotal>,
    /// Change count descending, then identifier ascending.
    pub changed: Vec<ParticipantSummary>,
}

/// A titled table handed to a report sink, rows in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTable {
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn new(title: impl Into<String>, header: &[&str]) -> Self {
        Self {
            title: title.into(),
            header: header.iter().map(|h| (*h).to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl ReportView {
    /// Full listing in the output-file layout.
    pub fn participant_table(&self) -> ReportTable {
        listing_table("All participants", &self.participants)
    }

    pub fn fully_complete_table(&self) -> ReportTable {
        listing_table("Participants that have completed all tasks", &self.fully_complete)
    }

    pub fn changed_table(&self) -> ReportTable {
        let mut table = ReportTable::new(
            "Records changed this run",
            &["Name", "Campus", "Tasks Completed", "Changes"],
        );
        for p in &self.changed {
            table.push_row(vec![
                p.identifier.clone(),
                p.location.clone(),
                p.tasks_completed.to_string(),
                p.change_count.to_string(),
            ]);
        }
        table
    }

    pub fn location_table(&self) -> ReportTable {
        let mut table = ReportTable::new("Participants by campus", &["Campus", "# Participants"]);
        for l in &self.locations {
            table.push_row(vec![l.location.clone(), l.participants.to_string()]);
        }
        table
    }

    /// Task totals sorted by count descending; ties keep registry order.
    pub fn task_table(&self) -> ReportTable {
        let mut totals: Vec<&TaskTotal> = self.task_totals.iter().collect();
        totals.sort_by(|a, b| b.completed.cmp(&a.completed));

        let mut table = ReportTable::new("Completed submissions by task", &["Task", "# Completed"]);
        for t in totals {
            table.push_row(vec![t.name.clone(), t.completed.to_string()]);
        }
        table
    }
}

fn listing_table(title: &str, participants: &[ParticipantSummary]) -> ReportTable {
    let mut table = ReportTable::new(title, &["Name", "Campus", "Tasks Completed"]);
    for p in participants {
        table.push_row(vec![
            p.identifier.clone(),
            p.location.clone(),
            p.tasks_completed.to_string(),
        ]);
    }
    table
}
