//! Participant record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::task::{AuxValue, CompletionState};

/// Persistent completion record for one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    /// Unique participant identifier (the survey's name column).
    pub identifier: String,
    /// Campus or location, captured when the record is created.
    pub location: String,
    /// Completion state keyed by task key.
    pub tasks: BTreeMap<String, CompletionState>,
    /// Auxiliary values keyed by auxiliary key.
    pub auxiliary: BTreeMap<String, AuxValue>,
    /// Incomplete-to-complete transitions since the last run began.
    pub change_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ParticipantRecord {
    /// Create a record with every listed task in the `NotSeen` state.
    pub fn new<'a>(
        identifier: impl Into<String>,
        location: impl Into<String>,
        task_keys: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let now = Utc::now();
        Self {
            identifier: identifier.into(),
            location: location.into(),
            tasks: task_keys
                .into_iter()
                .map(|k| (k.to_string(), CompletionState::NotSeen))
                .collect(),
            auxiliary: BTreeMap::new(),
            change_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stored state for a task; unknown keys read as `NotSeen`.
    pub fn state(&self, task_key: &str) -> CompletionState {
        self.tasks.get(task_key).copied().unwrap_or_default()
    }

    pub fn is_complete(&self, task_key: &str) -> bool {
        self.state(task_key).is_complete()
    }

    /// Number of tasks in the `Complete` state.
    pub fn tasks_completed(&self) -> usize {
        self.tasks.values().filter(|s| s.is_complete()).count()
    }

    /// Mark a task complete and count the transition.
    ///
    /// Returns `false` without touching the record if the task was already
    /// complete; completion is never reverted.
    pub fn complete_task(&mut self, task_key: &str) -> bool {
        if self.is_complete(task_key) {
            return false;
        }
        self.tasks
            .insert(task_key.to_string(), CompletionState::Complete);
        self.change_count = self.change_count.saturating_add(1);
        self.touch();
        true
    }

    /// Record that a task was evaluated without completing it.
    ///
    /// Only moves `NotSeen` forward; never downgrades a completed task.
    pub fn mark_seen(&mut self, task_key: &str) {
        if self.state(task_key) == CompletionState::NotSeen {
            self.tasks
                .insert(task_key.to_string(), CompletionState::Incomplete);
            self.touch();
        }
    }

    pub fn set_auxiliary(&mut self, key: impl Into<String>, value: AuxValue) {
        self.auxiliary.insert(key.into(), value);
        self.touch();
    }

    pub fn auxiliary_integer(&self, key: &str) -> Option<i64> {
        self.auxiliary.get(key).and_then(AuxValue::as_integer)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_starts_unseen() {
        let record = ParticipantRecord::new("Alice", "North", ["impact", "connect"]);
        assert_eq!(record.state("impact"), CompletionState::NotSeen);
        assert_eq!(record.state("missing"), CompletionState::NotSeen);
        assert_eq!(record.tasks_completed(), 0);
        assert_eq!(record.change_count, 0);
    }

    #[test]
    fn test_completion_is_monotonic() {
        let mut record = ParticipantRecord::new("Alice", "North", ["impact"]);
        assert!(record.complete_task("impact"));
        assert!(!record.complete_task("impact"));
        record.mark_seen("impact");

        assert_eq!(record.state("impact"), CompletionState::Complete);
        assert_eq!(record.change_count, 1);
    }

    #[test]
    fn test_mark_seen_only_from_not_seen() {
        let mut record = ParticipantRecord::new("Bob", "South", ["impact"]);
        record.mark_seen("impact");
        assert_eq!(record.state("impact"), CompletionState::Incomplete);
        assert_eq!(record.change_count, 0);
    }
}
