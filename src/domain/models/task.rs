//! Task definitions and per-task completion state.

use serde::{Deserialize, Serialize};

use super::row::SurveyField;

/// Completion state of one task for one participant.
///
/// `NotSeen` and `Incomplete` both count as "not complete" in reports; the
/// distinction only records whether a row for the task was ever evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionState {
    #[default]
    NotSeen,
    Incomplete,
    Complete,
}

impl CompletionState {
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotSeen => "not_seen",
            Self::Incomplete => "incomplete",
            Self::Complete => "complete",
        }
    }
}

impl std::fmt::Display for CompletionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Boolean condition over affirmative survey flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Any matching row completes the task.
    Always,
    /// The field holds an affirmative token.
    Flag(SurveyField),
    /// Every sub-condition holds.
    All(Vec<Predicate>),
    /// At least one sub-condition holds.
    Any(Vec<Predicate>),
}

impl Predicate {
    pub fn all(fields: impl IntoIterator<Item = SurveyField>) -> Self {
        Self::All(fields.into_iter().map(Self::Flag).collect())
    }

    pub fn any(fields: impl IntoIterator<Item = SurveyField>) -> Self {
        Self::Any(fields.into_iter().map(Self::Flag).collect())
    }

    /// Fields read by this predicate, in declaration order.
    pub fn dependencies(&self) -> Vec<SurveyField> {
        let mut out = Vec::new();
        self.collect_dependencies(&mut out);
        out
    }

    fn collect_dependencies(&self, out: &mut Vec<SurveyField>) {
        match self {
            Self::Always => {}
            Self::Flag(field) => {
                if !out.contains(field) {
                    out.push(*field);
                }
            }
            Self::All(parts) | Self::Any(parts) => {
                for part in parts {
                    part.collect_dependencies(out);
                }
            }
        }
    }
}

/// Value type of an auxiliary column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuxKind {
    Integer,
    Text,
}

/// Auxiliary value captured alongside a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuxValue {
    Integer(i64),
    Text(String),
}

impl AuxValue {
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

impl std::fmt::Display for AuxValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// An auxiliary column extracted when its task's row is evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxiliarySpec {
    /// Storage key, unique across the registry.
    pub key: String,
    pub field: SurveyField,
    pub kind: AuxKind,
    /// Label used for the run-level total of integer values.
    pub total_label: Option<String>,
}

impl AuxiliarySpec {
    pub fn integer(key: impl Into<String>, field: SurveyField) -> Self {
        Self {
            key: key.into(),
            field,
            kind: AuxKind::Integer,
            total_label: None,
        }
    }

    pub fn text(key: impl Into<String>, field: SurveyField) -> Self {
        Self {
            key: key.into(),
            field,
            kind: AuxKind::Text,
            total_label: None,
        }
    }

    pub fn with_total(mut self, label: impl Into<String>) -> Self {
        self.total_label = Some(label.into());
        self
    }
}

/// One task of the fixed registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    /// Stable storage key (snake_case).
    pub key: String,
    /// Display name, also matched against the row's task-name column.
    pub name: String,
    pub predicate: Predicate,
    pub auxiliary: Vec<AuxiliarySpec>,
}

impl TaskDefinition {
    pub fn new(key: impl Into<String>, name: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            predicate,
            auxiliary: Vec::new(),
        }
    }

    pub fn with_auxiliary(mut self, spec: AuxiliarySpec) -> Self {
        self.auxiliary.push(spec);
        self
    }

    /// Every field the task reads: predicate flags first, then auxiliary columns.
    pub fn dependencies(&self) -> Vec<SurveyField> {
        let mut deps = self.predicate.dependencies();
        for aux in &self.auxiliary {
            if !deps.contains(&aux.field) {
                deps.push(aux.field);
            }
        }
        deps
    }

    /// Minimum row length needed to evaluate this task.
    pub fn required_width(&self) -> usize {
        self.dependencies()
            .iter()
            .map(|f| f.column() + 1)
            .max()
            .unwrap_or(0)
    }
}
