//! Task predicate registry.
//!
//! Declares the fixed task set and turns raw survey fields into completion
//! verdicts. Evaluation is a pure function of the row: no storage access and
//! no dependence on earlier rows.

use std::collections::HashSet;

use crate::domain::errors::{ImportError, ImportResult};
use crate::domain::models::{
    AuxKind, AuxValue, AuxiliarySpec, InputRow, Predicate, SurveyField, SurveySchema,
    TaskDefinition,
};

/// Raw values counted as "yes" in boolean-like survey columns.
pub const AFFIRMATIVE_TOKENS: [&str; 3] = ["Yes", "TRUE", "1"];

/// Whether a raw survey value is an affirmative token.
///
/// Matching is case-sensitive; surrounding whitespace is ignored. Anything
/// else, including an empty cell, is falsy.
pub fn is_affirmative(raw: &str) -> bool {
    AFFIRMATIVE_TOKENS.contains(&raw.trim())
}

/// An auxiliary value that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: SurveyField,
    pub value: String,
}

/// Verdict for one task against one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub complete: bool,
    /// Parsed auxiliary values, keyed by auxiliary key.
    pub auxiliary: Vec<(String, AuxValue)>,
    /// Auxiliary columns skipped because their value was malformed.
    pub field_errors: Vec<FieldError>,
}

/// Ordered, immutable set of task definitions.
#[derive(Debug, Clone)]
pub struct TaskRegistry {
    schema: SurveySchema,
    tasks: Vec<TaskDefinition>,
}

impl TaskRegistry {
    /// Build a registry, checking it against the survey layout.
    pub fn new(schema: SurveySchema, tasks: Vec<TaskDefinition>) -> ImportResult<Self> {
        if tasks.is_empty() {
            return Err(ImportError::Schema("task registry is empty".to_string()));
        }

        let mut keys = HashSet::new();
        let mut names = HashSet::new();
        let mut aux_keys = HashSet::new();
        for task in &tasks {
            if task.name.trim().is_empty() {
                return Err(ImportError::Schema(format!(
                    "task '{}' has an empty display name",
                    task.key
                )));
            }
            if !keys.insert(task.key.as_str()) {
                return Err(ImportError::Schema(format!("duplicate task key '{}'", task.key)));
            }
            if !names.insert(task.name.as_str()) {
                return Err(ImportError::Schema(format!("duplicate task name '{}'", task.name)));
            }
            for aux in &task.auxiliary {
                if !aux_keys.insert(aux.key.as_str()) {
                    return Err(ImportError::Schema(format!(
                        "duplicate auxiliary key '{}'",
                        aux.key
                    )));
                }
            }
            if let Some(field) = task.dependencies().into_iter().find(|f| !schema.covers(*f)) {
                return Err(ImportError::Schema(format!(
                    "task '{}' reads {} (column {}) but schema v{} has {} columns",
                    task.name,
                    field,
                    field.column(),
                    schema.version,
                    schema.width
                )));
            }
        }

        Ok(Self { schema, tasks })
    }

    /// The six tasks of the standard survey.
    pub fn standard() -> Self {
        let tasks = vec![
            TaskDefinition::new(
                "power_of_one",
                "Power of One",
                Predicate::Flag(SurveyField::HoursConfirmed),
            )
            .with_auxiliary(
                AuxiliarySpec::integer("hours_volunteered", SurveyField::HoursVolunteered)
                    .with_total("Total expected hours volunteered"),
            ),
            TaskDefinition::new("one_to_many", "One to Many", Predicate::Always).with_auxiliary(
                AuxiliarySpec::integer("lunch_attendees", SurveyField::LunchAttendees)
                    .with_total("Total alumni luncheon attendance"),
            ),
            TaskDefinition::new(
                "one_data_point",
                "One Data Point",
                Predicate::Flag(SurveyField::SurveySubmitted),
            ),
            TaskDefinition::new(
                "one_voice",
                "One Voice",
                Predicate::Flag(SurveyField::VideoShared),
            ),
            TaskDefinition::new(
                "one_idea",
                "One Idea",
                Predicate::all([SurveyField::IdeaPosted, SurveyField::IdeaVoted]),
            ),
            TaskDefinition::new(
                "one_to_return",
                "One to Return",
                Predicate::Flag(SurveyField::ExternalProfile),
            ),
        ];

        Self {
            schema: SurveySchema::STANDARD,
            tasks,
        }
    }

    pub const fn schema(&self) -> SurveySchema {
        self.schema
    }

    pub fn tasks(&self) -> &[TaskDefinition] {
        &self.tasks
    }

    /// Task display names in registry order.
    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn task_keys(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|t| t.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&TaskDefinition> {
        self.tasks.iter().find(|t| t.key == key)
    }

    /// Resolve the row's task-name column to a task.
    ///
    /// The first task, in registry order, whose name occurs inside the value
    /// wins, even when a later task's name is a longer match.
    pub fn match_task(&self, task_name: &str) -> Option<&TaskDefinition> {
        let wanted = task_name.trim();
        if wanted.is_empty() {
            return None;
        }
        self.tasks.iter().find(|t| wanted.contains(t.name.as_str()))
    }

    /// Columns a row must carry for the engine to read it.
    pub fn required_row_width(&self) -> usize {
        let fixed = [SurveyField::Name, SurveyField::TaskName, SurveyField::Campus]
            .iter()
            .map(|f| f.column() + 1)
            .max()
            .unwrap_or(0);
        self.tasks
            .iter()
            .map(TaskDefinition::required_width)
            .fold(fixed, usize::max)
    }

    /// Check a source's declared column count against every dependency.
    pub fn validate_width(&self, width: usize) -> ImportResult<()> {
        let required = self.required_row_width();
        if width < required {
            return Err(ImportError::Schema(format!(
                "input has {width} columns but the task registry needs {required}"
            )));
        }
        Ok(())
    }

    /// Evaluate one task against one row.
    pub fn evaluate(&self, task: &TaskDefinition, row: &InputRow) -> ImportResult<Evaluation> {
        let required = task.required_width();
        if row.len() < required {
            return Err(ImportError::Schema(format!(
                "task '{}' needs {} fields, row at line {} has {}",
                task.name,
                required,
                row.line,
                row.len()
            )));
        }

        let complete = check(&task.predicate, row);

        let mut auxiliary = Vec::with_capacity(task.auxiliary.len());
        let mut field_errors = Vec::new();
        for spec in &task.auxiliary {
            match extract(spec, row) {
                Ok(Some(value)) => auxiliary.push((spec.key.clone(), value)),
                Ok(None) => {}
                Err(err) => field_errors.push(err),
            }
        }

        Ok(Evaluation {
            complete,
            auxiliary,
            field_errors,
        })
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn check(predicate: &Predicate, row: &InputRow) -> bool {
    match predicate {
        Predicate::Always => true,
        Predicate::Flag(field) => row.get(*field).is_some_and(is_affirmative),
        Predicate::All(parts) => parts.iter().all(|p| check(p, row)),
        Predicate::Any(parts) => parts.iter().any(|p| check(p, row)),
    }
}

fn extract(spec: &AuxiliarySpec, row: &InputRow) -> Result<Option<AuxValue>, FieldError> {
    let raw = row.get(spec.field).map_or("", str::trim);
    if raw.is_empty() {
        return Ok(None);
    }
    match spec.kind {
        AuxKind::Text => Ok(Some(AuxValue::Text(raw.to_string()))),
        AuxKind::Integer => raw
            .parse::<i64>()
            .map(|v| Some(AuxValue::Integer(v)))
            .map_err(|_| FieldError {
                field: spec.field,
                value: raw.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(SurveyField, &str)]) -> InputRow {
        let mut fields = vec![String::new(); SurveySchema::STANDARD.width];
        for (field, value) in pairs {
            fields[field.column()] = (*value).to_string();
        }
        InputRow::new(2, fields)
    }

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("Yes"));
        assert!(is_affirmative("TRUE"));
        assert!(is_affirmative("1"));
        assert!(is_affirmative(" Yes "));
        assert!(!is_affirmative("yes"));
        assert!(!is_affirmative("true"));
        assert!(!is_affirmative("No"));
        assert!(!is_affirmative(""));
    }

    #[test]
    fn test_standard_registry_shape() {
        let registry = TaskRegistry::standard();
        assert_eq!(
            registry.task_names(),
            vec![
                "Power of One",
                "One to Many",
                "One Data Point",
                "One Voice",
                "One Idea",
                "One to Return"
            ]
        );
        assert_eq!(registry.required_row_width(), 15);
        // The standard set must pass the same checks as a custom one.
        TaskRegistry::new(SurveySchema::STANDARD, registry.tasks().to_vec()).unwrap();
    }

    #[test]
    fn test_match_task_takes_first_substring_in_registry_order() {
        let registry = TaskRegistry::standard();
        assert_eq!(
            registry.match_task("One Idea").map(|t| t.key.as_str()),
            Some("one_idea")
        );
        assert_eq!(
            registry
                .match_task("Task 2: One to Many (alumni lunch)")
                .map(|t| t.key.as_str()),
            Some("one_to_many")
        );
        assert!(registry.match_task("Something else").is_none());
        assert!(registry.match_task("   ").is_none());

        let overlapping = TaskRegistry::new(
            SurveySchema::STANDARD,
            vec![
                TaskDefinition::new("connect", "Connect", Predicate::Always),
                TaskDefinition::new("connect_more", "Connect More", Predicate::Always),
            ],
        )
        .unwrap();
        assert_eq!(
            overlapping.match_task("Connect More").map(|t| t.key.as_str()),
            Some("connect")
        );
        assert_eq!(
            overlapping.match_task("Week 3 - Connect More").map(|t| t.key.as_str()),
            Some("connect")
        );
    }

    #[test]
    fn test_and_predicate_needs_both_flags() {
        let registry = TaskRegistry::standard();
        let idea = registry.get("one_idea").unwrap();

        let both = row(&[(SurveyField::IdeaPosted, "TRUE"), (SurveyField::IdeaVoted, "TRUE")]);
        let one = row(&[(SurveyField::IdeaPosted, "TRUE"), (SurveyField::IdeaVoted, "FALSE")]);

        assert!(registry.evaluate(idea, &both).unwrap().complete);
        assert!(!registry.evaluate(idea, &one).unwrap().complete);
    }

    #[test]
    fn test_any_predicate() {
        let registry = TaskRegistry::new(
            SurveySchema::STANDARD,
            vec![TaskDefinition::new(
                "share",
                "Share",
                Predicate::any([SurveyField::VideoShared, SurveyField::ExternalProfile]),
            )],
        )
        .unwrap();
        let task = registry.get("share").unwrap();

        assert!(registry.evaluate(task, &row(&[(SurveyField::ExternalProfile, "Yes")])).unwrap().complete);
        assert!(!registry.evaluate(task, &row(&[])).unwrap().complete);
    }

    #[test]
    fn test_integer_auxiliary_parsing() {
        let registry = TaskRegistry::standard();
        let power = registry.get("power_of_one").unwrap();

        let good = registry
            .evaluate(
                power,
                &row(&[(SurveyField::HoursConfirmed, "Yes"), (SurveyField::HoursVolunteered, " 12 ")]),
            )
            .unwrap();
        assert!(good.complete);
        assert_eq!(
            good.auxiliary,
            vec![("hours_volunteered".to_string(), AuxValue::Integer(12))]
        );

        let bad = registry
            .evaluate(
                power,
                &row(&[(SurveyField::HoursConfirmed, "Yes"), (SurveyField::HoursVolunteered, "ten")]),
            )
            .unwrap();
        assert!(bad.complete, "malformed auxiliary must not affect the verdict");
        assert!(bad.auxiliary.is_empty());
        assert_eq!(
            bad.field_errors,
            vec![FieldError {
                field: SurveyField::HoursVolunteered,
                value: "ten".to_string()
            }]
        );

        let blank = registry.evaluate(power, &row(&[])).unwrap();
        assert!(!blank.complete);
        assert!(blank.auxiliary.is_empty());
        assert!(blank.field_errors.is_empty());
    }

    #[test]
    fn test_text_auxiliary() {
        let registry = TaskRegistry::new(
            SurveySchema::STANDARD,
            vec![TaskDefinition::new("visit", "Visit", Predicate::Always)
                .with_auxiliary(AuxiliarySpec::text("visited_campus", SurveyField::Campus))],
        )
        .unwrap();
        let eval = registry
            .evaluate(registry.get("visit").unwrap(), &row(&[(SurveyField::Campus, "East")]))
            .unwrap();
        assert_eq!(
            eval.auxiliary,
            vec![("visited_campus".to_string(), AuxValue::Text("East".to_string()))]
        );
    }

    #[test]
    fn test_evaluate_short_row_is_schema_error() {
        let registry = TaskRegistry::standard();
        let idea = registry.get("one_idea").unwrap();
        let short = InputRow::new(9, vec!["Alice".to_string(), "One Idea".to_string()]);

        let err = registry.evaluate(idea, &short).unwrap_err();
        assert!(matches!(err, ImportError::Schema(_)));
    }

    #[test]
    fn test_registry_rejects_bad_definitions() {
        let narrow = SurveySchema { version: 0, width: 8 };
        let err = TaskRegistry::new(
            narrow,
            vec![TaskDefinition::new("idea", "Idea", Predicate::Flag(SurveyField::IdeaVoted))],
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::Schema(_)));

        let dup = TaskRegistry::new(
            SurveySchema::STANDARD,
            vec![
                TaskDefinition::new("a", "Same", Predicate::Always),
                TaskDefinition::new("b", "Same", Predicate::Always),
            ],
        );
        assert!(dup.is_err());

        assert!(TaskRegistry::new(SurveySchema::STANDARD, vec![]).is_err());
    }

    #[test]
    fn test_validate_width() {
        let registry = TaskRegistry::standard();
        assert!(registry.validate_width(15).is_ok());
        assert!(registry.validate_width(20).is_ok());
        assert!(matches!(registry.validate_width(12), Err(ImportError::Schema(_))));
    }
}
