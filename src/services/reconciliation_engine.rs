//! Incremental reconciliation of survey rows into participant records.
//!
//! A run is `begin_run`, then `process_row` for each row in input order,
//! then `end_run`. Per (participant, task) the only transition is
//! not-complete → complete, and it fires at most once, so replaying an
//! export never changes state a second time.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::{ImportError, ImportResult, RowDefect};
use crate::domain::models::{
    FieldDiagnostic, InputRow, ParticipantRecord, ReportView, RunRecord, RunSummary, SkippedRow,
    TaskDefinition,
};
use crate::domain::ports::{ParticipantRepository, RowSource, RunHistoryRepository};
use crate::services::report_projection;
use crate::services::task_registry::{Evaluation, TaskRegistry};

/// What a single row did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// A new record was created; `completed` tells whether the row's task
    /// was complete on arrival.
    Created {
        identifier: String,
        task: String,
        completed: bool,
    },
    /// An existing record's task moved to complete.
    Completed { identifier: String, task: String },
    /// The row was valid but changed nothing.
    Unchanged { identifier: String, task: String },
    /// The row was rejected.
    Skipped(RowDefect),
}

/// Accumulator for one reconciliation run.
#[derive(Debug)]
pub struct ImportRun {
    summary: RunSummary,
    changed: HashSet<String>,
}

impl ImportRun {
    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    fn skip(&mut self, line: u64, defect: RowDefect) -> RowOutcome {
        warn!(
            run_id = %self.summary.run_id,
            line,
            reason = %defect,
            "Skipping malformed row"
        );
        self.summary.skipped.push(SkippedRow {
            line,
            defect: defect.clone(),
        });
        RowOutcome::Skipped(defect)
    }

    fn transition(&mut self, identifier: &str) {
        self.summary.transitions += 1;
        if self.changed.insert(identifier.to_string()) {
            self.summary.records_changed += 1;
        }
    }
}

/// Drives survey rows into the participant store.
pub struct ReconciliationEngine {
    registry: Arc<TaskRegistry>,
    participants: Arc<dyn ParticipantRepository>,
    runs: Option<Arc<dyn RunHistoryRepository>>,
}

impl ReconciliationEngine {
    pub fn new(registry: Arc<TaskRegistry>, participants: Arc<dyn ParticipantRepository>) -> Self {
        Self {
            registry,
            participants,
            runs: None,
        }
    }

    /// Also persist a summary of every finished run.
    pub fn with_run_history(mut self, runs: Arc<dyn RunHistoryRepository>) -> Self {
        self.runs = Some(runs);
        self
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Start a run: zero every change counter, keep completion states.
    #[instrument(skip(self))]
    pub async fn begin_run(&self, source: &str) -> ImportResult<ImportRun> {
        let reset = self.participants.reset_change_counters().await?;
        let summary = RunSummary::new(source);
        info!(run_id = %summary.run_id, source, reset, "Reconciliation run started");
        Ok(ImportRun {
            summary,
            changed: HashSet::new(),
        })
    }

    /// Reconcile one row. Row-level defects are recorded on the run and
    /// reported as [`RowOutcome::Skipped`]; only storage failures are errors.
    #[instrument(skip(self, run, row), fields(line = row.line))]
    pub async fn process_row(&self, run: &mut ImportRun, row: &InputRow) -> ImportResult<RowOutcome> {
        run.summary.rows_read += 1;

        let identifier = row.identifier();
        if identifier.is_empty() {
            return Ok(run.skip(row.line, RowDefect::MissingIdentifier));
        }

        let required = self.registry.required_row_width();
        if row.len() < required {
            return Ok(run.skip(
                row.line,
                RowDefect::ShortRow {
                    expected: required,
                    found: row.len(),
                },
            ));
        }

        let Some(task) = self.registry.match_task(row.task_name()) else {
            return Ok(run.skip(
                row.line,
                RowDefect::UnknownTask {
                    task_name: row.task_name().to_string(),
                },
            ));
        };

        run.summary.rows_processed += 1;

        match self.participants.get(identifier).await? {
            None => self.create_record(run, row, task).await,
            Some(record) => self.update_record(run, row, task, record).await,
        }
    }

    async fn create_record(
        &self,
        run: &mut ImportRun,
        row: &InputRow,
        task: &TaskDefinition,
    ) -> ImportResult<RowOutcome> {
        let evaluation = self.evaluate(run, task, row)?;

        let mut record =
            ParticipantRecord::new(row.identifier(), row.location(), self.registry.task_keys());
        for (key, value) in evaluation.auxiliary {
            record.set_auxiliary(key, value);
        }
        if evaluation.complete {
            record.complete_task(&task.key);
        } else {
            record.mark_seen(&task.key);
        }

        self.participants.put(&record).await?;

        run.summary.records_created += 1;
        if evaluation.complete {
            run.transition(&record.identifier);
        }
        debug!(
            identifier = %record.identifier,
            task = %task.key,
            completed = evaluation.complete,
            "Created participant record"
        );

        Ok(RowOutcome::Created {
            identifier: record.identifier,
            task: task.key.clone(),
            completed: evaluation.complete,
        })
    }

    /// Complete the row's task on an existing record, or leave the record alone.
    ///
    /// A failed evaluation writes nothing, so a `NotSeen` task stays `NotSeen`.
    async fn update_record(
        &self,
        run: &mut ImportRun,
        row: &InputRow,
        task: &TaskDefinition,
        mut record: ParticipantRecord,
    ) -> ImportResult<RowOutcome> {
        if record.is_complete(&task.key) {
            return Ok(RowOutcome::Unchanged {
                identifier: record.identifier,
                task: task.key.clone(),
            });
        }

        let evaluation = self.evaluate(run, task, row)?;
        if !evaluation.complete {
            return Ok(RowOutcome::Unchanged {
                identifier: record.identifier,
                task: task.key.clone(),
            });
        }

        for (key, value) in evaluation.auxiliary {
            record.set_auxiliary(key, value);
        }
        record.complete_task(&task.key);
        self.participants.put(&record).await?;

        run.transition(&record.identifier);
        debug!(
            identifier = %record.identifier,
            task = %task.key,
            change_count = record.change_count,
            "Task completed"
        );

        Ok(RowOutcome::Completed {
            identifier: record.identifier,
            task: task.key.clone(),
        })
    }

    fn evaluate(
        &self,
        run: &mut ImportRun,
        task: &TaskDefinition,
        row: &InputRow,
    ) -> ImportResult<Evaluation> {
        let evaluation = self.registry.evaluate(task, row)?;
        for err in &evaluation.field_errors {
            let diagnostic = ImportError::MalformedField {
                line: row.line,
                field: err.field.to_string(),
                value: err.value.clone(),
            };
            warn!(run_id = %run.summary.run_id, task = %task.key, "{diagnostic}");
            run.summary.field_diagnostics.push(FieldDiagnostic {
                line: row.line,
                identifier: row.identifier().to_string(),
                task: task.key.clone(),
                field: err.field.to_string(),
                value: err.value.clone(),
            });
        }
        Ok(evaluation)
    }

    /// Finish a run and compute its reports. Does not touch participant records.
    #[instrument(skip(self, run), fields(run_id = %run.summary.run_id))]
    pub async fn end_run(&self, run: ImportRun) -> ImportResult<(RunSummary, ReportView)> {
        let mut summary = run.summary;
        summary.finished_at = Some(Utc::now());

        if let Some(runs) = &self.runs {
            runs.record_run(&RunRecord::from(&summary)).await?;
        }

        info!(
            rows_read = summary.rows_read,
            rows_processed = summary.rows_processed,
            rows_skipped = summary.rows_skipped(),
            field_diagnostics = summary.field_diagnostics.len(),
            records_created = summary.records_created,
            records_changed = summary.records_changed,
            transitions = summary.transitions,
            "Reconciliation run finished"
        );

        let report = self.report().await?;
        Ok((summary, report))
    }

    /// Aggregate reports over the current store.
    pub async fn report(&self) -> ImportResult<ReportView> {
        let records = self.participants.list_all().await?;
        Ok(report_projection::project(&self.registry, &records))
    }

    /// Run a whole import from a row source.
    pub async fn run_import<S: RowSource>(&self, source: S) -> ImportResult<(RunSummary, ReportView)> {
        self.run_import_observed(source, |_| {}).await
    }

    /// Run a whole import, calling `observe` after every row.
    ///
    /// The source's header is checked against the registry before any record
    /// is touched; a mismatch aborts with [`ImportError::Schema`].
    pub async fn run_import_observed<S, F>(
        &self,
        source: S,
        mut observe: F,
    ) -> ImportResult<(RunSummary, ReportView)>
    where
        S: RowSource,
        F: FnMut(&RowOutcome),
    {
        if let Some(width) = source.header_width() {
            self.registry.validate_width(width)?;
        }

        let label = source.label().to_string();
        let mut run = self.begin_run(&label).await?;

        for item in source {
            let outcome = match item {
                Ok(row) => self.process_row(&mut run, &row).await?,
                Err(ImportError::MalformedRow { line, defect }) => {
                    run.summary.rows_read += 1;
                    run.skip(line, defect)
                }
                Err(err) => return Err(err),
            };
            observe(&outcome);
        }

        self.end_run(run).await
    }
}
