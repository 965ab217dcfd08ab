mod common;

use common::{row, store_with};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::BTreeMap;
use taskroll::domain::models::{CompletionState, SurveyField};
use taskroll::domain::ports::{ParticipantRepository, StaticRowSource};
use taskroll::services::TaskRegistry;

const NAMES: [&str; 4] = ["Ada", "Ben", "Cy", ""];
const TASKS: [&str; 6] = [
    "Power of One",
    "One to Many",
    "One Data Point",
    "One Voice",
    "One Idea",
    "One to Return",
];
const VALUES: [&str; 5] = ["Yes", "No", "TRUE", "", "7"];

fn arb_row() -> impl Strategy<Value = Vec<String>> {
    (0..NAMES.len(), 0..TASKS.len(), prop::collection::vec(0..VALUES.len(), 6)).prop_map(
        |(name, task, values)| {
            let flags = [
                SurveyField::HoursConfirmed,
                SurveyField::ExternalProfile,
                SurveyField::SurveySubmitted,
                SurveyField::IdeaPosted,
                SurveyField::VideoShared,
                SurveyField::IdeaVoted,
            ];
            let set: Vec<(SurveyField, &str)> = flags
                .iter()
                .zip(values)
                .map(|(f, v)| (*f, VALUES[v]))
                .collect();
            row(NAMES[name], TASKS[task], "North", &set)
        },
    )
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime")
}

type Snapshot = BTreeMap<String, BTreeMap<String, CompletionState>>;

async fn snapshot<R: ParticipantRepository + ?Sized>(repo: &R) -> Snapshot {
    repo.list_all()
        .await
        .expect("list_all should succeed")
        .into_iter()
        .map(|r| (r.identifier, r.tasks))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: replaying an export in a new run changes nothing
    #[test]
    fn prop_replay_is_idempotent(rows in prop::collection::vec(arb_row(), 0..25)) {
        runtime().block_on(async {
            let store = store_with(TaskRegistry::standard()).await;
            store.engine
                .run_import(StaticRowSource::from_fields("first", rows.clone()))
                .await
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let before = snapshot(store.participants.as_ref()).await;

            let (summary, report) = store.engine
                .run_import(StaticRowSource::from_fields("replay", rows))
                .await
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let after = snapshot(store.participants.as_ref()).await;

            prop_assert_eq!(before, after);
            prop_assert_eq!(summary.transitions, 0);
            prop_assert_eq!(summary.records_created, 0);
            prop_assert!(report.changed.is_empty());
            Ok(())
        })?;
    }

    /// Property: a completed task is never reverted by later rows
    #[test]
    fn prop_completion_is_monotonic(
        first in prop::collection::vec(arb_row(), 1..20),
        second in prop::collection::vec(arb_row(), 0..20),
    ) {
        runtime().block_on(async {
            let store = store_with(TaskRegistry::standard()).await;
            store.engine
                .run_import(StaticRowSource::from_fields("first", first))
                .await
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let before = snapshot(store.participants.as_ref()).await;

            let (summary, _) = store.engine
                .run_import(StaticRowSource::from_fields("second", second))
                .await
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let after = snapshot(store.participants.as_ref()).await;

            for (identifier, tasks) in &before {
                let later = after.get(identifier);
                prop_assert!(later.is_some(), "record {} disappeared", identifier);
                for (task, state) in tasks {
                    if state.is_complete() {
                        prop_assert!(later.and_then(|t| t.get(task)).is_some_and(|s| s.is_complete()));
                    }
                }
            }
            prop_assert_eq!(summary.rows_processed + summary.rows_skipped(), summary.rows_read);
            Ok(())
        })?;
    }
}
