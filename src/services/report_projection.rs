//! Read-side projection from participant records to report aggregates.

use std::collections::BTreeMap;

use crate::domain::models::{
    AuxKind, AuxiliaryTotal, LocationTotal, ParticipantRecord, ParticipantSummary, ReportView,
    TaskTotal,
};
use crate::services::task_registry::TaskRegistry;

/// Per-projection accumulators; nothing outlives one call to [`project`].
struct Tally {
    task_counts: Vec<u64>,
    locations: BTreeMap<String, u64>,
    aux_totals: Vec<i64>,
}

/// Build every report aggregate from the current store contents.
///
/// Only tasks present in the registry are counted, so records carrying keys
/// from an older task set do not inflate totals.
pub fn project(registry: &TaskRegistry, records: &[ParticipantRecord]) -> ReportView {
    let aux_specs: Vec<_> = registry
        .tasks()
        .iter()
        .flat_map(|task| {
            task.auxiliary
                .iter()
                .filter(|aux| aux.kind == AuxKind::Integer)
                .map(move |aux| (task, aux))
        })
        .collect();

    let mut tally = Tally {
        task_counts: vec![0; registry.len()],
        locations: BTreeMap::new(),
        aux_totals: vec![0; aux_specs.len()],
    };
    let mut participants = Vec::with_capacity(records.len());

    for record in records {
        let mut completed = 0;
        for (idx, task) in registry.tasks().iter().enumerate() {
            if record.is_complete(&task.key) {
                tally.task_counts[idx] += 1;
                completed += 1;
            }
        }

        *tally.locations.entry(record.location.clone()).or_default() += 1;

        for (idx, (task, aux)) in aux_specs.iter().enumerate() {
            if record.is_complete(&task.key) {
                if let Some(value) = record.auxiliary_integer(&aux.key) {
                    tally.aux_totals[idx] += value;
                }
            }
        }

        participants.push(ParticipantSummary {
            identifier: record.identifier.clone(),
            location: record.location.clone(),
            tasks_completed: completed,
            change_count: record.change_count,
        });
    }

    participants.sort_by(|a, b| {
        b.tasks_completed
            .cmp(&a.tasks_completed)
            .then_with(|| a.identifier.cmp(&b.identifier))
    });

    let mut fully_complete: Vec<ParticipantSummary> = participants
        .iter()
        .filter(|p| p.tasks_completed == registry.len())
        .cloned()
        .collect();
    fully_complete.sort_by(|a, b| a.identifier.cmp(&b.identifier));

    let mut changed: Vec<ParticipantSummary> = participants
        .iter()
        .filter(|p| p.change_count > 0)
        .cloned()
        .collect();
    changed.sort_by(|a, b| {
        b.change_count
            .cmp(&a.change_count)
            .then_with(|| a.identifier.cmp(&b.identifier))
    });

    let mut locations: Vec<LocationTotal> = tally
        .locations
        .into_iter()
        .map(|(location, participants)| LocationTotal {
            location,
            participants,
        })
        .collect();
    // BTreeMap order already gives location ascending for ties.
    locations.sort_by(|a, b| b.participants.cmp(&a.participants));

    let task_totals = registry
        .tasks()
        .iter()
        .zip(tally.task_counts)
        .map(|(task, completed)| TaskTotal {
            key: task.key.clone(),
            name: task.name.clone(),
            completed,
        })
        .collect();

    let auxiliary_totals = aux_specs
        .iter()
        .zip(tally.aux_totals)
        .map(|((task, aux), total)| AuxiliaryTotal {
            task_key: task.key.clone(),
            aux_key: aux.key.clone(),
            label: aux
                .total_label
                .clone()
                .unwrap_or_else(|| format!("Total {} ({})", aux.key, task.name)),
            total,
        })
        .collect();

    ReportView {
        task_count: registry.len(),
        task_totals,
        participants,
        fully_complete,
        locations,
        auxiliary_totals,
        changed,
    }
}
