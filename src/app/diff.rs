use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::app::aggregator::snapshot_summary;
use crate::domain::{AssessmentSnapshot, ChangeSet, SummaryDelta, TableDescriptor, TableModification};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentDiff {
    pub changes: ChangeSet,
    pub summary_changes: SummaryDelta,
}

/// Compares `baseline` with a later `target`.
///
/// Only format and readiness are compared for tables present on both
/// sides. All name lists come out sorted.
pub fn compare(baseline: &AssessmentSnapshot, target: &AssessmentSnapshot) -> AssessmentDiff {
    let before = database_names(baseline);
    let after = database_names(target);

    let mut changes = ChangeSet {
        databases_added: after.difference(&before).map(|s| s.to_string()).collect(),
        databases_removed: before.difference(&after).map(|s| s.to_string()).collect(),
        ..ChangeSet::default()
    };

    for database in before.intersection(&after) {
        let old_tables = tables_by_name(baseline, database);
        let new_tables = tables_by_name(target, database);

        for (name, new) in &new_tables {
            match old_tables.get(name) {
                None => changes.tables_added.push(new.qualified_name()),
                Some(old) => {
                    if let Some(modification) = modification(old, new) {
                        changes.tables_modified.push(modification);
                    }
                }
            }
        }
        for (name, old) in &old_tables {
            if !new_tables.contains_key(name) {
                changes.tables_removed.push(old.qualified_name());
            }
        }
    }
    changes.tables_added.sort();
    changes.tables_removed.sort();
    changes.tables_modified.sort_by(|a, b| a.name.cmp(&b.name));

    AssessmentDiff {
        changes,
        summary_changes: summary_delta(baseline, target),
    }
}

fn database_names(snapshot: &AssessmentSnapshot) -> BTreeSet<&str> {
    snapshot
        .databases()
        .iter()
        .map(|db| db.database_name.as_str())
        .collect()
}

fn tables_by_name<'a>(
    snapshot: &'a AssessmentSnapshot,
    database: &'a str,
) -> BTreeMap<&'a str, &'a TableDescriptor> {
    snapshot
        .tables_in(database)
        .map(|t| (t.table_name.as_str(), t))
        .collect()
}

fn modification(old: &TableDescriptor, new: &TableDescriptor) -> Option<TableModification> {
    let format_changed = old.table_format != new.table_format;
    let readiness_changed = old.migration_readiness != new.migration_readiness;
    if !format_changed && !readiness_changed {
        return None;
    }
    Some(TableModification {
        name: new.qualified_name(),
        format_changed,
        old_format: old.table_format,
        new_format: new.table_format,
        readiness_changed,
        old_readiness: old.migration_readiness,
        new_readiness: new.migration_readiness,
    })
}

fn summary_delta(baseline: &AssessmentSnapshot, target: &AssessmentSnapshot) -> SummaryDelta {
    let before = snapshot_summary(baseline);
    let after = snapshot_summary(target);
    SummaryDelta {
        database_count: after.total_databases as i64 - before.total_databases as i64,
        table_count: after.total_tables as i64 - before.total_tables as i64,
        total_size_gb: before
            .total_estimated_size_gb
            .delta_to(after.total_estimated_size_gb),
    }
}
