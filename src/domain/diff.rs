use serde::Serialize;

use super::readiness::MigrationReadiness;
use super::size::SizeDelta;
use super::table_format::TableFormat;

/// A table whose format or readiness moved between two assessments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableModification {
    pub name: String,
    pub format_changed: bool,
    pub old_format: TableFormat,
    pub new_format: TableFormat,
    pub readiness_changed: bool,
    pub old_readiness: MigrationReadiness,
    pub new_readiness: MigrationReadiness,
}

/// Structural changes between a baseline and a later assessment.
///
/// Tables of added or removed databases are implied by the database entry
/// and are not listed again.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ChangeSet {
    pub databases_added: Vec<String>,
    pub databases_removed: Vec<String>,
    pub tables_added: Vec<String>,
    pub tables_removed: Vec<String>,
    pub tables_modified: Vec<TableModification>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.databases_added.is_empty()
            && self.databases_removed.is_empty()
            && self.tables_added.is_empty()
            && self.tables_removed.is_empty()
            && self.tables_modified.is_empty()
    }
}

/// Signed summary movement, later minus baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SummaryDelta {
    pub database_count: i64,
    pub table_count: i64,
    pub total_size_gb: SizeDelta,
}
