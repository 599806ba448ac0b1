use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AssessmentId, DatabaseId, TableId};
use super::readiness::MigrationReadiness;
use super::size::SizeGb;
use super::table_format::TableFormat;

/// One catalog table after normalization and classification.
///
/// `is_iceberg` always mirrors `table_format == Iceberg`; construct through
/// [`TableDescriptor::new`] so the two cannot disagree. Parent ids stay
/// empty until the table is linked into an [`AssessmentSnapshot`].
///
/// [`AssessmentSnapshot`]: super::AssessmentSnapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub id: TableId,
    pub assessment_id: AssessmentId,
    pub database_id: DatabaseId,
    pub database_name: String,
    pub table_name: String,
    pub table_format: TableFormat,
    pub storage_location: String,
    pub estimated_size_gb: Option<SizeGb>,
    #[serde(default)]
    pub partition_keys: Vec<String>,
    pub column_count: u32,
    pub last_updated: Option<DateTime<Utc>>,
    pub is_iceberg: bool,
    pub migration_readiness: MigrationReadiness,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Catalog facts about a table, before any classification happened.
#[derive(Debug, Clone, PartialEq)]
pub struct TableFacts {
    pub database_name: String,
    pub table_name: String,
    pub table_format: TableFormat,
    pub storage_location: String,
    pub estimated_size_gb: Option<SizeGb>,
    pub partition_keys: Vec<String>,
    pub column_count: u32,
    pub last_updated: Option<DateTime<Utc>>,
}

impl TableDescriptor {
    pub fn new(
        facts: TableFacts,
        migration_readiness: MigrationReadiness,
        notes: Vec<String>,
    ) -> Self {
        Self {
            id: TableId::new(),
            assessment_id: AssessmentId::from_string(""),
            database_id: DatabaseId::from_string(""),
            is_iceberg: facts.table_format == TableFormat::Iceberg,
            database_name: facts.database_name,
            table_name: facts.table_name,
            table_format: facts.table_format,
            storage_location: facts.storage_location,
            estimated_size_gb: facts.estimated_size_gb,
            partition_keys: facts.partition_keys,
            column_count: facts.column_count,
            last_updated: facts.last_updated,
            migration_readiness,
            notes,
        }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.database_name, self.table_name)
    }

    pub fn size_or_zero(&self) -> SizeGb {
        self.estimated_size_gb.unwrap_or(SizeGb::ZERO)
    }
}
