use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::database::DatabaseDescriptor;
use super::ids::{AssessmentId, DatabaseId};
use super::table::TableDescriptor;
use super::table_format::TableFormat;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentMetadata {
    pub id: AssessmentId,
    pub timestamp: DateTime<Utc>,
    pub region: String,
    #[serde(rename = "aws_account_id", alias = "account_id")]
    pub account_id: String,
    pub tool_version: String,
    #[serde(default = "default_services")]
    pub services: Vec<String>,
}

fn default_services() -> Vec<String> {
    vec!["glue".to_string()]
}

impl AssessmentMetadata {
    pub fn new(
        timestamp: DateTime<Utc>,
        region: impl Into<String>,
        account_id: impl Into<String>,
        tool_version: impl Into<String>,
    ) -> Self {
        Self {
            id: AssessmentId::new(),
            timestamp,
            region: region.into(),
            account_id: account_id.into(),
            tool_version: tool_version.into(),
            services: default_services(),
        }
    }
}

/// One point-in-time scan of a catalog.
///
/// Databases and tables are linked by id when the snapshot is assembled;
/// nothing changes afterwards. Deserializing re-checks those links and
/// rejects records where they do not hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SnapshotRecord")]
pub struct AssessmentSnapshot {
    #[serde(rename = "assessment_metadata")]
    metadata: AssessmentMetadata,
    databases: Vec<DatabaseDescriptor>,
    tables: Vec<TableDescriptor>,
}

/// A snapshot record whose parts contradict each other.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InconsistentSnapshot {
    #[error("table {table}: is_iceberg does not match format {format}")]
    IcebergFlag { table: String, format: TableFormat },
    #[error("database {database}: table_count is {recorded} but {actual} tables are recorded")]
    TableCount {
        database: String,
        recorded: usize,
        actual: usize,
    },
    #[error("{entity} {name} belongs to another assessment")]
    ForeignAssessment { entity: &'static str, name: String },
    #[error("table {table} is not linked to its database")]
    DatabaseLink { table: String },
}

#[derive(Deserialize)]
struct SnapshotRecord {
    assessment_metadata: AssessmentMetadata,
    databases: Vec<DatabaseDescriptor>,
    tables: Vec<TableDescriptor>,
}

impl TryFrom<SnapshotRecord> for AssessmentSnapshot {
    type Error = InconsistentSnapshot;

    fn try_from(record: SnapshotRecord) -> Result<Self, Self::Error> {
        let SnapshotRecord {
            assessment_metadata: metadata,
            databases,
            tables,
        } = record;

        for table in &tables {
            if table.is_iceberg != (table.table_format == TableFormat::Iceberg) {
                return Err(InconsistentSnapshot::IcebergFlag {
                    table: table.qualified_name(),
                    format: table.table_format,
                });
            }
            if table.assessment_id != metadata.id {
                return Err(InconsistentSnapshot::ForeignAssessment {
                    entity: "table",
                    name: table.qualified_name(),
                });
            }
        }

        let counts = tables_per_database(&tables);
        for database in &databases {
            if database.assessment_id != metadata.id {
                return Err(InconsistentSnapshot::ForeignAssessment {
                    entity: "database",
                    name: database.database_name.clone(),
                });
            }
            let actual = counts
                .get(database.database_name.as_str())
                .copied()
                .unwrap_or(0);
            if database.table_count != actual {
                return Err(InconsistentSnapshot::TableCount {
                    database: database.database_name.clone(),
                    recorded: database.table_count,
                    actual,
                });
            }
        }

        let database_ids: HashMap<&str, &DatabaseId> = databases
            .iter()
            .map(|db| (db.database_name.as_str(), &db.id))
            .collect();
        if let Some(table) = tables.iter().find(|t| {
            database_ids
                .get(t.database_name.as_str())
                .is_some_and(|id| **id != t.database_id)
        }) {
            return Err(InconsistentSnapshot::DatabaseLink {
                table: table.qualified_name(),
            });
        }

        Ok(Self {
            metadata,
            databases,
            tables,
        })
    }
}

fn tables_per_database(tables: &[TableDescriptor]) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for table in tables {
        *counts.entry(table.database_name.as_str()).or_default() += 1;
    }
    counts
}

impl AssessmentSnapshot {
    pub fn new(
        metadata: AssessmentMetadata,
        mut databases: Vec<DatabaseDescriptor>,
        mut tables: Vec<TableDescriptor>,
    ) -> Self {
        let counts = tables_per_database(&tables);
        for database in &mut databases {
            database.assessment_id = metadata.id.clone();
            database.table_count = counts
                .get(database.database_name.as_str())
                .copied()
                .unwrap_or(0);
        }

        let database_ids: HashMap<&str, _> = databases
            .iter()
            .map(|db| (db.database_name.as_str(), &db.id))
            .collect();
        for table in &mut tables {
            table.assessment_id = metadata.id.clone();
            if let Some(id) = database_ids.get(table.database_name.as_str()) {
                table.database_id = (*id).clone();
            }
        }

        Self {
            metadata,
            databases,
            tables,
        }
    }

    pub fn id(&self) -> &AssessmentId {
        &self.metadata.id
    }

    pub fn metadata(&self) -> &AssessmentMetadata {
        &self.metadata
    }

    pub fn databases(&self) -> &[DatabaseDescriptor] {
        &self.databases
    }

    pub fn tables(&self) -> &[TableDescriptor] {
        &self.tables
    }

    pub fn database(&self, name: &str) -> Option<&DatabaseDescriptor> {
        self.databases.iter().find(|db| db.database_name == name)
    }

    pub fn tables_in<'a>(&'a self, database_name: &'a str) -> impl Iterator<Item = &'a TableDescriptor> {
        self.tables
            .iter()
            .filter(move |t| t.database_name == database_name)
    }
}
