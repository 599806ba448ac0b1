use chrono::Utc;
use serde_json::Value;

use crate::app::classifier::classify;
use crate::app::normalizer::{normalize_database, normalize_table};
use crate::app::ports::{CatalogError, CatalogSource};
use crate::domain::{
    AssessmentMetadata, AssessmentSnapshot, DatabaseDescriptor, TableDescriptor, TableFormat,
};

pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Normalizes and classifies one raw table record. Nameless records are
/// dropped.
pub fn assess_table(database_name: &str, raw: &Value) -> Option<TableDescriptor> {
    let facts = normalize_table(database_name, raw)?;
    let is_iceberg = facts.table_format == TableFormat::Iceberg;
    let (readiness, notes) = classify(is_iceberg, facts.table_format, &facts.storage_location);
    Some(TableDescriptor::new(facts, readiness, notes))
}

/// Walks a whole catalog and produces one snapshot.
pub struct GlueCatalogAssessor<C: CatalogSource> {
    source: C,
    region: String,
}

impl<C: CatalogSource> GlueCatalogAssessor<C> {
    pub fn new(source: C, region: impl Into<String>) -> Self {
        Self {
            source,
            region: region.into(),
        }
    }

    pub async fn list_databases(&self) -> Result<Vec<DatabaseDescriptor>, CatalogError> {
        let mut databases = Vec::new();
        let mut next_token = None;

        loop {
            let page = self.source.get_databases(next_token.take()).await?;
            tracing::debug!(count = page.items.len(), "fetched database page");
            databases.extend(page.items.iter().filter_map(normalize_database));

            match page.next_token.filter(|t| !t.is_empty()) {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        Ok(databases)
    }

    pub async fn list_tables(&self, database_name: &str) -> Result<Vec<TableDescriptor>, CatalogError> {
        let mut tables = Vec::new();
        let mut next_token = None;

        loop {
            let page = self
                .source
                .get_tables(database_name, next_token.take())
                .await?;
            tracing::debug!(
                database = database_name,
                count = page.items.len(),
                "fetched table page"
            );
            tables.extend(
                page.items
                    .iter()
                    .filter_map(|raw| assess_table(database_name, raw)),
            );

            match page.next_token.filter(|t| !t.is_empty()) {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        Ok(tables)
    }

    /// Any catalog error aborts the run; no partial snapshot is returned.
    pub async fn run_assessment(&self) -> Result<AssessmentSnapshot, CatalogError> {
        let account_id = self.source.account_id().await?;
        tracing::info!(region = %self.region, account = %account_id, "starting Glue catalog assessment");

        let databases = self.list_databases().await?;
        let mut tables = Vec::new();
        for database in &databases {
            let found = self.list_tables(&database.database_name).await?;
            tracing::info!(
                database = %database.database_name,
                tables = found.len(),
                "assessed database"
            );
            tables.extend(found);
        }

        let metadata = AssessmentMetadata::new(Utc::now(), &self.region, account_id, TOOL_VERSION);
        Ok(AssessmentSnapshot::new(metadata, databases, tables))
    }
}
