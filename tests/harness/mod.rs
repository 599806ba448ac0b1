pub mod fixtures;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tempfile::TempDir;

use aws2openstack::app::assessor::GlueCatalogAssessor;
use aws2openstack::app::ports::{CatalogError, CatalogPage, CatalogSource};
use aws2openstack::domain::AssessmentSnapshot;
use aws2openstack::infra::adapters::JsonFileAssessmentStore;

pub const TEST_REGION: &str = "us-east-1";
pub const TEST_ACCOUNT: &str = "123456789012";

/// In-memory catalog that pages its records like the Glue API does.
pub struct FakeCatalog {
    databases: Vec<Value>,
    tables: BTreeMap<String, Vec<Value>>,
    page_size: usize,
    failing_database: Option<String>,
}

impl FakeCatalog {
    pub fn new(page_size: usize) -> Self {
        Self {
            databases: Vec::new(),
            tables: BTreeMap::new(),
            page_size,
            failing_database: None,
        }
    }

    pub fn database(mut self, name: &str, tables: Vec<Value>) -> Self {
        self.databases.push(fixtures::glue_database(name));
        self.tables.insert(name.to_string(), tables);
        self
    }

    pub fn failing_on(mut self, database: &str) -> Self {
        self.failing_database = Some(database.to_string());
        self
    }

    fn page(&self, items: &[Value], token: Option<String>) -> Result<CatalogPage, CatalogError> {
        let start = match token {
            Some(t) => t
                .parse::<usize>()
                .map_err(|e| CatalogError::CommandFailed(format!("bad token: {}", e)))?,
            None => 0,
        };
        let end = (start + self.page_size).min(items.len());
        Ok(CatalogPage {
            items: items[start..end].to_vec(),
            next_token: (end < items.len()).then(|| end.to_string()),
        })
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn account_id(&self) -> Result<String, CatalogError> {
        Ok(TEST_ACCOUNT.to_string())
    }

    async fn get_databases(&self, next_token: Option<String>) -> Result<CatalogPage, CatalogError> {
        self.page(&self.databases, next_token)
    }

    async fn get_tables(
        &self,
        database_name: &str,
        next_token: Option<String>,
    ) -> Result<CatalogPage, CatalogError> {
        if self.failing_database.as_deref() == Some(database_name) {
            return Err(CatalogError::CommandFailed("AccessDeniedException".to_string()));
        }
        let tables = self.tables.get(database_name).map_or(&[][..], Vec::as_slice);
        self.page(tables, next_token)
    }
}

pub async fn assess(catalog: FakeCatalog) -> AssessmentSnapshot {
    GlueCatalogAssessor::new(catalog, TEST_REGION)
        .run_assessment()
        .await
        .unwrap()
}

pub fn temp_store() -> (TempDir, JsonFileAssessmentStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = JsonFileAssessmentStore::new(temp_dir.path());
    (temp_dir, store)
}
