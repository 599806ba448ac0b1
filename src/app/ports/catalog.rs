use async_trait::async_trait;
use serde_json::Value;

/// One page of raw catalog records plus the token for the next page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogPage {
    pub items: Vec<Value>,
    pub next_token: Option<String>,
}

impl CatalogPage {
    pub fn last(items: Vec<Value>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }
}

/// Paginated access to a Glue-style data catalog.
///
/// Records are returned raw; the normalizer is the only consumer that looks
/// inside them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn account_id(&self) -> Result<String, CatalogError>;

    async fn get_databases(&self, next_token: Option<String>) -> Result<CatalogPage, CatalogError>;

    async fn get_tables(
        &self,
        database_name: &str,
        next_token: Option<String>,
    ) -> Result<CatalogPage, CatalogError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Command not found: {0}")]
    CommandNotFound(String),
    #[error("Catalog request failed: {0}")]
    CommandFailed(String),
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    #[error("Catalog request timed out")]
    Timeout,
}
