pub mod assessment_store;
pub mod catalog;

pub use assessment_store::{AssessmentFilter, AssessmentStore, StoreError};
pub use catalog::{CatalogError, CatalogPage, CatalogSource};

#[cfg(test)]
pub use catalog::MockCatalogSource;
