use std::path::PathBuf;

use crate::domain::{AssessmentId, AssessmentMetadata, AssessmentSnapshot, MigrationJob};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialize error: {0}")]
    Serialize(String),
    #[error("Corrupt assessment record {path}: {reason}")]
    Corrupt { path: String, reason: String },
}

/// Narrows listings to one region and/or account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssessmentFilter {
    pub region: Option<String>,
    pub account_id: Option<String>,
}

impl AssessmentFilter {
    pub fn matches(&self, metadata: &AssessmentMetadata) -> bool {
        let region_ok = self
            .region
            .as_deref()
            .is_none_or(|r| r == metadata.region);
        let account_ok = self
            .account_id
            .as_deref()
            .is_none_or(|a| a == metadata.account_id);
        region_ok && account_ok
    }
}

/// Persistence for assessment snapshots and the migration jobs filed
/// under them.
///
/// `save` writes an assessment together with all of its databases and
/// tables, or nothing at all. Saving replaces any earlier record with the
/// same id, jobs included.
pub trait AssessmentStore: Send + Sync {
    fn save(&self, snapshot: &AssessmentSnapshot) -> Result<(), StoreError>;

    /// `None` when the assessment does not exist.
    fn migration_jobs(&self, id: &AssessmentId) -> Result<Option<Vec<MigrationJob>>, StoreError>;

    /// Replaces every job of an assessment at once; `false` when the
    /// assessment does not exist.
    fn replace_migration_jobs(
        &self,
        id: &AssessmentId,
        jobs: &[MigrationJob],
    ) -> Result<bool, StoreError>;

    fn get(&self, id: &AssessmentId) -> Result<Option<AssessmentSnapshot>, StoreError>;

    /// Newest first.
    fn list(
        &self,
        filter: &AssessmentFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<AssessmentMetadata>, StoreError>;

    fn delete(&self, id: &AssessmentId) -> Result<bool, StoreError>;

    fn storage_path(&self) -> PathBuf;

    fn latest(&self, filter: &AssessmentFilter) -> Result<Option<AssessmentSnapshot>, StoreError> {
        match self.list(filter, 1, 0)?.into_iter().next() {
            Some(metadata) => self.get(&metadata.id),
            None => Ok(None),
        }
    }
}
