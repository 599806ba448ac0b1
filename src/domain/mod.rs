pub mod assessment;
pub mod database;
pub mod diff;
pub mod ids;
pub mod migration;
pub mod readiness;
pub mod size;
pub mod summary;
pub mod table;
pub mod table_format;

pub use assessment::{AssessmentMetadata, AssessmentSnapshot, InconsistentSnapshot};
pub use database::DatabaseDescriptor;
pub use diff::{ChangeSet, SummaryDelta, TableModification};
pub use ids::{AssessmentId, DatabaseId, MigrationJobId, TableId, ValidationResultId};
pub use migration::{
    JobStatus, JobStatusUpdate, MigrationJob, MigrationSummary, ValidationResult, ValidationStatus,
    ValidationType,
};
pub use readiness::MigrationReadiness;
pub use size::{SizeDelta, SizeGb};
pub use summary::{AssessmentSummary, CatalogSummary, Percent};
pub use table::{TableDescriptor, TableFacts};
pub use table_format::TableFormat;
