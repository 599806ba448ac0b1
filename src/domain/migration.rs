//! Data-copy jobs started from an assessment, and the checks run on them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AssessmentId, MigrationJobId, ValidationResultId};

macro_rules! snake_case_enum {
    ($(#[$meta:meta])* $name:ident, $label:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn all_variants() -> &'static [$name] {
                &[$($name::$variant),+]
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(format!("Unknown {}: {}", $label, s)),
                }
            }
        }
    };
}

snake_case_enum!(
    /// Lifecycle of one copy job
    JobStatus, "job status" {
        Pending => "pending",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
);

snake_case_enum!(
    ValidationStatus, "validation status" {
        Passed => "passed",
        Failed => "failed",
        Warning => "warning",
    }
);

snake_case_enum!(
    ValidationType, "validation type" {
        RowCount => "row_count",
        Checksum => "checksum",
        Schema => "schema",
        Statistical => "statistical",
        Sample => "sample",
    }
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub id: ValidationResultId,
    pub migration_job_id: MigrationJobId,
    pub validation_type: ValidationType,
    pub status: ValidationStatus,
    pub source_value: Option<String>,
    pub target_value: Option<String>,
    pub difference: Option<String>,
    pub validated_at: DateTime<Utc>,
}

impl ValidationResult {
    pub fn new(
        migration_job_id: MigrationJobId,
        validation_type: ValidationType,
        status: ValidationStatus,
        validated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ValidationResultId::new(),
            migration_job_id,
            validation_type,
            status,
            source_value: None,
            target_value: None,
            difference: None,
            validated_at,
        }
    }
}

/// Copy of one catalog resource into the target lakehouse.
///
/// `resource_id` is the id of the database or table being moved; one-off
/// copies leave `sync_mode` empty, shadow runs record their last sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationJob {
    pub id: MigrationJobId,
    pub assessment_id: AssessmentId,
    pub resource_type: String,
    pub resource_id: String,
    pub job_type: String,
    pub aws_job_id: Option<String>,
    pub status: JobStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub bytes_copied: Option<u64>,
    pub rows_copied: Option<u64>,
    pub error_message: Option<String>,
    pub sync_mode: Option<String>,
    pub last_sync_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub validation_results: Vec<ValidationResult>,
}

impl MigrationJob {
    pub fn new(
        assessment_id: AssessmentId,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        job_type: impl Into<String>,
        status: JobStatus,
    ) -> Self {
        Self {
            id: MigrationJobId::new(),
            assessment_id,
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            job_type: job_type.into(),
            aws_job_id: None,
            status,
            started_at: None,
            completed_at: None,
            bytes_copied: None,
            rows_copied: None,
            error_message: None,
            sync_mode: None,
            last_sync_timestamp: None,
            validation_results: Vec::new(),
        }
    }

    /// Status always changes; message and completion time only when given.
    pub fn apply(&mut self, update: JobStatusUpdate) {
        self.status = update.status;
        if let Some(message) = update.error_message {
            self.error_message = Some(message);
        }
        if let Some(completed_at) = update.completed_at {
            self.completed_at = Some(completed_at);
        }
    }

    /// Inconsistent links between this job, its assessment and its results.
    pub fn link_error(&self, assessment_id: &AssessmentId) -> Option<String> {
        if &self.assessment_id != assessment_id {
            return Some(format!(
                "migration job {} belongs to assessment {}",
                self.id, self.assessment_id
            ));
        }
        self.validation_results
            .iter()
            .find(|v| v.migration_job_id != self.id)
            .map(|v| {
                format!(
                    "validation result {} is filed under job {} but names job {}",
                    v.id, self.id, v.migration_job_id
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatusUpdate {
    pub status: JobStatus,
    pub error_message: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobStatusUpdate {
    pub fn to(status: JobStatus) -> Self {
        Self {
            status,
            error_message: None,
            completed_at: None,
        }
    }
}

/// Progress of every job filed under one assessment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationSummary {
    pub status_breakdown: BTreeMap<JobStatus, usize>,
    pub total_bytes_copied: u64,
    pub total_rows_copied: u64,
    pub failed_validations: usize,
}
