//! Migration jobs and validation results filed under saved assessments.

use crate::app::aggregator::migration_summary;
use crate::app::ports::{AssessmentFilter, AssessmentStore};
use crate::app::queries::QueryError;
use crate::domain::{
    AssessmentId, JobStatus, JobStatusUpdate, MigrationJob, MigrationJobId, MigrationSummary,
    ValidationResult, ValidationStatus,
};

pub struct MigrationTracker<'a> {
    store: &'a dyn AssessmentStore,
}

/// Where a job lives: its assessment and every job filed there.
struct Located {
    assessment_id: AssessmentId,
    jobs: Vec<MigrationJob>,
    index: usize,
}

impl<'a> MigrationTracker<'a> {
    pub fn new(store: &'a dyn AssessmentStore) -> Self {
        Self { store }
    }

    fn jobs_of(&self, id: &AssessmentId) -> Result<Vec<MigrationJob>, QueryError> {
        self.store
            .migration_jobs(id)?
            .ok_or_else(|| QueryError::NotFound {
                entity: "Assessment",
                id: id.to_string(),
            })
    }

    fn locate(&self, job_id: &MigrationJobId) -> Result<Option<Located>, QueryError> {
        for metadata in self.store.list(&AssessmentFilter::default(), usize::MAX, 0)? {
            let Some(jobs) = self.store.migration_jobs(&metadata.id)? else {
                continue;
            };
            if let Some(index) = jobs.iter().position(|j| &j.id == job_id) {
                return Ok(Some(Located {
                    assessment_id: metadata.id,
                    jobs,
                    index,
                }));
            }
        }
        Ok(None)
    }

    fn job_not_found(job_id: &MigrationJobId) -> QueryError {
        QueryError::NotFound {
            entity: "Migration job",
            id: job_id.to_string(),
        }
    }

    /// Inserts the job, or replaces the one with the same id.
    pub fn save_job(&self, job: &MigrationJob) -> Result<(), QueryError> {
        let mut jobs = self.jobs_of(&job.assessment_id)?;
        match jobs.iter_mut().find(|j| j.id == job.id) {
            Some(existing) => *existing = job.clone(),
            None => jobs.push(job.clone()),
        }
        self.store.replace_migration_jobs(&job.assessment_id, &jobs)?;
        tracing::debug!(job = %job.id, assessment = %job.assessment_id, status = %job.status, "migration job saved");
        Ok(())
    }

    pub fn job(&self, job_id: &MigrationJobId) -> Result<MigrationJob, QueryError> {
        let located = self.locate(job_id)?.ok_or_else(|| Self::job_not_found(job_id))?;
        let Located { mut jobs, index, .. } = located;
        Ok(jobs.swap_remove(index))
    }

    /// Jobs of one assessment in the order they were filed.
    pub fn jobs(
        &self,
        assessment_id: &AssessmentId,
        status: Option<JobStatus>,
    ) -> Result<Vec<MigrationJob>, QueryError> {
        let mut jobs = self.jobs_of(assessment_id)?;
        if let Some(status) = status {
            jobs.retain(|j| j.status == status);
        }
        Ok(jobs)
    }

    /// `false` when no job has this id.
    pub fn update_job_status(
        &self,
        job_id: &MigrationJobId,
        update: JobStatusUpdate,
    ) -> Result<bool, QueryError> {
        let Some(mut located) = self.locate(job_id)? else {
            return Ok(false);
        };
        located.jobs[located.index].apply(update);
        self.store
            .replace_migration_jobs(&located.assessment_id, &located.jobs)?;
        Ok(true)
    }

    pub fn save_validation_result(&self, result: &ValidationResult) -> Result<(), QueryError> {
        let mut located = self
            .locate(&result.migration_job_id)?
            .ok_or_else(|| Self::job_not_found(&result.migration_job_id))?;
        let results = &mut located.jobs[located.index].validation_results;
        match results.iter_mut().find(|r| r.id == result.id) {
            Some(existing) => *existing = result.clone(),
            None => results.push(result.clone()),
        }
        self.store
            .replace_migration_jobs(&located.assessment_id, &located.jobs)?;
        Ok(())
    }

    pub fn validation_results(
        &self,
        job_id: &MigrationJobId,
        status: Option<ValidationStatus>,
    ) -> Result<Vec<ValidationResult>, QueryError> {
        let mut results = self.job(job_id)?.validation_results;
        if let Some(status) = status {
            results.retain(|r| r.status == status);
        }
        Ok(results)
    }

    pub fn migration_summary(&self, assessment_id: &AssessmentId) -> Result<MigrationSummary, QueryError> {
        Ok(migration_summary(&self.jobs_of(assessment_id)?))
    }
}
