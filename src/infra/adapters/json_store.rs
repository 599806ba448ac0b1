use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::app::ports::{AssessmentFilter, AssessmentStore, StoreError};
use crate::domain::{AssessmentId, AssessmentMetadata, AssessmentSnapshot, MigrationJob};

const ASSESSMENTS_DIR: &str = "assessments";
const EXTENSION: &str = "json";

/// One pretty-printed JSON document per assessment under
/// `<data_dir>/assessments/<id>.json`.
///
/// The document holds the snapshot fields plus a `migration_jobs` array.
/// Writes go to an owner-only temp file in the same directory that is
/// renamed into place, so a reader never sees a half-written assessment.
pub struct JsonFileAssessmentStore {
    root: PathBuf,
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    #[serde(flatten)]
    snapshot: &'a AssessmentSnapshot,
    migration_jobs: &'a [MigrationJob],
}

#[derive(Deserialize)]
struct Document {
    #[serde(flatten)]
    snapshot: AssessmentSnapshot,
    #[serde(default)]
    migration_jobs: Vec<MigrationJob>,
}

/// Only the header is decoded when listing.
#[derive(Deserialize)]
struct MetadataOnly {
    assessment_metadata: AssessmentMetadata,
}

impl JsonFileAssessmentStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            root: data_dir.join(ASSESSMENTS_DIR),
        }
    }

    /// `None` for ids that could escape the store directory.
    fn file_for(&self, id: &AssessmentId) -> Option<PathBuf> {
        let id = id.as_str();
        let safe = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        safe.then(|| self.root.join(format!("{}.{}", id, EXTENSION)))
    }

    fn read_file(path: &Path) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(format!("{}: {}", path.display(), e))),
        }
    }

    fn corrupt(path: &Path, reason: impl ToString) -> StoreError {
        StoreError::Corrupt {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    fn read_document(&self, id: &AssessmentId) -> Result<Option<Document>, StoreError> {
        let Some(path) = self.file_for(id) else {
            return Ok(None);
        };
        let Some(content) = Self::read_file(&path)? else {
            return Ok(None);
        };
        let document: Document =
            serde_json::from_str(&content).map_err(|e| Self::corrupt(&path, e))?;
        if let Some(reason) = document
            .migration_jobs
            .iter()
            .find_map(|job| job.link_error(document.snapshot.id()))
        {
            return Err(Self::corrupt(&path, reason));
        }
        Ok(Some(document))
    }

    fn write_document(
        &self,
        snapshot: &AssessmentSnapshot,
        migration_jobs: &[MigrationJob],
    ) -> Result<(), StoreError> {
        let path = self.file_for(snapshot.id()).ok_or_else(|| {
            StoreError::Serialize(format!("unsafe assessment id: {}", snapshot.id()))
        })?;
        fs::create_dir_all(&self.root).map_err(|e| StoreError::Io(e.to_string()))?;

        let document = DocumentRef {
            snapshot,
            migration_jobs,
        };
        let content = serde_json::to_string_pretty(&document)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;

        // Dropping the temp file on any error below removes it.
        let mut tmp =
            NamedTempFile::new_in(&self.root).map_err(|e| StoreError::Io(e.to_string()))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| StoreError::Io(e.to_string()))?;
        tmp.persist(&path)
            .map_err(|e| StoreError::Io(format!("{}: {}", path.display(), e.error)))?;

        tracing::debug!(id = %snapshot.id(), path = %path.display(), "assessment written");
        Ok(())
    }

    fn assessment_files(&self) -> Result<Vec<PathBuf>, StoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::Io(e.to_string()))?.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION) && path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }
}

impl AssessmentStore for JsonFileAssessmentStore {
    fn save(&self, snapshot: &AssessmentSnapshot) -> Result<(), StoreError> {
        self.write_document(snapshot, &[])
    }

    fn migration_jobs(&self, id: &AssessmentId) -> Result<Option<Vec<MigrationJob>>, StoreError> {
        Ok(self.read_document(id)?.map(|d| d.migration_jobs))
    }

    fn replace_migration_jobs(
        &self,
        id: &AssessmentId,
        jobs: &[MigrationJob],
    ) -> Result<bool, StoreError> {
        let Some(document) = self.read_document(id)? else {
            return Ok(false);
        };
        if let Some(reason) = jobs.iter().find_map(|job| job.link_error(id)) {
            return Err(StoreError::Serialize(reason));
        }
        self.write_document(&document.snapshot, jobs)?;
        Ok(true)
    }

    fn get(&self, id: &AssessmentId) -> Result<Option<AssessmentSnapshot>, StoreError> {
        Ok(self.read_document(id)?.map(|d| d.snapshot))
    }

    fn list(
        &self,
        filter: &AssessmentFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<AssessmentMetadata>, StoreError> {
        let mut found = Vec::new();
        for path in self.assessment_files()? {
            let Some(content) = Self::read_file(&path)? else {
                continue;
            };
            let header: MetadataOnly =
                serde_json::from_str(&content).map_err(|e| Self::corrupt(&path, e))?;
            if filter.matches(&header.assessment_metadata) {
                found.push(header.assessment_metadata);
            }
        }

        found.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(found.into_iter().skip(offset).take(limit).collect())
    }

    fn delete(&self, id: &AssessmentId) -> Result<bool, StoreError> {
        let Some(path) = self.file_for(id) else {
            return Ok(false);
        };
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }

    fn storage_path(&self) -> PathBuf {
        self.root.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::fixtures::{at, sample_snapshot, snapshot};
    use tempfile::TempDir;

    fn store() -> (TempDir, JsonFileAssessmentStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileAssessmentStore::new(temp_dir.path());
        (temp_dir, store)
    }

    mod save_and_get {
        use super::*;

        #[test]
        fn snapshot_survives_a_round_trip() {
            let (_dir, store) = store();
            let snapshot = sample_snapshot();

            store.save(&snapshot).unwrap();
            let loaded = store.get(snapshot.id()).unwrap().unwrap();

            assert_eq!(loaded, snapshot);
        }

        #[test]
        fn no_temp_file_is_left_behind() {
            let (_dir, store) = store();
            store.save(&sample_snapshot()).unwrap();

            let names: Vec<_> = fs::read_dir(store.storage_path())
                .unwrap()
                .map(|e| e.unwrap().file_name().into_string().unwrap())
                .collect();

            assert_eq!(names.len(), 1);
            assert!(names[0].ends_with(".json"));
        }

        #[cfg(unix)]
        #[test]
        fn record_is_owner_readable_only() {
            use std::os::unix::fs::PermissionsExt;

            let (_dir, store) = store();
            let snapshot = sample_snapshot();
            store.save(&snapshot).unwrap();

            let path = store.file_for(snapshot.id()).unwrap();
            let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, 0o600);
        }

        #[test]
        fn missing_id_is_none() {
            let (_dir, store) = store();
            assert!(store.get(&AssessmentId::new()).unwrap().is_none());
        }

        #[test]
        fn path_like_id_is_never_resolved() {
            let (_dir, store) = store();
            let id = AssessmentId::from_string("../../etc/passwd");
            assert!(store.get(&id).unwrap().is_none());
            assert!(!store.delete(&id).unwrap());
        }

        #[test]
        fn unknown_readiness_value_is_reported_as_corrupt() {
            let (_dir, store) = store();
            let snapshot = sample_snapshot();
            store.save(&snapshot).unwrap();

            let path = store.file_for(snapshot.id()).unwrap();
            let tampered = fs::read_to_string(&path)
                .unwrap()
                .replace("\"NEEDS_CONVERSION\"", "\"BLOCKED\"");
            fs::write(&path, tampered).unwrap();

            let err = store.get(snapshot.id()).unwrap_err();

            assert!(matches!(err, StoreError::Corrupt { .. }));
        }

        #[test]
        fn contradicting_descriptors_are_reported_as_corrupt() {
            let (_dir, store) = store();
            let snapshot = sample_snapshot();
            store.save(&snapshot).unwrap();
            let path = store.file_for(snapshot.id()).unwrap();
            let original: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

            let mut flag = original.clone();
            flag["tables"][1]["is_iceberg"] = true.into();
            let mut count = original;
            count["databases"][0]["table_count"] = 7.into();

            for (tampered, needle) in [(flag, "is_iceberg"), (count, "table_count is 7")] {
                fs::write(&path, tampered.to_string()).unwrap();

                let err = store.get(snapshot.id()).unwrap_err();

                let StoreError::Corrupt { reason, .. } = err else {
                    panic!("expected a corrupt record error, got {err:?}");
                };
                assert!(reason.contains(needle), "{reason}");
            }
        }

        #[test]
        fn failed_write_leaves_no_temp_file() {
            let (_dir, store) = store();
            let snapshot = sample_snapshot();
            let path = store.file_for(snapshot.id()).unwrap();
            fs::create_dir_all(&path).unwrap();

            assert!(matches!(store.save(&snapshot), Err(StoreError::Io(_))));

            let entries: Vec<_> = fs::read_dir(store.storage_path())
                .unwrap()
                .map(|e| e.unwrap().path())
                .collect();
            assert_eq!(entries, vec![path]);
        }
    }

    mod migration_jobs {
        use super::*;
        use crate::domain::{
            JobStatus, MigrationJob, ValidationResult, ValidationStatus, ValidationType,
        };

        fn job_for(snapshot: &AssessmentSnapshot) -> MigrationJob {
            let mut job = MigrationJob::new(
                snapshot.id().clone(),
                "glue_table",
                snapshot.tables()[0].id.as_str(),
                "full_copy",
                JobStatus::Completed,
            );
            job.bytes_copied = Some(1_000_000);
            job.validation_results.push(ValidationResult::new(
                job.id.clone(),
                ValidationType::RowCount,
                ValidationStatus::Passed,
                at(16),
            ));
            job
        }

        #[test]
        fn jobs_are_kept_in_the_assessment_document() {
            let (_dir, store) = store();
            let snapshot = sample_snapshot();
            store.save(&snapshot).unwrap();
            let job = job_for(&snapshot);

            assert!(store.replace_migration_jobs(snapshot.id(), &[job.clone()]).unwrap());

            assert_eq!(store.migration_jobs(snapshot.id()).unwrap(), Some(vec![job]));
            assert_eq!(store.get(snapshot.id()).unwrap().unwrap(), snapshot);
            let listed = store.list(&AssessmentFilter::default(), 10, 0).unwrap();
            assert_eq!(listed.len(), 1);
        }

        #[test]
        fn new_assessment_has_no_jobs() {
            let (_dir, store) = store();
            let snapshot = sample_snapshot();
            store.save(&snapshot).unwrap();

            assert_eq!(store.migration_jobs(snapshot.id()).unwrap(), Some(vec![]));
        }

        #[test]
        fn missing_assessment_takes_no_jobs() {
            let (_dir, store) = store();
            let snapshot = sample_snapshot();

            assert!(store.migration_jobs(snapshot.id()).unwrap().is_none());
            assert!(!store
                .replace_migration_jobs(snapshot.id(), &[job_for(&snapshot)])
                .unwrap());
        }

        #[test]
        fn job_of_another_assessment_is_refused() {
            let (_dir, store) = store();
            let snapshot = sample_snapshot();
            let other = sample_snapshot();
            store.save(&snapshot).unwrap();

            let result = store.replace_migration_jobs(snapshot.id(), &[job_for(&other)]);

            assert!(matches!(result, Err(StoreError::Serialize(_))));
            assert_eq!(store.migration_jobs(snapshot.id()).unwrap(), Some(vec![]));
        }

        #[test]
        fn misfiled_validation_result_is_reported_as_corrupt() {
            let (_dir, store) = store();
            let snapshot = sample_snapshot();
            store.save(&snapshot).unwrap();
            store
                .replace_migration_jobs(snapshot.id(), &[job_for(&snapshot)])
                .unwrap();

            let path = store.file_for(snapshot.id()).unwrap();
            let mut json: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
            json["migration_jobs"][0]["validation_results"][0]["migration_job_id"] =
                "elsewhere".into();
            fs::write(&path, json.to_string()).unwrap();

            let err = store.migration_jobs(snapshot.id()).unwrap_err();

            assert!(matches!(err, StoreError::Corrupt { .. }));
        }
    }

    mod list {
        use super::*;

        #[test]
        fn newest_first_with_limit_and_offset() {
            let (_dir, store) = store();
            for day in [3, 1, 2] {
                store
                    .save(&snapshot(at(day), "us-east-1", &[], vec![]))
                    .unwrap();
            }

            let all = store.list(&AssessmentFilter::default(), 10, 0).unwrap();
            let days: Vec<_> = all.iter().map(|m| m.timestamp).collect();
            assert_eq!(days, vec![at(3), at(2), at(1)]);

            let page = store.list(&AssessmentFilter::default(), 1, 1).unwrap();
            assert_eq!(page.len(), 1);
            assert_eq!(page[0].timestamp, at(2));
        }

        #[test]
        fn filter_narrows_by_region() {
            let (_dir, store) = store();
            store.save(&snapshot(at(1), "us-east-1", &[], vec![])).unwrap();
            store.save(&snapshot(at(2), "eu-west-1", &[], vec![])).unwrap();

            let filter = AssessmentFilter {
                region: Some("us-east-1".to_string()),
                account_id: None,
            };
            let found = store.list(&filter, 10, 0).unwrap();

            assert_eq!(found.len(), 1);
            assert_eq!(found[0].region, "us-east-1");
        }

        #[test]
        fn empty_store_lists_nothing() {
            let (_dir, store) = store();
            assert!(store.list(&AssessmentFilter::default(), 10, 0).unwrap().is_empty());
        }

        #[test]
        fn latest_uses_newest_record() {
            let (_dir, store) = store();
            let old = snapshot(at(1), "us-east-1", &[], vec![]);
            let new = snapshot(at(9), "us-east-1", &[], vec![]);
            store.save(&old).unwrap();
            store.save(&new).unwrap();

            let latest = store.latest(&AssessmentFilter::default()).unwrap().unwrap();

            assert_eq!(latest.id(), new.id());
        }
    }

    mod delete {
        use super::*;

        #[test]
        fn removes_existing_and_reports_missing() {
            let (_dir, store) = store();
            let snapshot = sample_snapshot();
            store.save(&snapshot).unwrap();

            assert!(store.delete(snapshot.id()).unwrap());
            assert!(!store.delete(snapshot.id()).unwrap());
            assert!(store.get(snapshot.id()).unwrap().is_none());
        }
    }
}
