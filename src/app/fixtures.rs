use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};

use crate::app::classifier::classify;
use crate::app::ports::{AssessmentFilter, AssessmentStore, StoreError};
use crate::domain::{
    AssessmentId, AssessmentMetadata, AssessmentSnapshot, DatabaseDescriptor, MigrationJob,
    SizeGb, TableDescriptor, TableFacts, TableFormat,
};

pub fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 10, 30, 0).unwrap()
}

pub fn table(database: &str, name: &str, format: TableFormat, size_gb: Option<f64>) -> TableDescriptor {
    located_table(
        database,
        name,
        format,
        &format!("s3://lake/{}/{}/", database, name),
        size_gb,
    )
}

pub fn located_table(
    database: &str,
    name: &str,
    format: TableFormat,
    location: &str,
    size_gb: Option<f64>,
) -> TableDescriptor {
    let (readiness, notes) = classify(format == TableFormat::Iceberg, format, location);
    TableDescriptor::new(
        TableFacts {
            database_name: database.to_string(),
            table_name: name.to_string(),
            table_format: format,
            storage_location: location.to_string(),
            estimated_size_gb: size_gb.and_then(SizeGb::from_gb),
            partition_keys: vec!["dt".to_string()],
            column_count: 5,
            last_updated: Some(at(1)),
        },
        readiness,
        notes,
    )
}

pub fn snapshot(
    timestamp: DateTime<Utc>,
    region: &str,
    databases: &[&str],
    tables: Vec<TableDescriptor>,
) -> AssessmentSnapshot {
    AssessmentSnapshot::new(
        AssessmentMetadata::new(timestamp, region, "123456789012", "0.3.0"),
        databases
            .iter()
            .map(|name| DatabaseDescriptor::new(*name, None, Some(format!("s3://lake/{}/", name))))
            .collect(),
        tables,
    )
}

/// Sales (iceberg + parquet) and logs (unknown), three tables in total.
pub fn sample_snapshot() -> AssessmentSnapshot {
    snapshot(
        at(15),
        "us-east-1",
        &["sales", "logs"],
        vec![
            table("sales", "orders", TableFormat::Iceberg, Some(100.0)),
            table("sales", "order_items", TableFormat::Parquet, Some(50.0)),
            table("logs", "raw_events", TableFormat::Unknown, None),
        ],
    )
}

#[derive(Default)]
pub struct MemoryStore {
    snapshots: Mutex<Vec<AssessmentSnapshot>>,
    jobs: Mutex<HashMap<AssessmentId, Vec<MigrationJob>>>,
}

impl MemoryStore {
    pub fn with(snapshots: Vec<AssessmentSnapshot>) -> Self {
        Self {
            snapshots: Mutex::new(snapshots),
            jobs: Mutex::default(),
        }
    }

    fn contains(&self, id: &AssessmentId) -> bool {
        self.snapshots.lock().unwrap().iter().any(|s| s.id() == id)
    }
}

impl AssessmentStore for MemoryStore {
    fn save(&self, snapshot: &AssessmentSnapshot) -> Result<(), StoreError> {
        let mut snapshots = self.snapshots.lock().unwrap();
        snapshots.retain(|s| s.id() != snapshot.id());
        snapshots.push(snapshot.clone());
        self.jobs.lock().unwrap().remove(snapshot.id());
        Ok(())
    }

    fn migration_jobs(&self, id: &AssessmentId) -> Result<Option<Vec<MigrationJob>>, StoreError> {
        if !self.contains(id) {
            return Ok(None);
        }
        Ok(Some(self.jobs.lock().unwrap().get(id).cloned().unwrap_or_default()))
    }

    fn replace_migration_jobs(
        &self,
        id: &AssessmentId,
        jobs: &[MigrationJob],
    ) -> Result<bool, StoreError> {
        if !self.contains(id) {
            return Ok(false);
        }
        self.jobs.lock().unwrap().insert(id.clone(), jobs.to_vec());
        Ok(true)
    }

    fn get(&self, id: &AssessmentId) -> Result<Option<AssessmentSnapshot>, StoreError> {
        Ok(self
            .snapshots
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id() == id)
            .cloned())
    }

    fn list(
        &self,
        filter: &AssessmentFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<AssessmentMetadata>, StoreError> {
        let mut found: Vec<_> = self
            .snapshots
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.metadata().clone())
            .filter(|m| filter.matches(m))
            .collect();
        found.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(found.into_iter().skip(offset).take(limit).collect())
    }

    fn delete(&self, id: &AssessmentId) -> Result<bool, StoreError> {
        let mut snapshots = self.snapshots.lock().unwrap();
        let before = snapshots.len();
        snapshots.retain(|s| s.id() != id);
        self.jobs.lock().unwrap().remove(id);
        Ok(snapshots.len() != before)
    }

    fn storage_path(&self) -> PathBuf {
        PathBuf::from("memory")
    }
}
