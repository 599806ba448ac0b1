use crate::domain::{
    AssessmentSnapshot, AssessmentSummary, CatalogSummary, DatabaseDescriptor, MigrationJob,
    MigrationReadiness, MigrationSummary, SizeGb, TableDescriptor, ValidationStatus,
};

/// Single pass over the tables of one assessment.
pub fn summarize(databases: &[DatabaseDescriptor], tables: &[TableDescriptor]) -> AssessmentSummary {
    let mut summary = AssessmentSummary {
        total_databases: databases.len(),
        total_tables: tables.len(),
        ..AssessmentSummary::default()
    };

    for table in tables {
        if table.is_iceberg {
            summary.iceberg_tables += 1;
        }
        match table.migration_readiness {
            MigrationReadiness::Ready => summary.migration_ready += 1,
            MigrationReadiness::NeedsConversion => summary.needs_conversion += 1,
            MigrationReadiness::Unknown => summary.unknown += 1,
        }
        summary.total_estimated_size_gb = summary.total_estimated_size_gb + table.size_or_zero();
    }

    debug_assert_eq!(summary.readiness_total(), summary.total_tables);
    summary
}

pub fn catalog_summary(databases: &[DatabaseDescriptor], tables: &[TableDescriptor]) -> CatalogSummary {
    let mut summary = CatalogSummary {
        database_count: databases.len(),
        table_count: tables.len(),
        ..CatalogSummary::default()
    };

    for table in tables {
        if table.is_iceberg {
            summary.iceberg_table_count += 1;
        }
        *summary
            .readiness_breakdown
            .entry(table.migration_readiness)
            .or_default() += 1;
        *summary.format_breakdown.entry(table.table_format).or_default() += 1;
        summary.total_estimated_size_gb = summary.total_estimated_size_gb + table.size_or_zero();
    }

    debug_assert_eq!(
        summary.readiness_breakdown.values().sum::<usize>(),
        summary.table_count
    );
    summary
}

pub fn snapshot_summary(snapshot: &AssessmentSnapshot) -> AssessmentSummary {
    summarize(snapshot.databases(), snapshot.tables())
}

pub fn snapshot_catalog_summary(snapshot: &AssessmentSnapshot) -> CatalogSummary {
    catalog_summary(snapshot.databases(), snapshot.tables())
}

/// Per-database numbers shown in the report overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseRollup {
    pub database_name: String,
    pub table_count: usize,
    pub iceberg_tables: usize,
    pub total_size: SizeGb,
}

/// Rollups in the snapshot's database order.
pub fn per_database(snapshot: &AssessmentSnapshot) -> Vec<DatabaseRollup> {
    snapshot
        .databases()
        .iter()
        .map(|db| {
            let mut rollup = DatabaseRollup {
                database_name: db.database_name.clone(),
                table_count: db.table_count,
                iceberg_tables: 0,
                total_size: SizeGb::ZERO,
            };
            for table in snapshot.tables_in(&db.database_name) {
                if table.is_iceberg {
                    rollup.iceberg_tables += 1;
                }
                rollup.total_size = rollup.total_size + table.size_or_zero();
            }
            rollup
        })
        .collect()
}

/// Jobs without copy counters contribute nothing to the totals.
pub fn migration_summary(jobs: &[MigrationJob]) -> MigrationSummary {
    let mut summary = MigrationSummary::default();
    for job in jobs {
        *summary.status_breakdown.entry(job.status).or_default() += 1;
        summary.total_bytes_copied += job.bytes_copied.unwrap_or(0);
        summary.total_rows_copied += job.rows_copied.unwrap_or(0);
        summary.failed_validations += job
            .validation_results
            .iter()
            .filter(|v| v.status == ValidationStatus::Failed)
            .count();
    }
    summary
}
