use super::ReportError;
use crate::domain::AssessmentSnapshot;

const HEADER: [&str; 9] = [
    "database",
    "table",
    "format",
    "size_gb",
    "columns",
    "partitions",
    "readiness",
    "location",
    "notes",
];

/// One row per table, in snapshot order. Unknown sizes are left blank.
pub fn render(snapshot: &AssessmentSnapshot) -> Result<String, ReportError> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER).map_err(csv_error)?;

    for table in snapshot.tables() {
        writer
            .write_record([
                table.database_name.clone(),
                table.table_name.clone(),
                table.table_format.to_string(),
                table
                    .estimated_size_gb
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
                table.column_count.to_string(),
                table.partition_keys.join(";"),
                table.migration_readiness.to_string(),
                table.storage_location.clone(),
                table.notes.join("; "),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Serialize(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ReportError::Serialize(e.to_string()))
}

fn csv_error(e: ::csv::Error) -> ReportError {
    ReportError::Serialize(e.to_string())
}
