use crate::domain::{MigrationReadiness, TableFormat};

pub const NON_S3_LOCATION: &str = "Non-S3 storage location";
pub const UNKNOWN_FORMAT: &str = "Unknown table format";

/// Maps catalog facts to a readiness verdict plus advisory notes.
///
/// Rules are checked top to bottom and the first match wins:
///
/// | condition                         | verdict          |
/// |-----------------------------------|------------------|
/// | iceberg on `s3://`                | READY            |
/// | iceberg elsewhere                 | UNKNOWN          |
/// | PARQUET / ORC / AVRO              | NEEDS_CONVERSION |
/// | UNKNOWN format                    | UNKNOWN          |
/// | anything else                     | UNKNOWN          |
pub fn classify(
    is_iceberg: bool,
    table_format: TableFormat,
    storage_location: &str,
) -> (MigrationReadiness, Vec<String>) {
    if is_iceberg {
        if storage_location.starts_with("s3://") {
            return (MigrationReadiness::Ready, Vec::new());
        }
        return (
            MigrationReadiness::Unknown,
            vec![NON_S3_LOCATION.to_string()],
        );
    }

    match table_format {
        format if format.is_file_format() => (
            MigrationReadiness::NeedsConversion,
            vec![format!("{} format requires conversion to Iceberg", table_format)],
        ),
        TableFormat::Unknown => (
            MigrationReadiness::Unknown,
            vec![UNKNOWN_FORMAT.to_string()],
        ),
        // Only reachable when the iceberg flag and the format disagree.
        _ => (
            MigrationReadiness::Unknown,
            vec![format!("Unsupported format: {}", table_format)],
        ),
    }
}
