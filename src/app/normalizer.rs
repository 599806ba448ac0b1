//! Turns raw Glue catalog records into typed descriptors.
//!
//! Raw records are `serde_json::Value`s shaped like the Glue `GetTables` /
//! `GetDatabases` responses. Nothing here fails: missing or ill-typed fields
//! fall back to conservative defaults, and records without a name are
//! skipped.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::{DatabaseDescriptor, SizeGb, TableFacts, TableFormat};

/// Table parameters that carry a byte count, in lookup order.
const SIZE_PARAMETERS: &[&str] = &["totalSize", "rawDataSize", "sizeKey"];

/// Returns `None` for records without a table name.
pub fn normalize_table(database_name: &str, raw: &Value) -> Option<TableFacts> {
    let Some(table_name) = str_field(raw, "Name").filter(|n| !n.is_empty()) else {
        tracing::debug!(database = database_name, "skipping table record without a name");
        return None;
    };
    let storage = raw.get("StorageDescriptor");
    let parameters = raw.get("Parameters");

    let table_type = parameters
        .and_then(|p| p.get("table_type"))
        .and_then(Value::as_str);
    let input_format = storage
        .and_then(|s| s.get("InputFormat"))
        .and_then(Value::as_str);

    Some(TableFacts {
        database_name: database_name.to_string(),
        table_name,
        table_format: resolve_format(table_type, input_format),
        storage_location: storage
            .and_then(|s| str_field(s, "Location"))
            .unwrap_or_default(),
        estimated_size_gb: parameters.and_then(estimate_size),
        partition_keys: partition_keys(raw),
        column_count: storage
            .and_then(|s| s.get("Columns"))
            .and_then(Value::as_array)
            .map_or(0, |cols| cols.len() as u32),
        last_updated: raw.get("UpdateTime").and_then(parse_timestamp),
    })
}

/// Returns `None` for records without a database name.
pub fn normalize_database(raw: &Value) -> Option<DatabaseDescriptor> {
    let Some(name) = str_field(raw, "Name").filter(|n| !n.is_empty()) else {
        tracing::debug!("skipping database record without a name");
        return None;
    };
    Some(DatabaseDescriptor::new(
        name,
        str_field(raw, "Description"),
        str_field(raw, "LocationUri"),
    ))
}

/// An explicit `table_type=ICEBERG` marker wins; otherwise the Hadoop input
/// format class name decides.
pub fn resolve_format(table_type: Option<&str>, input_format: Option<&str>) -> TableFormat {
    if table_type.is_some_and(|t| t.eq_ignore_ascii_case("ICEBERG")) {
        return TableFormat::Iceberg;
    }

    let input_format = input_format.unwrap_or_default().to_lowercase();
    if input_format.contains("parquet") {
        TableFormat::Parquet
    } else if input_format.contains("orc") {
        TableFormat::Orc
    } else {
        TableFormat::Unknown
    }
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn partition_keys(raw: &Value) -> Vec<String> {
    raw.get("PartitionKeys")
        .and_then(Value::as_array)
        .map(|keys| {
            keys.iter()
                .filter_map(|k| k.get("Name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Glue stores statistics as string-valued parameters.
fn estimate_size(parameters: &Value) -> Option<SizeGb> {
    SIZE_PARAMETERS.iter().find_map(|key| {
        let value = parameters.get(*key)?;
        let bytes = match value {
            Value::String(s) => s.trim().parse::<u64>().ok(),
            Value::Number(n) => n.as_u64(),
            _ => None,
        }?;
        Some(SizeGb::from_bytes(bytes))
    })
}

/// Accepts RFC 3339 text (AWS CLI v2) or epoch seconds (CLI v1, SDKs).
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => {
            let secs = n.as_f64()?;
            if !secs.is_finite() || secs < 0.0 {
                return None;
            }
            let whole = secs.trunc();
            let nanos = ((secs - whole) * 1e9).round() as u32;
            DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
        }
        _ => None,
    }
}
