use serde_json::{Value, json};

use super::FakeCatalog;

const GIB: u64 = 1024 * 1024 * 1024;
pub const PARQUET_INPUT: &str = "org.apache.hadoop.hive.ql.io.parquet.MapredParquetInputFormat";
pub const ORC_INPUT: &str = "org.apache.hadoop.hive.ql.io.orc.OrcInputFormat";
pub const TEXT_INPUT: &str = "org.apache.hadoop.mapred.TextInputFormat";

pub fn glue_database(name: &str) -> Value {
    json!({
        "Name": name,
        "LocationUri": format!("s3://lake/{}/", name),
        "CreateTime": "2023-06-01T00:00:00+00:00"
    })
}

/// A `GetTables` record with two columns and a `dt` partition.
pub fn glue_table(
    database: &str,
    name: &str,
    table_type: Option<&str>,
    input_format: &str,
    size_gib: Option<u64>,
) -> Value {
    let mut parameters = json!({"classification": "parquet"});
    if let Some(table_type) = table_type {
        parameters["table_type"] = json!(table_type);
    }
    if let Some(gib) = size_gib {
        parameters["totalSize"] = json!((gib * GIB).to_string());
    }

    json!({
        "Name": name,
        "DatabaseName": database,
        "UpdateTime": "2024-01-10T08:00:00+00:00",
        "Parameters": parameters,
        "PartitionKeys": [{"Name": "dt", "Type": "string"}],
        "StorageDescriptor": {
            "Location": format!("s3://lake/{}/{}/", database, name),
            "InputFormat": input_format,
            "Columns": [
                {"Name": "id", "Type": "bigint"},
                {"Name": "payload", "Type": "string"}
            ]
        }
    })
}

/// sales (one iceberg, one parquet table) and logs (one text table).
pub fn catalog_before() -> FakeCatalog {
    FakeCatalog::new(1)
        .database(
            "sales",
            vec![
                glue_table("sales", "orders", Some("ICEBERG"), PARQUET_INPUT, Some(100)),
                glue_table("sales", "order_items", None, PARQUET_INPUT, Some(50)),
            ],
        )
        .database(
            "logs",
            vec![glue_table("logs", "raw_events", None, TEXT_INPUT, None)],
        )
}

/// order_items converted, returns added, logs retired, analytics new.
pub fn catalog_after() -> FakeCatalog {
    FakeCatalog::new(1)
        .database(
            "sales",
            vec![
                glue_table("sales", "orders", Some("ICEBERG"), PARQUET_INPUT, Some(100)),
                glue_table("sales", "order_items", Some("ICEBERG"), PARQUET_INPUT, Some(50)),
                glue_table("sales", "returns", None, PARQUET_INPUT, Some(5)),
            ],
        )
        .database(
            "analytics",
            vec![glue_table("analytics", "daily", None, ORC_INPUT, Some(10))],
        )
}
