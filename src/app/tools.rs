//! Assessment query tools exposed to external agents.
//!
//! Every tool answers with a JSON object carrying `"success"`. Query
//! failures become `{"success": false, "error": ...}` payloads; only an
//! unknown tool name is an error of the call itself.

use std::str::FromStr;

use serde::Serialize;
use serde_json::{Value, json};

use crate::app::ports::{AssessmentFilter, AssessmentStore};
use crate::app::queries::{AssessmentQueries, QueryError};
use crate::domain::{AssessmentId, MigrationReadiness, TableDescriptor, TableFormat};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolCallError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

fn id_property(description: &str) -> Value {
    json!({"type": "string", "description": description})
}

pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "get_latest_assessment",
            description: "Get the most recent assessment for a region/account",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "region": {"type": "string", "description": "AWS region (e.g., us-east-1)"},
                    "account_id": {"type": "string", "description": "AWS account ID (optional)"}
                }
            }),
        },
        ToolDefinition {
            name: "query_tables_by_readiness",
            description: "Find tables by migration readiness status",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "assessment_id": id_property("Assessment UUID"),
                    "readiness": {
                        "type": "string",
                        "description": "Readiness status (ready, needs_conversion, unknown)"
                    }
                },
                "required": ["assessment_id", "readiness"]
            }),
        },
        ToolDefinition {
            name: "get_database_summary",
            description: "Get summary statistics for an assessment",
            input_schema: json!({
                "type": "object",
                "properties": {"assessment_id": id_property("Assessment UUID")},
                "required": ["assessment_id"]
            }),
        },
        ToolDefinition {
            name: "search_tables",
            description: "Search for tables by name pattern",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "assessment_id": id_property("Assessment UUID"),
                    "pattern": {
                        "type": "string",
                        "description": "Search pattern (supports SQL LIKE wildcards)"
                    }
                },
                "required": ["assessment_id", "pattern"]
            }),
        },
        ToolDefinition {
            name: "get_tables_by_format",
            description: "Find tables by table format (parquet, iceberg, orc)",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "assessment_id": id_property("Assessment UUID"),
                    "format": {"type": "string", "description": "Table format (parquet, iceberg, orc)"}
                },
                "required": ["assessment_id", "format"]
            }),
        },
        ToolDefinition {
            name: "compare_assessments",
            description: "Compare two assessments to see what changed",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "assessment_id_1": id_property("First assessment UUID"),
                    "assessment_id_2": id_property("Second assessment UUID")
                },
                "required": ["assessment_id_1", "assessment_id_2"]
            }),
        },
    ]
}

pub fn call_tool(
    store: &dyn AssessmentStore,
    name: &str,
    arguments: &Value,
) -> Result<Value, ToolCallError> {
    let queries = AssessmentQueries::new(store);
    let result = match name {
        "get_latest_assessment" => get_latest_assessment(&queries, arguments),
        "query_tables_by_readiness" => query_tables_by_readiness(&queries, arguments),
        "get_database_summary" => get_database_summary(&queries, arguments),
        "search_tables" => search_tables(&queries, arguments),
        "get_tables_by_format" => get_tables_by_format(&queries, arguments),
        "compare_assessments" => compare_assessments(&queries, arguments),
        other => return Err(ToolCallError::UnknownTool(other.to_string())),
    };

    Ok(result.unwrap_or_else(|e| {
        tracing::debug!(tool = name, error = %e, "tool call failed");
        json!({"success": false, "error": e.to_string()})
    }))
}

fn get_latest_assessment(queries: &AssessmentQueries<'_>, args: &Value) -> Result<Value, QueryError> {
    let filter = AssessmentFilter {
        region: optional_str(args, "region")?.map(str::to_string),
        account_id: optional_str(args, "account_id")?.map(str::to_string),
    };
    let (_, overview) = queries.latest_assessment(&filter)?;
    Ok(json!({"success": true, "assessment": overview}))
}

fn query_tables_by_readiness(
    queries: &AssessmentQueries<'_>,
    args: &Value,
) -> Result<Value, QueryError> {
    let id = assessment_id(args, "assessment_id")?;
    let readiness = parse_arg::<MigrationReadiness>(args, "readiness")?;
    let tables = queries.tables_by_readiness(&id, readiness)?;
    Ok(json!({
        "success": true,
        "count": tables.len(),
        "readiness": readiness,
        "tables": tables.iter().map(table_json).collect::<Vec<_>>(),
    }))
}

fn get_database_summary(queries: &AssessmentQueries<'_>, args: &Value) -> Result<Value, QueryError> {
    let id = assessment_id(args, "assessment_id")?;
    let overview = queries.database_summary(&id)?;
    Ok(json!({
        "success": true,
        "assessment_id": overview.metadata.id,
        "region": overview.metadata.region,
        "account_id": overview.metadata.account_id,
        "timestamp": overview.metadata.timestamp,
        "summary": overview.summary,
    }))
}

fn search_tables(queries: &AssessmentQueries<'_>, args: &Value) -> Result<Value, QueryError> {
    let id = assessment_id(args, "assessment_id")?;
    let pattern = required_str(args, "pattern")?;
    let tables = queries.search_tables(&id, pattern)?;
    Ok(json!({
        "success": true,
        "count": tables.len(),
        "pattern": pattern,
        "tables": tables.iter().map(table_json).collect::<Vec<_>>(),
    }))
}

fn get_tables_by_format(queries: &AssessmentQueries<'_>, args: &Value) -> Result<Value, QueryError> {
    let id = assessment_id(args, "assessment_id")?;
    let format = parse_arg::<TableFormat>(args, "format")?;
    let matches = queries.tables_by_format(&id, format)?;
    Ok(json!({
        "success": true,
        "count": matches.tables.len(),
        "format": format,
        "total_size_gb": matches.total_size,
        "tables": matches.tables.iter().map(table_json).collect::<Vec<_>>(),
    }))
}

fn compare_assessments(queries: &AssessmentQueries<'_>, args: &Value) -> Result<Value, QueryError> {
    let first = assessment_id(args, "assessment_id_1")?;
    let second = assessment_id(args, "assessment_id_2")?;
    let comparison = queries.compare_assessments(&first, &second)?;
    Ok(json!({
        "success": true,
        "assessment_1": comparison.baseline,
        "assessment_2": comparison.target,
        "changes": comparison.diff.changes,
        "summary_changes": comparison.diff.summary_changes,
    }))
}

fn table_json(table: &TableDescriptor) -> Value {
    json!({
        "id": table.id,
        "database_name": table.database_name,
        "table_name": table.table_name,
        "format": table.table_format,
        "location": table.storage_location,
        "size_gb": table.estimated_size_gb,
        "partition_keys": table.partition_keys,
        "column_count": table.column_count,
        "is_iceberg": table.is_iceberg,
        "readiness": table.migration_readiness,
        "notes": table.notes,
    })
}

fn optional_str<'a>(args: &'a Value, name: &str) -> Result<Option<&'a str>, QueryError> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(QueryError::invalid(name, "expected a string")),
    }
}

fn required_str<'a>(args: &'a Value, name: &str) -> Result<&'a str, QueryError> {
    optional_str(args, name)?.ok_or_else(|| QueryError::invalid(name, "missing required argument"))
}

fn assessment_id(args: &Value, name: &str) -> Result<AssessmentId, QueryError> {
    AssessmentId::parse(required_str(args, name)?).map_err(|e| QueryError::invalid(name, e.to_string()))
}

fn parse_arg<T>(args: &Value, name: &str) -> Result<T, QueryError>
where
    T: FromStr<Err = String>,
{
    T::from_str(required_str(args, name)?).map_err(|reason| QueryError::invalid(name, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::fixtures::{MemoryStore, at, sample_snapshot, snapshot, table};
    use rstest::rstest;

    fn store_with_sample() -> (MemoryStore, String) {
        let snapshot = sample_snapshot();
        let id = snapshot.id().to_string();
        (MemoryStore::with(vec![snapshot]), id)
    }

    #[test]
    fn six_tools_are_advertised() {
        let names: Vec<_> = tool_definitions().iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "get_latest_assessment",
                "query_tables_by_readiness",
                "get_database_summary",
                "search_tables",
                "get_tables_by_format",
                "compare_assessments",
            ]
        );
    }

    #[test]
    fn definitions_serialize_with_input_schema_key() {
        let json = serde_json::to_value(&tool_definitions()[2]).unwrap();
        assert_eq!(json["inputSchema"]["required"][0], "assessment_id");
    }

    #[test]
    fn unknown_tool_is_a_call_error() {
        let store = MemoryStore::default();
        assert_eq!(
            call_tool(&store, "drop_everything", &json!({})),
            Err(ToolCallError::UnknownTool("drop_everything".to_string()))
        );
    }

    mod get_latest_assessment {
        use super::*;

        #[test]
        fn returns_assessment_with_summary() {
            let (store, id) = store_with_sample();

            let result = call_tool(&store, "get_latest_assessment", &json!({"region": "us-east-1"})).unwrap();

            assert_eq!(result["success"], true);
            assert_eq!(result["assessment"]["id"], id.as_str());
            assert_eq!(result["assessment"]["summary"]["table_count"], 3);
        }

        #[test]
        fn no_match_is_reported_as_failure() {
            let (store, _) = store_with_sample();

            let result = call_tool(&store, "get_latest_assessment", &json!({"region": "ap-south-1"})).unwrap();

            assert_eq!(result["success"], false);
            assert!(result["error"].as_str().unwrap().contains("region=ap-south-1"));
        }
    }

    mod query_tables_by_readiness {
        use super::*;

        #[test]
        fn accepts_lower_case_status() {
            let (store, id) = store_with_sample();

            let result = call_tool(
                &store,
                "query_tables_by_readiness",
                &json!({"assessment_id": id, "readiness": "ready"}),
            )
            .unwrap();

            assert_eq!(result["count"], 1);
            assert_eq!(result["readiness"], "READY");
            assert_eq!(result["tables"][0]["table_name"], "orders");
        }

        #[test]
        fn status_outside_the_enum_is_invalid_argument() {
            let (store, id) = store_with_sample();

            let result = call_tool(
                &store,
                "query_tables_by_readiness",
                &json!({"assessment_id": id, "readiness": "blocked"}),
            )
            .unwrap();

            assert_eq!(result["success"], false);
            assert!(result["error"].as_str().unwrap().starts_with("Invalid readiness"));
        }
    }

    mod get_database_summary {
        use super::*;

        #[rstest]
        #[case(json!({}), "missing required argument")]
        #[case(json!({"assessment_id": "not-a-uuid"}), "Invalid assessment_id")]
        #[case(json!({"assessment_id": 7}), "expected a string")]
        fn bad_arguments_are_structured_failures(#[case] args: Value, #[case] needle: &str) {
            let (store, _) = store_with_sample();

            let result = call_tool(&store, "get_database_summary", &args).unwrap();

            assert_eq!(result["success"], false);
            assert!(result["error"].as_str().unwrap().contains(needle));
        }

        #[test]
        fn unknown_assessment_is_not_found() {
            let (store, _) = store_with_sample();
            let missing = AssessmentId::new().to_string();

            let result = call_tool(&store, "get_database_summary", &json!({"assessment_id": missing})).unwrap();

            assert_eq!(result["success"], false);
            assert_eq!(
                result["error"],
                format!("Assessment not found: {}", missing).as_str()
            );
        }

        #[test]
        fn summary_shape_matches_aggregator_output() {
            let (store, id) = store_with_sample();

            let result = call_tool(&store, "get_database_summary", &json!({"assessment_id": id})).unwrap();

            assert_eq!(result["account_id"], "123456789012");
            assert_eq!(result["summary"]["format_breakdown"]["ICEBERG"], 1);
            assert_eq!(result["summary"]["readiness_breakdown"]["UNKNOWN"], 1);
        }
    }

    mod search_and_format {
        use super::*;

        #[test]
        fn search_uses_like_wildcards() {
            let (store, id) = store_with_sample();

            let result = call_tool(
                &store,
                "search_tables",
                &json!({"assessment_id": id, "pattern": "%events"}),
            )
            .unwrap();

            assert_eq!(result["count"], 1);
            assert_eq!(result["tables"][0]["database_name"], "logs");
            assert_eq!(result["tables"][0]["size_gb"], Value::Null);
        }

        #[test]
        fn format_query_reports_total_size() {
            let (store, id) = store_with_sample();

            let result = call_tool(
                &store,
                "get_tables_by_format",
                &json!({"assessment_id": id, "format": "parquet"}),
            )
            .unwrap();

            assert_eq!(result["count"], 1);
            assert_eq!(result["format"], "PARQUET");
            assert_eq!(result["total_size_gb"], 50.0);
        }
    }

    mod compare_assessments {
        use super::*;

        #[test]
        fn reports_changes_and_summary_delta() {
            let a = snapshot(
                at(1),
                "us-east-1",
                &["db1"],
                vec![table("db1", "t1", TableFormat::Iceberg, Some(100.0))],
            );
            let b = snapshot(
                at(2),
                "us-east-1",
                &["db1"],
                vec![table("db1", "t1", TableFormat::Parquet, Some(100.0))],
            );
            let (a_id, b_id) = (a.id().to_string(), b.id().to_string());
            let store = MemoryStore::with(vec![a, b]);

            let result = call_tool(
                &store,
                "compare_assessments",
                &json!({"assessment_id_1": a_id, "assessment_id_2": b_id}),
            )
            .unwrap();

            assert_eq!(result["success"], true);
            assert_eq!(result["assessment_1"]["id"], a_id.as_str());
            let modified = &result["changes"]["tables_modified"][0];
            assert_eq!(modified["name"], "db1.t1");
            assert_eq!(modified["old_format"], "ICEBERG");
            assert_eq!(modified["new_format"], "PARQUET");
            assert_eq!(modified["readiness_changed"], true);
            assert_eq!(result["summary_changes"]["table_count"], 0);
        }

        #[test]
        fn missing_assessment_fails_without_partial_result() {
            let (store, id) = store_with_sample();

            let result = call_tool(
                &store,
                "compare_assessments",
                &json!({"assessment_id_1": id, "assessment_id_2": AssessmentId::new().to_string()}),
            )
            .unwrap();

            assert_eq!(result, json!({"success": false, "error": result["error"].clone()}));
            assert!(result.get("changes").is_none());
        }
    }
}
