//! Newline-delimited JSON-RPC 2.0 over stdio for the assessment tools.
//!
//! One request per line, one response per line, handled strictly in
//! order. Notifications (requests without an `id`) get no response.

use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::app::ports::AssessmentStore;
use crate::app::tools::{ToolCallError, call_tool, tool_definitions};

pub const SERVER_NAME: &str = "aws2openstack";
const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

fn success(id: Value, result: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "result": result})
}

fn failure(id: Value, code: i64, message: impl Into<String>) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message.into()}})
}

/// Handles one input line; `None` means nothing is written back.
pub fn handle_message(store: &dyn AssessmentStore, line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let response = match serde_json::from_str::<Value>(line) {
        Ok(request) => handle_request(store, &request)?,
        Err(e) => failure(Value::Null, PARSE_ERROR, format!("Parse error: {}", e)),
    };
    Some(response.to_string())
}

fn handle_request(store: &dyn AssessmentStore, request: &Value) -> Option<Value> {
    let Some(method) = request.get("method").and_then(Value::as_str) else {
        let id = request.get("id").cloned().unwrap_or(Value::Null);
        return Some(failure(id, INVALID_REQUEST, "Invalid request: missing method"));
    };

    let Some(id) = request.get("id").cloned() else {
        tracing::debug!(method, "ignoring notification");
        return None;
    };
    let params = request.get("params").cloned().unwrap_or_else(|| json!({}));

    let response = match method {
        "initialize" => success(id, initialize_result(&params)),
        "ping" => success(id, json!({})),
        "tools/list" => success(id, json!({"tools": tool_definitions()})),
        "tools/call" => call(store, id, &params),
        other => failure(id, METHOD_NOT_FOUND, format!("Method not found: {}", other)),
    };
    Some(response)
}

fn initialize_result(params: &Value) -> Value {
    let protocol_version = params
        .get("protocolVersion")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);

    json!({
        "protocolVersion": protocol_version,
        "capabilities": {"tools": {}},
        "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")}
    })
}

fn call(store: &dyn AssessmentStore, id: Value, params: &Value) -> Value {
    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return failure(id, INVALID_PARAMS, "Missing tool name");
    };
    let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

    match call_tool(store, name, &arguments) {
        Ok(payload) => {
            let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
            success(id, json!({"content": [{"type": "text", "text": text}]}))
        }
        Err(e @ ToolCallError::UnknownTool(_)) => failure(id, INVALID_PARAMS, e.to_string()),
    }
}

/// Serves requests until the reader reaches end of input.
pub async fn serve<R, W>(
    store: &dyn AssessmentStore,
    mut reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) => handle_message(store, line),
            Err(e) => {
                tracing::debug!(error = %e, "dropping non UTF-8 line");
                Some(failure(Value::Null, PARSE_ERROR, format!("Parse error: {}", e)).to_string())
            }
        };
        if let Some(response) = response {
            writer.write_all(response.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }
    tracing::info!("tool server input closed");
    Ok(())
}

pub async fn run_stdio(store: &dyn AssessmentStore) -> std::io::Result<()> {
    tracing::info!(storage = %store.storage_path().display(), "tool server listening on stdio");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    serve(store, stdin, tokio::io::stdout()).await
}
