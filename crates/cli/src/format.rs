//! Result → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): report text as is, one compact JSON document per line
//! - **JSON** (`--json`): `serde_json::to_string_pretty`

use serde_json::{json, Value as JsonValue};
use tessera_cache::Replay;
use tessera_core::Document;
use tessera_docstore::{LogStats, UpdateResult};

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

fn pretty(value: &JsonValue) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Format a list of documents.
pub fn format_documents(docs: &[Document], mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(&JsonValue::Array(
            docs.iter().cloned().map(JsonValue::Object).collect(),
        )),
        OutputMode::Human => docs
            .iter()
            .map(|d| JsonValue::Object(d.clone()).to_string())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Format the id of an inserted document.
pub fn format_inserted(id: &str, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(&json!({ "inserted_id": id })),
        OutputMode::Human => id.to_string(),
    }
}

/// Format match/modify counts of an update.
pub fn format_update(result: &UpdateResult, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(&json!({
            "matched": result.matched,
            "modified": result.modified,
        })),
        OutputMode::Human => format!(
            "matched {}, modified {}",
            result.matched, result.modified
        ),
    }
}

/// Format the log report.
pub fn format_log_stats(stats: &LogStats, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            let methods: serde_json::Map<String, JsonValue> = stats
                .methods
                .iter()
                .map(|(m, n)| (m.clone(), json!(n)))
                .collect();
            let mut out = json!({
                "logs": stats.total,
                "methods": methods,
                "status_checks": stats.status_checks,
            });
            if let Some(ips) = &stats.top_ips {
                out["ips"] = ips
                    .iter()
                    .map(|(ip, n)| json!({ "ip": ip, "count": n }))
                    .collect();
            }
            pretty(&out)
        }
        OutputMode::Human => stats.to_string().trim_end_matches('\n').to_string(),
    }
}

/// Format the keys produced by `cache run` and the recorded history.
pub fn format_cache_run(keys: &[String], replay: Option<&Replay>, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            let mut out = json!({ "keys": keys });
            if let Some(replay) = replay {
                out["history"] = replay_json(replay);
            }
            pretty(&out)
        }
        OutputMode::Human => {
            let mut lines = keys.to_vec();
            if let Some(replay) = replay {
                lines.push(format_replay(replay, mode));
            }
            lines.join("\n")
        }
    }
}

fn replay_json(replay: &Replay) -> JsonValue {
    json!({
        "operation": replay.operation,
        "calls": replay
            .calls
            .iter()
            .map(|c| json!({ "args": c.args, "output": c.output }))
            .collect::<Vec<_>>(),
    })
}

/// Format a recorded call history.
pub fn format_replay(replay: &Replay, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(&replay_json(replay)),
        OutputMode::Human => replay.to_string().trim_end_matches('\n').to_string(),
    }
}

/// Format an error.
pub fn format_error(err: &anyhow::Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(&json!({ "error": format!("{:#}", err) })),
        OutputMode::Human => format!("(error) {:#}", err),
    }
}
