//! Shared test utilities for the integration suites.

#![allow(dead_code)]

use std::path::PathBuf;

use serde_json::Value as JsonValue;
use tempfile::TempDir;
use tessera::Document;

/// Build a document from a `json!` object literal.
pub fn doc(value: JsonValue) -> Document {
    value
        .as_object()
        .cloned()
        .expect("test document must be a JSON object")
}

/// A temporary directory holding JSON-lines dumps.
pub struct DumpDir {
    pub dir: TempDir,
}

impl DumpDir {
    pub fn new() -> Self {
        DumpDir {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write one line per document and return the file path.
    pub fn write(&self, name: &str, docs: &[JsonValue]) -> PathBuf {
        let path = self.path(name);
        let body: String = docs.iter().map(|d| format!("{}\n", d)).collect();
        std::fs::write(&path, body).expect("Failed to write dump");
        path
    }
}

pub fn names(docs: &[Document]) -> Vec<String> {
    docs.iter()
        .map(|d| d["name"].as_str().unwrap_or_default().to_string())
        .collect()
}
