//! In-memory document collection.
//!
//! Documents live in a `Vec` behind a `parking_lot::RwLock`, in insertion
//! order. Collections can be loaded from and saved to JSON-lines dumps (one
//! document per line, the format `mongoexport` writes). Extended-JSON object
//! ids (`{"$oid": "..."}`) are read as plain text ids.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use parking_lot::RwLock;
use serde_json::Value as JsonValue;
use tessera_core::{Document, Error, Result, ID_FIELD};
use tracing::{debug, info};
use uuid::Uuid;

use crate::collection::{DocumentCollection, UpdateResult};
use crate::filter::{Filter, Update};
use crate::pipeline::{execute, Stage};

/// Generate a 24-hex-digit document id.
fn generate_id() -> String {
    Uuid::new_v4().as_bytes()[..12]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Text form of an `_id` value.
fn id_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Replace an extended-JSON `{"$oid": "..."}` id with its text.
fn normalize_id(doc: &mut Document) {
    let oid = match doc.get(ID_FIELD) {
        Some(JsonValue::Object(obj)) if obj.len() == 1 => obj.get("$oid").and_then(|v| v.as_str()),
        _ => None,
    }
    .map(str::to_string);
    if let Some(oid) = oid {
        doc.insert(ID_FIELD.to_string(), JsonValue::String(oid));
    }
}

/// Documents in insertion order plus the set of their ids.
#[derive(Debug, Default)]
struct Contents {
    docs: Vec<Document>,
    ids: HashSet<String>,
}

/// In-memory [`DocumentCollection`].
///
/// `_id` values are indexed, so inserts stay constant-time.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    contents: RwLock<Contents>,
}

impl MemoryCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection holding `docs`, assigning ids where missing.
    pub fn from_documents(docs: impl IntoIterator<Item = Document>) -> Result<Self> {
        let collection = Self::new();
        for doc in docs {
            collection.insert_one(doc)?;
        }
        Ok(collection)
    }

    /// Load a JSON-lines dump. Blank lines are skipped.
    pub fn load_json_lines(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let collection = Self::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let mut doc: Document = serde_json::from_str(&line).map_err(|e| {
                Error::SerializationError(format!("{}:{}: {}", path.display(), lineno + 1, e))
            })?;
            normalize_id(&mut doc);
            collection.insert_one(doc)?;
        }
        info!(path = %path.display(), documents = collection.len(), "loaded collection");
        Ok(collection)
    }

    /// Write every document to `path` as JSON lines, replacing the file.
    pub fn save_json_lines(&self, path: &Path) -> Result<()> {
        let contents = self.contents.read();
        let docs = &contents.docs;
        let mut writer = BufWriter::new(File::create(path)?);
        for doc in docs.iter() {
            serde_json::to_writer(&mut writer, doc)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        debug!(path = %path.display(), documents = docs.len(), "saved collection");
        Ok(())
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.contents.read().docs.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.contents.read().docs.is_empty()
    }
}

impl DocumentCollection for MemoryCollection {
    fn insert_one(&self, mut doc: Document) -> Result<String> {
        let mut contents = self.contents.write();
        let id = match doc.get(ID_FIELD) {
            Some(existing) => id_text(existing),
            None => {
                let id = generate_id();
                doc.insert(ID_FIELD.to_string(), JsonValue::String(id.clone()));
                id
            }
        };
        if contents.ids.contains(&id) {
            return Err(Error::DuplicateId(id));
        }
        contents.ids.insert(id.clone());
        contents.docs.push(doc);
        Ok(id)
    }

    fn update_many(&self, filter: &Filter, update: &Update) -> Result<UpdateResult> {
        // Updates never touch `_id`, so the id index stays valid
        update.validate()?;
        let mut contents = self.contents.write();
        let mut result = UpdateResult::default();
        for doc in contents.docs.iter_mut().filter(|d| filter.matches(d)) {
            result.matched += 1;
            if update.apply(doc) {
                result.modified += 1;
            }
        }
        debug!(matched = result.matched, modified = result.modified, "update_many");
        Ok(result)
    }

    fn find(&self, filter: &Filter) -> Result<Vec<Document>> {
        Ok(self
            .contents
            .read()
            .docs
            .iter()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect())
    }

    fn aggregate(&self, pipeline: &[Stage]) -> Result<Vec<Document>> {
        let snapshot = self.contents.read().docs.clone();
        execute(snapshot, pipeline)
    }

    fn count_documents(&self, filter: &Filter) -> Result<u64> {
        Ok(self
            .contents
            .read()
            .docs
            .iter()
            .filter(|d| filter.matches(d))
            .count() as u64)
    }
}
