//! School/topic record helpers.
//!
//! A school document carries a `name` and a `topics` list of labels.

use serde_json::Value as JsonValue;
use tessera_core::{Document, Result};

use crate::collection::{DocumentCollection, UpdateResult};
use crate::filter::{Filter, Update};

/// Insert a document built from `fields` and return its id.
pub fn insert_school(collection: &dyn DocumentCollection, fields: Document) -> Result<String> {
    collection.insert_one(fields)
}

/// Replace the `topics` list of every school named `name`.
pub fn update_topics<S: AsRef<str>>(
    collection: &dyn DocumentCollection,
    name: &str,
    topics: &[S],
) -> Result<UpdateResult> {
    let topics: Vec<JsonValue> = topics
        .iter()
        .map(|t| JsonValue::String(t.as_ref().to_string()))
        .collect();
    collection.update_many(
        &Filter::new().eq("name", name),
        &Update::set("topics", topics),
    )
}

/// Every document in the collection.
pub fn list_all(collection: &dyn DocumentCollection) -> Result<Vec<Document>> {
    collection.find(&Filter::new())
}

/// Every school whose `topics` list contains `topic`.
pub fn schools_by_topic(collection: &dyn DocumentCollection, topic: &str) -> Result<Vec<Document>> {
    collection.find(&Filter::new().eq("topics", topic))
}
