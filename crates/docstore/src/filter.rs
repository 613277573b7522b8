//! Query filters and field updates.
//!
//! A [`Filter`] is a conjunction of equality conditions on dotted field paths.
//! A condition also matches when the field holds an array containing the
//! expected value, so `Filter::new().eq("topics", "Python")` selects every
//! document whose `topics` list includes `"Python"`. An empty filter matches
//! every document.

use serde_json::Value as JsonValue;
use tessera_core::{resolve_path, values_equal, Document, Error, Result, ID_FIELD};

/// Conjunction of field equality conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, JsonValue)>,
}

impl Filter {
    /// Filter matching every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the condition `field == value`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    /// The conditions, in the order added.
    pub fn conditions(&self) -> &[(String, JsonValue)] {
        &self.conditions
    }

    /// Whether `doc` satisfies every condition.
    pub fn matches(&self, doc: &Document) -> bool {
        self.conditions.iter().all(|(path, expected)| {
            match resolve_path(doc, path) {
                Some(actual) => field_matches(&actual, expected),
                None => expected.is_null(),
            }
        })
    }
}

fn field_matches(actual: &JsonValue, expected: &JsonValue) -> bool {
    if values_equal(actual, expected) {
        return true;
    }
    match actual {
        JsonValue::Array(items) => items.iter().any(|item| values_equal(item, expected)),
        _ => false,
    }
}

/// Field assignments applied to every matched document (`$set`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    sets: Vec<(String, JsonValue)>,
}

impl Update {
    /// Update assigning `field = value`.
    pub fn set(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::default().and_set(field, value)
    }

    /// Add another assignment.
    pub fn and_set(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.sets.push((field.into(), value.into()));
        self
    }

    /// The assignments, in the order added.
    pub fn assignments(&self) -> &[(String, JsonValue)] {
        &self.sets
    }

    /// Reject updates that cannot be applied: empty, `_id`, or dotted paths.
    pub fn validate(&self) -> Result<()> {
        if self.sets.is_empty() {
            return Err(Error::InvalidOperation("update sets no fields".to_string()));
        }
        for (field, _) in &self.sets {
            if field == ID_FIELD {
                return Err(Error::InvalidOperation("cannot update _id".to_string()));
            }
            if field.is_empty() || field.contains('.') {
                return Err(Error::InvalidOperation(format!(
                    "update field must be a top-level name, got {:?}",
                    field
                )));
            }
        }
        Ok(())
    }

    /// Apply the assignments to `doc`; returns whether anything changed.
    pub fn apply(&self, doc: &mut Document) -> bool {
        let mut changed = false;
        for (field, value) in &self.sets {
            if doc.get(field) != Some(value) {
                doc.insert(field.clone(), value.clone());
                changed = true;
            }
        }
        changed
    }
}
