//! Document types for the document store
//!
//! A document is a JSON object. Field paths are dotted (`topics.score`) and
//! traverse arrays the way document databases do: resolving `topics.score`
//! against an array of objects yields the array of their `score` fields.
//!
//! This module also defines the total order used for sorting mixed values:
//! null < numbers < strings < objects < arrays < booleans.

use serde_json::{Map, Number, Value as JsonValue};
use std::cmp::Ordering;

/// A document: JSON object with string keys
pub type Document = Map<String, JsonValue>;

/// Field name holding a document's identifier
pub const ID_FIELD: &str = "_id";

/// Resolve a dotted field path against a document.
///
/// Returns `None` when the path does not exist. Arrays met along the way
/// are traversed element-wise; elements that lack the remaining path are
/// skipped.
pub fn resolve_path(doc: &Document, path: &str) -> Option<JsonValue> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let rest: Vec<&str> = segments.collect();
    resolve_segments(doc.get(first)?, &rest)
}

fn resolve_segments(value: &JsonValue, segments: &[&str]) -> Option<JsonValue> {
    let Some((head, tail)) = segments.split_first() else {
        return Some(value.clone());
    };

    match value {
        JsonValue::Object(obj) => resolve_segments(obj.get(*head)?, tail),
        JsonValue::Array(items) => {
            // A numeric segment indexes; otherwise fan out over elements
            if let Ok(idx) = head.parse::<usize>() {
                return resolve_segments(items.get(idx)?, tail);
            }
            let found: Vec<JsonValue> = items
                .iter()
                .filter_map(|item| resolve_segments(item, segments))
                .collect();
            Some(JsonValue::Array(found))
        }
        _ => None,
    }
}

/// Build a JSON number from an `f64`; non-finite values become null.
pub fn float_value(x: f64) -> JsonValue {
    Number::from_f64(x).map_or(JsonValue::Null, JsonValue::Number)
}

/// Equality used by filters: numbers compare by value (`15 == 15.0`),
/// everything else structurally.
pub fn values_equal(a: &JsonValue, b: &JsonValue) -> bool {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => x.as_f64() == y.as_f64(),
        (JsonValue::Array(x), JsonValue::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| values_equal(l, r))
        }
        (JsonValue::Object(x), JsonValue::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(k, v)| y.get(k).map_or(false, |other| values_equal(v, other)))
        }
        _ => a == b,
    }
}

fn type_rank(value: &JsonValue) -> u8 {
    match value {
        JsonValue::Null => 1,
        JsonValue::Number(_) => 2,
        JsonValue::String(_) => 3,
        JsonValue::Object(_) => 4,
        JsonValue::Array(_) => 5,
        JsonValue::Bool(_) => 8,
    }
}

/// Total order over JSON values for sorting.
pub fn compare_values(a: &JsonValue, b: &JsonValue) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }

    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (JsonValue::String(x), JsonValue::String(y)) => x.cmp(y),
        (JsonValue::Bool(x), JsonValue::Bool(y)) => x.cmp(y),
        (JsonValue::Array(x), JsonValue::Array(y)) => {
            for (l, r) in x.iter().zip(y) {
                let ord = compare_values(l, r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (JsonValue::Object(x), JsonValue::Object(y)) => {
            for ((lk, lv), (rk, rv)) in x.iter().zip(y) {
                let ord = lk.cmp(rk).then_with(|| compare_values(lv, rv));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => Ordering::Equal,
    }
}
