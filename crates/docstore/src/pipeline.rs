//! Aggregation pipelines.
//!
//! A pipeline is an ordered list of [`Stage`]s; each stage consumes the
//! documents produced by the previous one. Stage and expression semantics
//! follow the usual document-database aggregation operators:
//!
//! | Stage        | Effect                                                   |
//! |--------------|----------------------------------------------------------|
//! | `Match`      | keep documents satisfying a [`Filter`]                   |
//! | `AddFields`  | compute top-level fields from expressions                |
//! | `Group`      | one output document per distinct `_id` value             |
//! | `Project`    | include, exclude or compute fields                       |
//! | `Sort`       | stable sort on one or more fields                        |
//! | `Limit`      | keep the first N documents                               |
//!
//! ## Arithmetic
//!
//! `Divide` propagates null: a null or missing operand, or a zero divisor,
//! yields null instead of failing the whole pipeline. Non-numeric operands
//! are an error. `Size` of anything but an array is an error.

use std::collections::HashMap;

use serde_json::{Number, Value as JsonValue};
use tessera_core::{compare_values, float_value, resolve_path, Document, Error, Result, ID_FIELD};

use crate::filter::Filter;

// =============================================================================
// Expressions
// =============================================================================

/// An expression evaluated against one document.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Value at a dotted field path; missing fields evaluate to null
    Field(String),
    /// A constant
    Literal(JsonValue),
    /// Sum of a number or of the numeric elements of an array
    Sum(Box<Expr>),
    /// Length of an array
    Size(Box<Expr>),
    /// Quotient of two numbers
    Divide(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// `Field(path)`
    pub fn field(path: impl Into<String>) -> Self {
        Expr::Field(path.into())
    }

    /// `Literal(value)`
    pub fn literal(value: impl Into<JsonValue>) -> Self {
        Expr::Literal(value.into())
    }

    /// `Sum(inner)`
    pub fn sum(inner: Expr) -> Self {
        Expr::Sum(Box::new(inner))
    }

    /// `Size(inner)`
    pub fn size(inner: Expr) -> Self {
        Expr::Size(Box::new(inner))
    }

    /// `Divide(dividend, divisor)`
    pub fn divide(dividend: Expr, divisor: Expr) -> Self {
        Expr::Divide(Box::new(dividend), Box::new(divisor))
    }

    /// Evaluate against `doc`.
    pub fn eval(&self, doc: &Document) -> Result<JsonValue> {
        match self {
            Expr::Field(path) => Ok(resolve_path(doc, path).unwrap_or(JsonValue::Null)),
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Sum(inner) => Ok(sum_value(&inner.eval(doc)?)),
            Expr::Size(inner) => match inner.eval(doc)? {
                JsonValue::Array(items) => Ok(JsonValue::from(items.len())),
                other => Err(Error::InvalidOperation(format!(
                    "size requires an array, got {}",
                    kind(&other)
                ))),
            },
            Expr::Divide(dividend, divisor) => {
                let (a, b) = (dividend.eval(doc)?, divisor.eval(doc)?);
                if a.is_null() || b.is_null() {
                    return Ok(JsonValue::Null);
                }
                let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) else {
                    return Err(Error::InvalidOperation(format!(
                        "divide requires numbers, got {} and {}",
                        kind(&a),
                        kind(&b)
                    )));
                };
                if y == 0.0 {
                    return Ok(JsonValue::Null);
                }
                Ok(float_value(x / y))
            }
        }
    }
}

fn kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Running numeric total that stays integral until a float shows up.
#[derive(Debug, Clone, Copy)]
enum Total {
    Int(i64),
    Float(f64),
}

impl Total {
    fn add(self, n: &Number) -> Self {
        match (self, n.as_i64()) {
            (Total::Int(acc), Some(i)) => match acc.checked_add(i) {
                Some(sum) => Total::Int(sum),
                None => Total::Float(acc as f64 + i as f64),
            },
            (Total::Int(acc), None) => Total::Float(acc as f64 + n.as_f64().unwrap_or(0.0)),
            (Total::Float(acc), _) => Total::Float(acc + n.as_f64().unwrap_or(0.0)),
        }
    }

    fn into_value(self) -> JsonValue {
        match self {
            Total::Int(i) => JsonValue::from(i),
            Total::Float(f) => float_value(f),
        }
    }
}

/// Numbers count, arrays contribute their numeric elements, anything else is 0.
fn sum_value(value: &JsonValue) -> JsonValue {
    let total = match value {
        JsonValue::Number(n) => Total::Int(0).add(n),
        JsonValue::Array(items) => items.iter().fold(Total::Int(0), |acc, item| match item {
            JsonValue::Number(n) => acc.add(n),
            _ => acc,
        }),
        _ => Total::Int(0),
    };
    total.into_value()
}

// =============================================================================
// Stages
// =============================================================================

/// Group accumulator.
#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    /// Sum of the expression over the group (`Sum(1)` counts documents)
    Sum(Expr),
}

/// One field of a `Project` stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Keep the field as is
    Include,
    /// Drop the field
    Exclude,
    /// Set the field to a computed value
    Compute(Expr),
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

/// One pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Keep matching documents
    Match(Filter),
    /// Add or replace top-level fields
    AddFields(Vec<(String, Expr)>),
    /// Group by `id`, computing each named accumulator
    Group {
        /// Grouping key
        id: Expr,
        /// Output field name and accumulator
        accumulators: Vec<(String, Accumulator)>,
    },
    /// Reshape documents
    Project(Vec<(String, Projection)>),
    /// Sort by fields, first key most significant
    Sort(Vec<(String, SortOrder)>),
    /// Keep at most N documents
    Limit(usize),
}

/// Run `stages` over `docs`.
pub fn execute(mut docs: Vec<Document>, stages: &[Stage]) -> Result<Vec<Document>> {
    for stage in stages {
        docs = match stage {
            Stage::Match(filter) => docs.into_iter().filter(|d| filter.matches(d)).collect(),
            Stage::AddFields(fields) => add_fields(docs, fields)?,
            Stage::Group { id, accumulators } => group(docs, id, accumulators)?,
            Stage::Project(fields) => project(docs, fields)?,
            Stage::Sort(keys) => sort(docs, keys),
            Stage::Limit(n) => {
                docs.truncate(*n);
                docs
            }
        };
    }
    Ok(docs)
}

fn check_top_level(field: &str) -> Result<()> {
    if field.is_empty() || field.contains('.') {
        return Err(Error::InvalidOperation(format!(
            "computed field must be a top-level name, got {:?}",
            field
        )));
    }
    Ok(())
}

fn add_fields(docs: Vec<Document>, fields: &[(String, Expr)]) -> Result<Vec<Document>> {
    for (name, _) in fields {
        check_top_level(name)?;
    }
    docs.into_iter()
        .map(|mut doc| {
            for (name, expr) in fields {
                let value = expr.eval(&doc)?;
                doc.insert(name.clone(), value);
            }
            Ok(doc)
        })
        .collect()
}

/// Lookup key for a group id; numbers compare by value, as in filters.
fn group_key(value: &JsonValue) -> String {
    fn canonical(value: &JsonValue) -> JsonValue {
        match value {
            JsonValue::Number(n) => n.as_f64().map_or(JsonValue::Null, float_value),
            JsonValue::Array(items) => JsonValue::Array(items.iter().map(canonical).collect()),
            JsonValue::Object(fields) => JsonValue::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), canonical(v)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
    canonical(value).to_string()
}

fn group(
    docs: Vec<Document>,
    id: &Expr,
    accumulators: &[(String, Accumulator)],
) -> Result<Vec<Document>> {
    for (name, _) in accumulators {
        check_top_level(name)?;
    }

    // Groups come out in order of first appearance
    let mut order: Vec<(JsonValue, Vec<Total>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for doc in &docs {
        let key = id.eval(doc)?;
        let slot = *index.entry(group_key(&key)).or_insert_with(|| {
            order.push((key.clone(), vec![Total::Int(0); accumulators.len()]));
            order.len() - 1
        });
        for (i, (_, acc)) in accumulators.iter().enumerate() {
            let Accumulator::Sum(expr) = acc;
            let contribution = sum_value(&expr.eval(doc)?);
            if let JsonValue::Number(n) = contribution {
                let totals = &mut order[slot].1;
                totals[i] = totals[i].add(&n);
            }
        }
    }

    Ok(order
        .into_iter()
        .map(|(key, totals)| {
            let mut out = Document::new();
            out.insert(ID_FIELD.to_string(), key);
            for ((name, _), total) in accumulators.iter().zip(totals) {
                out.insert(name.clone(), total.into_value());
            }
            out
        })
        .collect())
}

fn project(docs: Vec<Document>, fields: &[(String, Projection)]) -> Result<Vec<Document>> {
    for (name, _) in fields {
        check_top_level(name)?;
    }
    let inclusive = fields
        .iter()
        .any(|(_, p)| !matches!(p, Projection::Exclude));
    let drop_id = fields
        .iter()
        .any(|(name, p)| name == ID_FIELD && matches!(p, Projection::Exclude));
    if inclusive
        && fields
            .iter()
            .any(|(name, p)| name != ID_FIELD && matches!(p, Projection::Exclude))
    {
        return Err(Error::InvalidOperation(
            "projection cannot mix inclusion and exclusion".to_string(),
        ));
    }

    docs.into_iter()
        .map(|doc| {
            if !inclusive {
                let mut out = doc;
                for (name, _) in fields {
                    out.remove(name);
                }
                return Ok(out);
            }

            let mut out = Document::new();
            if !drop_id {
                if let Some(id) = doc.get(ID_FIELD) {
                    out.insert(ID_FIELD.to_string(), id.clone());
                }
            }
            for (name, projection) in fields {
                match projection {
                    Projection::Include => {
                        if let Some(value) = doc.get(name) {
                            out.insert(name.clone(), value.clone());
                        }
                    }
                    Projection::Compute(expr) => {
                        out.insert(name.clone(), expr.eval(&doc)?);
                    }
                    Projection::Exclude => {}
                }
            }
            Ok(out)
        })
        .collect()
}

fn sort(mut docs: Vec<Document>, keys: &[(String, SortOrder)]) -> Vec<Document> {
    docs.sort_by(|a, b| {
        for (path, order) in keys {
            let left = resolve_path(a, path).unwrap_or(JsonValue::Null);
            let right = resolve_path(b, path).unwrap_or(JsonValue::Null);
            let ord = compare_values(&left, &right);
            let ord = match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            };
            if ord.is_ne() {
                return ord;
            }
        }
        std::cmp::Ordering::Equal
    });
    docs
}
