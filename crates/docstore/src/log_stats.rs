//! Web-server log statistics.
//!
//! Reads a collection of access-log documents (`method`, `path`, `ip`) and
//! renders a fixed-format report:
//!
//! ```text
//! 94778 logs
//! Methods:
//! 	method GET: 93842
//! 	method POST: 229
//! 	method PUT: 0
//! 	method PATCH: 0
//! 	method DELETE: 0
//! 47415 status check
//! IPs:
//! 	172.31.63.67: 15805
//! 	...
//! ```
//!
//! The `IPs:` section is present only when top addresses were collected.

use std::collections::HashMap;
use std::fmt;

use tessera_core::{Document, Result, ID_FIELD};

use crate::collection::DocumentCollection;
use crate::filter::Filter;
use crate::pipeline::{Accumulator, Expr, Projection, SortOrder, Stage};

/// Methods reported, in report order.
pub const LOG_METHODS: [&str; 5] = ["GET", "POST", "PUT", "PATCH", "DELETE"];

/// Number of addresses in the `IPs:` section by default.
pub const DEFAULT_TOP_IPS: usize = 10;

/// Collected log statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogStats {
    /// Total number of log documents
    pub total: u64,
    /// Count per method, for every method in [`LOG_METHODS`]
    pub methods: Vec<(String, u64)>,
    /// Number of `GET /status` requests
    pub status_checks: u64,
    /// Most frequent addresses with their counts, if collected
    pub top_ips: Option<Vec<(String, u64)>>,
}

fn count_of(doc: &Document, field: &str) -> u64 {
    doc.get(field).and_then(|v| v.as_u64()).unwrap_or(0)
}

impl LogStats {
    /// Collect every statistic, including the top [`DEFAULT_TOP_IPS`] addresses.
    pub fn collect(collection: &dyn DocumentCollection) -> Result<Self> {
        Self::collect_with(collection, Some(DEFAULT_TOP_IPS))
    }

    /// Collect statistics; `top_ips` of `None` skips the address query.
    pub fn collect_with(collection: &dyn DocumentCollection, top_ips: Option<usize>) -> Result<Self> {
        let total = collection.count_documents(&Filter::new())?;

        let grouped = collection.aggregate(&[
            Stage::Group {
                id: Expr::field("method"),
                accumulators: vec![("count".to_string(), Accumulator::Sum(Expr::literal(1)))],
            },
            Stage::Project(vec![
                (ID_FIELD.to_string(), Projection::Exclude),
                ("method".to_string(), Projection::Compute(Expr::field(ID_FIELD))),
                ("count".to_string(), Projection::Include),
            ]),
            Stage::Sort(vec![("method".to_string(), SortOrder::Ascending)]),
        ])?;
        let by_method: HashMap<String, u64> = grouped
            .iter()
            .filter_map(|doc| {
                let method = doc.get("method")?.as_str()?.to_string();
                Some((method, count_of(doc, "count")))
            })
            .collect();
        let methods = LOG_METHODS
            .iter()
            .map(|m| (m.to_string(), by_method.get(*m).copied().unwrap_or(0)))
            .collect();

        let status_checks =
            collection.count_documents(&Filter::new().eq("method", "GET").eq("path", "/status"))?;

        let top_ips = match top_ips {
            Some(limit) => Some(Self::top_addresses(collection, limit)?),
            None => None,
        };

        Ok(Self {
            total,
            methods,
            status_checks,
            top_ips,
        })
    }

    fn top_addresses(collection: &dyn DocumentCollection, limit: usize) -> Result<Vec<(String, u64)>> {
        let docs = collection.aggregate(&[
            Stage::Group {
                id: Expr::field("ip"),
                accumulators: vec![("count".to_string(), Accumulator::Sum(Expr::literal(1)))],
            },
            Stage::Sort(vec![("count".to_string(), SortOrder::Descending)]),
            Stage::Limit(limit),
        ])?;
        Ok(docs
            .iter()
            .map(|doc| {
                let ip = match doc.get(ID_FIELD) {
                    Some(serde_json::Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => "null".to_string(),
                };
                (ip, count_of(doc, "count"))
            })
            .collect())
    }
}

impl fmt::Display for LogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} logs", self.total)?;
        writeln!(f, "Methods:")?;
        for (method, count) in &self.methods {
            writeln!(f, "\tmethod {}: {}", method, count)?;
        }
        writeln!(f, "{} status check", self.status_checks)?;
        if let Some(ips) = &self.top_ips {
            writeln!(f, "IPs:")?;
            for (ip, count) in ips {
                writeln!(f, "\t{}: {}", ip, count)?;
            }
        }
        Ok(())
    }
}

/// Collect and render the full report.
pub fn log_stats(collection: &dyn DocumentCollection) -> Result<String> {
    Ok(LogStats::collect(collection)?.to_string())
}
