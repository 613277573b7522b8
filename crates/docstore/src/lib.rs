//! Document-store layer for Tessera
//!
//! Provides query helpers over any document collection:
//! - **DocumentCollection**: the collection interface (insert, update, find, aggregate, count)
//! - **MemoryCollection**: in-process collection with JSON-lines import/export
//! - **Pipeline**: typed aggregation stages and expressions
//! - **Schools**: insert, topic update, listing and topic lookup
//! - **Students**: average-score ranking
//! - **LogStats**: access-log report
//!
//! Every helper takes `&dyn DocumentCollection` and issues one operation
//! (the log report issues one per statistic). Failures from the collection
//! are returned unchanged.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod filter;
pub mod log_stats;
pub mod memory;
pub mod pipeline;
pub mod schools;
pub mod students;

pub use collection::{DocumentCollection, UpdateResult};
pub use filter::{Filter, Update};
pub use log_stats::{log_stats, LogStats, DEFAULT_TOP_IPS, LOG_METHODS};
pub use memory::MemoryCollection;
pub use pipeline::{execute, Accumulator, Expr, Projection, SortOrder, Stage};
pub use schools::{insert_school, list_all, schools_by_topic, update_topics};
pub use students::{top_students, top_students_pipeline, AVERAGE_FIELD};
