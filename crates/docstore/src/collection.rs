//! Document collection trait.
//!
//! The query helpers in this crate take `&dyn DocumentCollection` and issue
//! exactly one call against it. Connection setup, authentication and
//! transport belong to the implementation.

use tessera_core::{Document, Result};

use crate::filter::{Filter, Update};
use crate::pipeline::Stage;

/// Outcome of [`DocumentCollection::update_many`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    /// Documents matching the filter
    pub matched: u64,
    /// Documents whose content actually changed
    pub modified: u64,
}

/// A collection of documents.
pub trait DocumentCollection: Send + Sync {
    /// Insert one document and return its `_id` as text.
    ///
    /// A document without `_id` gets a generated one.
    fn insert_one(&self, doc: Document) -> Result<String>;

    /// Apply `update` to every document matching `filter`.
    fn update_many(&self, filter: &Filter, update: &Update) -> Result<UpdateResult>;

    /// Every document matching `filter`, in collection order.
    fn find(&self, filter: &Filter) -> Result<Vec<Document>>;

    /// Run an aggregation pipeline over the whole collection.
    fn aggregate(&self, pipeline: &[Stage]) -> Result<Vec<Document>>;

    /// Number of documents matching `filter`.
    fn count_documents(&self, filter: &Filter) -> Result<u64>;
}
