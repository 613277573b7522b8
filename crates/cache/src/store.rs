//! Key-value store trait and write batches.
//!
//! This module defines the storage interface the cache wrapper talks to.
//! Implementations live in [`crate::memory`] and [`crate::redis_store`].

use tessera_core::Result;

// =============================================================================
// Write Operations
// =============================================================================

/// A pending write operation.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Set a key to a value.
    Set {
        /// Target key
        key: Vec<u8>,
        /// New value
        value: Vec<u8>,
    },
    /// Increment the integer counter stored at a key by one.
    Incr {
        /// Counter key
        key: Vec<u8>,
    },
    /// Append a value to the list stored at a key.
    Push {
        /// List key
        key: Vec<u8>,
        /// Appended element
        value: Vec<u8>,
    },
}

impl WriteOp {
    /// Get the key for this operation.
    pub fn key(&self) -> &[u8] {
        match self {
            WriteOp::Set { key, .. } | WriteOp::Incr { key } | WriteOp::Push { key, .. } => key,
        }
    }
}

/// An ordered group of writes committed atomically by [`KeyValueStore::apply`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    ops: Vec<WriteOp>,
}

impl Batch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a `SET`.
    pub fn set(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> &mut Self {
        self.ops.push(WriteOp::Set {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Queue an `INCR`.
    pub fn incr(&mut self, key: impl Into<Vec<u8>>) -> &mut Self {
        self.ops.push(WriteOp::Incr { key: key.into() });
        self
    }

    /// Queue an `RPUSH`.
    pub fn push(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> &mut Self {
        self.ops.push(WriteOp::Push {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Queued operations in order.
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Number of queued operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

// =============================================================================
// KeyValueStore Trait
// =============================================================================

/// A key-value store holding byte values, integer counters and lists.
///
/// Mirrors the subset of Redis the cache needs. Every call is a blocking
/// round trip; failures surface immediately.
pub trait KeyValueStore: Send + Sync {
    /// Get the value for a key, returning `None` if not found.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Set a key to a value, replacing whatever was there.
    fn set(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Increment the counter at `key` by one and return the new value.
    ///
    /// A missing key counts as zero. A key holding non-integer data is an error.
    fn incr(&self, key: &[u8]) -> Result<i64>;

    /// Append `value` to the list at `key`, returning the new list length.
    fn rpush(&self, key: &[u8], value: &[u8]) -> Result<usize>;

    /// Read the full list at `key`; a missing key is an empty list.
    fn lrange_all(&self, key: &[u8]) -> Result<Vec<Vec<u8>>>;

    /// Remove every key.
    fn flush(&self) -> Result<()>;

    /// Apply every operation in `batch` atomically, in order.
    ///
    /// Either all operations take effect or none do, and no other caller
    /// observes a partially applied batch.
    fn apply(&self, batch: &Batch) -> Result<()>;
}
