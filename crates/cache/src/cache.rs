//! Cache: random-key value storage over a [`KeyValueStore`]
//!
//! ## Design
//!
//! `Cache` owns an `Arc<dyn KeyValueStore>` handle and nothing else beyond
//! its interceptor list. Building a cache **flushes the store**: every key,
//! including counters and histories left by earlier caches, is removed.
//!
//! ## Recording
//!
//! `store` is the one recorded operation. Its own `SET`, plus whatever the
//! configured interceptors queue for it, go to the store as one atomic batch.
//! A failed store therefore records nothing, and concurrent callers cannot
//! interleave a counter bump from one call with history entries from another.
//!
//! ## Reads
//!
//! `get` returns raw bytes; `get_with` applies a converter only when the key
//! exists. Converter errors are returned to the caller unchanged.

use std::sync::Arc;

use tessera_core::{Error, Result, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::interceptor::{CallCounter, CallHistory, Interceptor, Invocation};
use crate::store::{Batch, KeyValueStore};

/// Operation name under which `Cache::store` calls are recorded.
pub const STORE_OPERATION: &str = "Cache.store";

/// Read `key` from `store` and convert it with `convert` if present.
///
/// Shared by [`Cache::get_with`] and callers that only hold a store handle
/// (reading must not flush, unlike building a `Cache`).
pub fn read_with<T, F>(store: &dyn KeyValueStore, key: &str, convert: F) -> Result<Option<T>>
where
    F: FnOnce(Vec<u8>) -> Result<T>,
{
    match store.get(key.as_bytes())? {
        Some(raw) => convert(raw).map(Some),
        None => Ok(None),
    }
}

/// Decode stored bytes as UTF-8 text.
pub fn decode_text(raw: Vec<u8>) -> Result<String> {
    String::from_utf8(raw).map_err(|e| Error::conversion("text", e.as_bytes()))
}

/// Parse stored bytes as a decimal integer.
pub fn decode_int(raw: Vec<u8>) -> Result<i64> {
    std::str::from_utf8(&raw)
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .ok_or_else(|| Error::conversion("integer", &raw))
}

/// Value cache with optional call counting and call history.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use tessera_cache::{Cache, MemoryStore};
///
/// let cache = Cache::builder(Arc::new(MemoryStore::new()))
///     .count_calls()
///     .call_history()
///     .build()?;
///
/// let key = cache.store("hello")?;
/// assert_eq!(cache.get_str(&key)?, Some("hello".to_string()));
/// ```
pub struct Cache {
    store: Arc<dyn KeyValueStore>,
    interceptors: Vec<Box<dyn Interceptor>>,
}

impl Cache {
    /// Build a plain cache over `store`, flushing it.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        Self::builder(store).build()
    }

    /// Start configuring a cache over `store`.
    pub fn builder(store: Arc<dyn KeyValueStore>) -> CacheBuilder {
        CacheBuilder {
            store,
            interceptors: Vec::new(),
        }
    }

    /// The underlying store handle.
    pub fn store_handle(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Store `value` under a fresh random key and return the key.
    pub fn store(&self, value: impl Into<Value>) -> Result<String> {
        let value = value.into();
        let key = Uuid::new_v4().to_string();

        let mut batch = Batch::new();
        batch.set(key.as_str(), value.to_bytes());

        let args = [value];
        let call = Invocation {
            operation: STORE_OPERATION,
            args: &args,
            output: &key,
        };
        for interceptor in &self.interceptors {
            interceptor.record(&call, &mut batch)?;
        }

        self.store.apply(&batch)?;
        debug!(key = %key, kind = args[0].type_name(), "stored value");
        Ok(key)
    }

    /// Raw bytes stored under `key`, or `None`.
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        read_with(self.store.as_ref(), key, Ok)
    }

    /// Value under `key` passed through `convert`, or `None` without calling it.
    pub fn get_with<T, F>(&self, key: &str, convert: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> Result<T>,
    {
        read_with(self.store.as_ref(), key, convert)
    }

    /// Value under `key` decoded as UTF-8 text.
    pub fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, decode_text)
    }

    /// Value under `key` parsed as a decimal integer.
    pub fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, decode_int)
    }
}

/// Builder composing interceptors around [`Cache::store`].
pub struct CacheBuilder {
    store: Arc<dyn KeyValueStore>,
    interceptors: Vec<Box<dyn Interceptor>>,
}

impl CacheBuilder {
    /// Count calls in a counter named after the operation.
    pub fn count_calls(self) -> Self {
        self.intercept(CallCounter)
    }

    /// Record each call's arguments and result for replay.
    pub fn call_history(self) -> Self {
        self.intercept(CallHistory)
    }

    /// Add a custom interceptor; interceptors run in the order added.
    pub fn intercept(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Box::new(interceptor));
        self
    }

    /// Flush the store and return the cache.
    pub fn build(self) -> Result<Cache> {
        self.store.flush()?;
        info!(interceptors = self.interceptors.len(), "cache ready, store flushed");
        Ok(Cache {
            store: self.store,
            interceptors: self.interceptors,
        })
    }
}
