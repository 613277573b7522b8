//! Tessera - cache call recording and document-store utilities
//!
//! Tessera bundles two small toolkits behind one facade:
//!
//! - **Cache**: values stored under random keys in a key-value store
//!   (Redis or in-process), with optional call counting and call history
//!   that can be replayed.
//! - **Docstore**: helpers over a document collection (insert, topic
//!   update, listing, topic lookup, student ranking) and an access-log
//!   statistics report.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use tessera::{replay, Cache, MemoryStore, STORE_OPERATION};
//!
//! let store = Arc::new(MemoryStore::new());
//! let cache = Cache::builder(store.clone()).count_calls().call_history().build()?;
//!
//! let key = cache.store(42)?;
//! assert_eq!(cache.get_int(&key)?, Some(42));
//! print!("{}", replay(&*store, STORE_OPERATION)?);
//! ```

pub use tessera_cache as cache;
pub use tessera_core as core;
pub use tessera_docstore as docstore;

pub use tessera_cache::{
    replay, Cache, CacheBuilder, CallCounter, CallHistory, Interceptor, KeyValueStore,
    MemoryStore, RedisStore, Replay, STORE_OPERATION,
};
pub use tessera_core::{Document, Error, Result, Value};
pub use tessera_docstore::{
    insert_school, list_all, log_stats, schools_by_topic, top_students, update_topics,
    DocumentCollection, LogStats, MemoryCollection,
};
