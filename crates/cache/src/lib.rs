//! Key-value cache layer for Tessera
//!
//! Provides a value cache over any key-value store:
//! - **KeyValueStore**: the storage interface (get/set, counters, lists, atomic batches)
//! - **MemoryStore**: in-process store for tests and ephemeral use
//! - **RedisStore**: store backed by a Redis server
//! - **Cache**: random-key value storage with typed reads
//! - **Interceptors**: call counting and call history, composed onto `Cache::store`
//! - **Replay**: rendering of recorded call history
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tessera_cache::{replay, Cache, MemoryStore, STORE_OPERATION};
//!
//! let store = Arc::new(MemoryStore::new());
//! let cache = Cache::builder(store.clone()).count_calls().call_history().build()?;
//! cache.store("foo")?;
//! cache.store(42)?;
//! print!("{}", replay(store.as_ref(), STORE_OPERATION)?);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod interceptor;
pub mod memory;
pub mod redis_store;
pub mod replay;
pub mod store;

pub use cache::{decode_int, decode_text, read_with, Cache, CacheBuilder, STORE_OPERATION};
pub use interceptor::{inputs_key, outputs_key, CallCounter, CallHistory, Interceptor, Invocation};
pub use memory::MemoryStore;
pub use redis_store::{RedisStore, DEFAULT_REDIS_URL};
pub use replay::{replay, RecordedCall, Replay};
pub use store::{Batch, KeyValueStore, WriteOp};
