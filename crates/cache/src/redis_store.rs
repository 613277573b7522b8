//! Redis-backed key-value store.
//!
//! Wraps one synchronous `redis::Connection`. The connection needs `&mut`
//! access, so it sits behind a `parking_lot::Mutex` and callers are
//! serialized. Batches go out as a `MULTI`/`EXEC` pipeline: no other client
//! sees a partial batch, but Redis does not roll back the rest of a
//! transaction when one queued command fails at `EXEC` time (e.g. `INCR` on
//! a list). The cache never mixes value kinds under one key, so its batches
//! do not hit that case.

use parking_lot::Mutex;
use redis::{Commands, Connection};
use tessera_core::{Error, Result};
use tracing::{debug, info};

use crate::store::{Batch, KeyValueStore, WriteOp};

/// Default server address.
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

fn backend(e: redis::RedisError) -> Error {
    Error::Backend(e.to_string())
}

/// [`KeyValueStore`] talking to a Redis server.
pub struct RedisStore {
    conn: Mutex<Connection>,
}

impl RedisStore {
    /// Connect to the server at `url` (e.g. `redis://127.0.0.1:6379/0`).
    pub fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(backend)?;
        let conn = client.get_connection().map_err(backend)?;
        info!(url, "connected to redis");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl KeyValueStore for RedisStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.conn.lock().get(key).map_err(backend)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.conn.lock().set(key, value).map_err(backend)
    }

    fn incr(&self, key: &[u8]) -> Result<i64> {
        self.conn.lock().incr(key, 1).map_err(backend)
    }

    fn rpush(&self, key: &[u8], value: &[u8]) -> Result<usize> {
        self.conn.lock().rpush(key, value).map_err(backend)
    }

    fn lrange_all(&self, key: &[u8]) -> Result<Vec<Vec<u8>>> {
        self.conn.lock().lrange(key, 0, -1).map_err(backend)
    }

    fn flush(&self) -> Result<()> {
        let mut conn = self.conn.lock();
        debug!("flushing redis database");
        redis::cmd("FLUSHDB").query(&mut *conn).map_err(backend)
    }

    fn apply(&self, batch: &Batch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut pipe = redis::pipe();
        pipe.atomic();
        for op in batch.ops() {
            match op {
                WriteOp::Set { key, value } => {
                    pipe.set(key.as_slice(), value.as_slice()).ignore();
                }
                WriteOp::Incr { key } => {
                    pipe.incr(key.as_slice(), 1).ignore();
                }
                WriteOp::Push { key, value } => {
                    pipe.rpush(key.as_slice(), value.as_slice()).ignore();
                }
            }
        }

        let mut conn = self.conn.lock();
        pipe.query::<()>(&mut *conn).map_err(backend)?;
        debug!(ops = batch.len(), "applied batch");
        Ok(())
    }
}
