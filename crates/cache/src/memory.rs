//! In-memory key-value store.
//!
//! A `HashMap` behind a `parking_lot::Mutex`. Values are either byte strings
//! or lists, with the same type rules Redis applies: `INCR` only works on
//! byte strings holding a decimal integer, list commands only on lists.

use std::collections::HashMap;

use parking_lot::Mutex;
use tessera_core::{Error, Result};
use tracing::debug;

use crate::store::{Batch, KeyValueStore, WriteOp};

#[derive(Debug, Clone)]
enum Entry {
    Bytes(Vec<u8>),
    List(Vec<Vec<u8>>),
}

/// In-memory [`KeyValueStore`].
///
/// Cheap to create; each instance is an independent keyspace.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<Vec<u8>, Entry>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

fn incr_entry(entries: &mut HashMap<Vec<u8>, Entry>, key: &[u8]) -> Result<i64> {
    let current = match entries.get(key) {
        None => 0,
        Some(Entry::Bytes(raw)) => std::str::from_utf8(raw)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or_else(|| Error::wrong_type(key, "value is not an integer"))?,
        Some(Entry::List(_)) => return Err(Error::wrong_type(key, "list holds no counter")),
    };
    let next = current
        .checked_add(1)
        .ok_or_else(|| Error::wrong_type(key, "increment would overflow"))?;
    entries.insert(key.to_vec(), Entry::Bytes(next.to_string().into_bytes()));
    Ok(next)
}

fn push_entry(entries: &mut HashMap<Vec<u8>, Entry>, key: &[u8], value: &[u8]) -> Result<usize> {
    match entries
        .entry(key.to_vec())
        .or_insert_with(|| Entry::List(Vec::new()))
    {
        Entry::List(items) => {
            items.push(value.to_vec());
            Ok(items.len())
        }
        Entry::Bytes(_) => Err(Error::wrong_type(key, "value is not a list")),
    }
}

/// Reject a batch up front if any operation would fail, so that applying it
/// afterwards cannot stop halfway.
fn check_batch(entries: &HashMap<Vec<u8>, Entry>, batch: &Batch) -> Result<()> {
    // Keys set earlier in the batch change what later operations see
    let mut shadow: HashMap<&[u8], Entry> = HashMap::new();
    for op in batch.ops() {
        let key = op.key();
        let existing = shadow.get(key).or_else(|| entries.get(key)).cloned();
        match op {
            WriteOp::Set { value, .. } => {
                shadow.insert(key, Entry::Bytes(value.clone()));
            }
            WriteOp::Incr { .. } => {
                let mut scratch = HashMap::new();
                if let Some(entry) = existing {
                    scratch.insert(key.to_vec(), entry);
                }
                incr_entry(&mut scratch, key)?;
                if let Some(entry) = scratch.remove(key) {
                    shadow.insert(key, entry);
                }
            }
            WriteOp::Push { .. } => {
                if let Some(Entry::Bytes(_)) = existing {
                    return Err(Error::wrong_type(key, "value is not a list"));
                }
                shadow.insert(key, Entry::List(Vec::new()));
            }
        }
    }
    Ok(())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.entries.lock().get(key) {
            None => Ok(None),
            Some(Entry::Bytes(raw)) => Ok(Some(raw.clone())),
            Some(Entry::List(_)) => Err(Error::wrong_type(key, "value is a list")),
        }
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.entries
            .lock()
            .insert(key.to_vec(), Entry::Bytes(value.to_vec()));
        Ok(())
    }

    fn incr(&self, key: &[u8]) -> Result<i64> {
        incr_entry(&mut self.entries.lock(), key)
    }

    fn rpush(&self, key: &[u8], value: &[u8]) -> Result<usize> {
        push_entry(&mut self.entries.lock(), key, value)
    }

    fn lrange_all(&self, key: &[u8]) -> Result<Vec<Vec<u8>>> {
        match self.entries.lock().get(key) {
            None => Ok(Vec::new()),
            Some(Entry::List(items)) => Ok(items.clone()),
            Some(Entry::Bytes(_)) => Err(Error::wrong_type(key, "value is not a list")),
        }
    }

    fn flush(&self) -> Result<()> {
        let mut entries = self.entries.lock();
        debug!(keys = entries.len(), "flushing memory store");
        entries.clear();
        Ok(())
    }

    fn apply(&self, batch: &Batch) -> Result<()> {
        let mut entries = self.entries.lock();
        check_batch(&entries, batch)?;

        for op in batch.ops() {
            match op {
                WriteOp::Set { key, value } => {
                    entries.insert(key.clone(), Entry::Bytes(value.clone()));
                }
                WriteOp::Incr { key } => {
                    incr_entry(&mut entries, key)?;
                }
                WriteOp::Push { key, value } => {
                    push_entry(&mut entries, key, value)?;
                }
            }
        }
        debug!(ops = batch.len(), "applied batch");
        Ok(())
    }
}
