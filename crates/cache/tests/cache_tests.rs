//! Behavioral tests for tessera-cache
//!
//! Exercise the cache, interceptors and replay together over `MemoryStore`:
//!
//! 1. Round trips: stored values read back unchanged
//! 2. Typed reads: missing keys, conversions, conversion failures
//! 3. Counting and history: N calls produce N records in call order
//! 4. Replay: rendered output matches the recorded calls exactly
//! 5. Concurrency: parallel stores keep counter and history consistent

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use tessera_cache::{
    inputs_key, outputs_key, replay, Batch, Cache, Interceptor, Invocation, KeyValueStore,
    MemoryStore, Replay, STORE_OPERATION,
};
use tessera_core::{Error, Result, Value};

// ============================================================================
// Test Helpers
// ============================================================================

fn recording_cache() -> (Arc<MemoryStore>, Cache) {
    let store = Arc::new(MemoryStore::new());
    let cache = Cache::builder(store.clone())
        .count_calls()
        .call_history()
        .build()
        .unwrap();
    (store, cache)
}

// ============================================================================
// Round trips
// ============================================================================

proptest! {
    #[test]
    fn prop_bytes_round_trip(raw in proptest::collection::vec(any::<u8>(), 0..64)) {
        let (_store, cache) = recording_cache();
        let key = cache.store(raw.clone()).unwrap();
        prop_assert_eq!(cache.get(&key).unwrap(), Some(raw));
    }

    #[test]
    fn prop_text_round_trip(text in ".{0,32}") {
        let (_store, cache) = recording_cache();
        let key = cache.store(text.as_str()).unwrap();
        prop_assert_eq!(cache.get_str(&key).unwrap(), Some(text));
    }

    #[test]
    fn prop_int_round_trip(n in any::<i64>()) {
        let (_store, cache) = recording_cache();
        let key = cache.store(n).unwrap();
        prop_assert_eq!(cache.get_int(&key).unwrap(), Some(n));
    }
}

#[test]
fn test_float_is_stored_as_decimal_text() {
    let (_store, cache) = recording_cache();
    let key = cache.store(2.5).unwrap();
    assert_eq!(cache.get_str(&key).unwrap(), Some("2.5".to_string()));
}

// ============================================================================
// Typed reads
// ============================================================================

#[test]
fn test_unknown_key_is_absent_for_every_reader() {
    let (_store, cache) = recording_cache();
    assert_eq!(cache.get("never-stored").unwrap(), None);
    assert_eq!(cache.get_str("never-stored").unwrap(), None);
    assert_eq!(cache.get_int("never-stored").unwrap(), None);
}

#[test]
fn test_get_int_parses_numeric_text() {
    let (_store, cache) = recording_cache();
    let key = cache.store("1234").unwrap();
    assert_eq!(cache.get_int(&key).unwrap(), Some(1234));
}

#[test]
fn test_get_int_rejects_text() {
    let (_store, cache) = recording_cache();
    let key = cache.store("twelve").unwrap();
    let err = cache.get_int(&key).unwrap_err();
    assert!(matches!(err, Error::Conversion { .. }));
    assert!(err.to_string().contains("twelve"));
}

#[test]
fn test_custom_converter_errors_propagate() {
    let (_store, cache) = recording_cache();
    let key = cache.store("abc").unwrap();
    let result: Result<Option<usize>> = cache.get_with(&key, |raw| {
        if raw.len() > 2 {
            Err(Error::conversion("short", &raw))
        } else {
            Ok(raw.len())
        }
    });
    assert!(result.is_err());
}

// ============================================================================
// Counting and history
// ============================================================================

#[test]
fn test_counter_equals_number_of_calls() {
    let (_store, cache) = recording_cache();
    for i in 0..7 {
        cache.store(i).unwrap();
    }
    assert_eq!(cache.get_int(STORE_OPERATION).unwrap(), Some(7));
}

#[test]
fn test_history_in_call_order() {
    let (store, cache) = recording_cache();
    let k1 = cache.store("first").unwrap();
    let k2 = cache.store("second").unwrap();
    let k3 = cache.store("third").unwrap();

    let inputs = store
        .lrange_all(inputs_key(STORE_OPERATION).as_bytes())
        .unwrap();
    let outputs = store
        .lrange_all(outputs_key(STORE_OPERATION).as_bytes())
        .unwrap();

    assert_eq!(
        inputs,
        vec![
            br#"["first"]"#.to_vec(),
            br#"["second"]"#.to_vec(),
            br#"["third"]"#.to_vec()
        ]
    );
    assert_eq!(
        outputs,
        vec![k1.into_bytes(), k2.into_bytes(), k3.into_bytes()]
    );
}

#[test]
fn test_counting_only_keeps_no_history() {
    let store = Arc::new(MemoryStore::new());
    let cache = Cache::builder(store.clone()).count_calls().build().unwrap();
    cache.store("a").unwrap();

    assert_eq!(cache.get_int(STORE_OPERATION).unwrap(), Some(1));
    assert!(store
        .lrange_all(inputs_key(STORE_OPERATION).as_bytes())
        .unwrap()
        .is_empty());
}

#[test]
fn test_new_cache_discards_previous_records() {
    let store = Arc::new(MemoryStore::new());
    let first = Cache::builder(store.clone()).count_calls().build().unwrap();
    first.store("a").unwrap();
    first.store("b").unwrap();

    let second = Cache::builder(store.clone()).count_calls().build().unwrap();
    second.store("c").unwrap();
    assert_eq!(second.get_int(STORE_OPERATION).unwrap(), Some(1));
}

/// Custom interceptor composed alongside the built-in ones
struct LastKey;

impl Interceptor for LastKey {
    fn record(&self, call: &Invocation<'_>, batch: &mut Batch) -> Result<()> {
        batch.set(format!("{}:last", call.operation), call.output);
        Ok(())
    }
}

#[test]
fn test_custom_interceptor_runs_with_builtins() {
    let store = Arc::new(MemoryStore::new());
    let cache = Cache::builder(store.clone())
        .count_calls()
        .intercept(LastKey)
        .build()
        .unwrap();

    cache.store("a").unwrap();
    let last = cache.store("b").unwrap();

    assert_eq!(cache.get_str("Cache.store:last").unwrap(), Some(last));
    assert_eq!(cache.get_int(STORE_OPERATION).unwrap(), Some(2));
}

/// Interceptor that refuses to record anything
struct Refuse;

impl Interceptor for Refuse {
    fn record(&self, _call: &Invocation<'_>, _batch: &mut Batch) -> Result<()> {
        Err(Error::InvalidOperation("recording disabled".to_string()))
    }
}

#[test]
fn test_failed_recording_stores_nothing() {
    let store = Arc::new(MemoryStore::new());
    let cache = Cache::builder(store.clone())
        .count_calls()
        .intercept(Refuse)
        .build()
        .unwrap();

    assert!(cache.store("a").is_err());
    assert!(store.is_empty());
}

// ============================================================================
// Replay
// ============================================================================

#[test]
fn test_replay_reproduces_each_call() {
    let (store, cache) = recording_cache();
    let k1 = cache.store("foo").unwrap();
    let k2 = cache.store(&b"bar"[..]).unwrap();
    let k3 = cache.store(42).unwrap();

    let expected = format!(
        "Cache.store was called 3 times:\n\
         Cache.store(*[\"foo\"]) -> {}\n\
         Cache.store(*[b\"bar\"]) -> {}\n\
         Cache.store(*[42]) -> {}\n",
        k1, k2, k3
    );
    assert_eq!(replay(&*store, STORE_OPERATION).unwrap(), expected);
}

#[test]
fn test_replay_unknown_operation_is_empty() {
    let (store, _cache) = recording_cache();
    let replay = Replay::load(&*store, "Cache.get").unwrap();
    assert!(replay.is_empty());
}

#[test]
fn test_replay_detects_tampered_history() {
    let (store, cache) = recording_cache();
    cache.store("foo").unwrap();
    store
        .rpush(outputs_key(STORE_OPERATION).as_bytes(), b"stray")
        .unwrap();

    assert!(matches!(
        Replay::load(&*store, STORE_OPERATION),
        Err(Error::HistoryMismatch {
            inputs: 1,
            outputs: 2,
            ..
        })
    ));
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_parallel_stores_keep_records_consistent() {
    let (store, cache) = recording_cache();
    let cache = Arc::new(cache);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..25 {
                    cache.store(Value::Int(t * 100 + i)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let replay = Replay::load(&*store, STORE_OPERATION).unwrap();
    assert_eq!(replay.len(), 100);
    assert_eq!(cache.get_int(STORE_OPERATION).unwrap(), Some(100));

    // Each recorded output is the key holding exactly the recorded input
    for call in &replay.calls {
        let stored = cache.get_str(&call.output).unwrap().unwrap();
        assert_eq!(call.args, format!("[{}]", stored));
    }
}
