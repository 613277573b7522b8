//! Cache call recording through the facade.

use std::sync::Arc;

use tessera::{replay, Cache, KeyValueStore, MemoryStore, Replay, STORE_OPERATION};

#[test]
fn recorded_calls_replay_in_order() {
    let store = Arc::new(MemoryStore::new());
    let cache = Cache::builder(store.clone())
        .count_calls()
        .call_history()
        .build()
        .unwrap();

    let k1 = cache.store("foo").unwrap();
    let k2 = cache.store("bar").unwrap();
    let k3 = cache.store(42).unwrap();

    assert_eq!(cache.get_str(&k1).unwrap().as_deref(), Some("foo"));
    assert_eq!(cache.get_int(&k3).unwrap(), Some(42));
    assert_eq!(
        store.get(STORE_OPERATION.as_bytes()).unwrap(),
        Some(b"3".to_vec())
    );

    let expected = format!(
        "Cache.store was called 3 times:\n\
         Cache.store(*[\"foo\"]) -> {}\n\
         Cache.store(*[\"bar\"]) -> {}\n\
         Cache.store(*[42]) -> {}\n",
        k1, k2, k3
    );
    assert_eq!(replay(&*store, STORE_OPERATION).unwrap(), expected);
}

#[test]
fn new_cache_starts_from_empty_store() {
    let store = Arc::new(MemoryStore::new());
    let first = Cache::builder(store.clone()).call_history().build().unwrap();
    first.store("old").unwrap();

    let second = Cache::builder(store.clone()).call_history().build().unwrap();
    second.store("new").unwrap();

    let history = Replay::load(&*store, STORE_OPERATION).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history.calls[0].args, "[\"new\"]");
}
