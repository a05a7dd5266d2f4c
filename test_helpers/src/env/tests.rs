//! Unit tests for environment helpers.

use super::*;
use std::sync::{Arc, Barrier};
use std::thread;

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn reset(key: &str, value: Option<&str>) {
    let _held = ENV_MUTEX.lock();
    // SAFETY: ENV_MUTEX is held.
    unsafe { write(key, value.map(OsStr::new)) };
}

#[test]
fn set_var_restores_original() {
    let key = "TEST_HELPERS_SET_VAR";
    reset(key, Some("orig"));
    {
        let _guard = set_var(key, "temp");
        assert_eq!(env_value(key).as_deref(), Some("temp"));
    }
    assert_eq!(env_value(key).as_deref(), Some("orig"));
    reset(key, None);
}

#[test]
fn remove_var_restores_value() {
    let key = "TEST_HELPERS_REMOVE_VAR";
    reset(key, Some("kept"));
    {
        let _guard = remove_var(key);
        assert_eq!(env_value(key), None);
    }
    assert_eq!(env_value(key).as_deref(), Some("kept"));
    reset(key, None);
}

#[test]
fn set_var_unsets_when_absent() {
    let key = "TEST_HELPERS_UNSET";
    reset(key, None);
    {
        let _guard = set_var(key, "tmp");
        assert_eq!(env_value(key).as_deref(), Some("tmp"));
    }
    assert_eq!(env_value(key), None);
}

#[test]
fn stacking_restores_in_lifo() {
    let key = "TEST_HELPERS_STACKING";
    reset(key, None);
    let outer = set_var(key, "v1");
    let inner = set_var(key, "v2");
    assert_eq!(env_value(key).as_deref(), Some("v2"));
    drop(inner);
    assert_eq!(env_value(key).as_deref(), Some("v1"));
    drop(outer);
    assert_eq!(env_value(key), None);
}

#[test]
fn scope_restores_every_guard() {
    let first = "TEST_HELPERS_SCOPE_A";
    let second = "TEST_HELPERS_SCOPE_B";
    reset(first, Some("a"));
    reset(second, None);
    {
        let _scope = scope_with(|held| vec![held.remove_var(first), held.set_var(second, "b")]);
        assert_eq!(env_value(first), None);
        assert_eq!(env_value(second).as_deref(), Some("b"));
    }
    assert_eq!(env_value(first).as_deref(), Some("a"));
    assert_eq!(env_value(second), None);
    reset(first, None);
}

#[test]
fn concurrent_mutations_restore_values() {
    const THREADS: usize = 4;
    const ITERATIONS: usize = 8;
    let keys: Vec<String> = (0..THREADS)
        .map(|i| format!("TEST_HELPERS_CONCURRENT_{i}"))
        .collect();
    for key in &keys {
        reset(key, Some("original"));
    }
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = keys
        .iter()
        .cloned()
        .map(|key| {
            let start = Arc::clone(&barrier);
            thread::spawn(move || {
                start.wait();
                for iter in 0..ITERATIONS {
                    let value = format!("value-{key}-{iter}");
                    let guard = set_var(key.as_str(), &value);
                    assert_eq!(env_value(&key), Some(value));
                    drop(guard);
                    assert_eq!(env_value(&key).as_deref(), Some("original"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker thread panicked");
    }
    for key in keys {
        assert_eq!(env_value(&key).as_deref(), Some("original"));
        reset(&key, None);
    }
}
