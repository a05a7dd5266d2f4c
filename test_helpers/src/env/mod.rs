//! Scoped environment variable changes for tests.
//!
//! Configuration discovery reads `XDG_CONFIG_HOME` and `HOME`, both of which
//! are process-wide. Every change made here holds a global re-entrant mutex
//! and returns a guard that restores the previous value when dropped. Guards
//! for the same key restore in LIFO order.
//!
//! Tests that need several variables to stay consistent for their whole
//! body should build an [`EnvScope`] with [`scope_with`].
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let _xdg = env::set_var("XDG_CONFIG_HOME", "/tmp/xdg");
//! assert_eq!(std::env::var("XDG_CONFIG_HOME").as_deref(), Ok("/tmp/xdg"));
//! ```

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

enum Change<'a> {
    Set(&'a OsStr),
    Remove,
}

/// Apply `change` to `key` and capture the value it replaced.
///
/// The caller's `_held` guard proves the environment lock is taken.
fn apply(
    key: String,
    change: &Change<'_>,
    _held: &ReentrantMutexGuard<'static, ()>,
) -> EnvVarGuard {
    let original = env::var_os(&key);
    // SAFETY: ENV_MUTEX is held for the duration of the write.
    unsafe { write(&key, target(change)) };
    EnvVarGuard { key, original }
}

const fn target<'a>(change: &Change<'a>) -> Option<&'a OsStr> {
    match change {
        Change::Set(value) => Some(*value),
        Change::Remove => None,
    }
}

/// Set or remove `key`.
///
/// # Safety
///
/// Callers must hold `ENV_MUTEX`.
unsafe fn write(key: &str, value: Option<&OsStr>) {
    match value {
        // SAFETY: forwarded from the caller.
        Some(text) => unsafe { env::set_var(key, text) },
        // SAFETY: forwarded from the caller.
        None => unsafe { env::remove_var(key) },
    }
}

/// Restores an environment variable to its prior value on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _held = ENV_MUTEX.lock();
        // SAFETY: ENV_MUTEX is held during restoration.
        unsafe { write(&self.key, self.original.as_deref()) };
    }
}

/// Holds the environment lock; changes made through it do not re-lock.
#[must_use = "dropping releases the environment lock"]
pub struct EnvVarLock {
    guard: ReentrantMutexGuard<'static, ()>,
}

impl EnvVarLock {
    /// Set `key` while the lock is held.
    pub fn set_var<K, V>(&self, key: K, value: V) -> EnvVarGuard
    where
        K: Into<String>,
        V: AsRef<OsStr>,
    {
        apply(key.into(), &Change::Set(value.as_ref()), &self.guard)
    }

    /// Remove `key` while the lock is held.
    pub fn remove_var<K>(&self, key: K) -> EnvVarGuard
    where
        K: Into<String>,
    {
        apply(key.into(), &Change::Remove, &self.guard)
    }
}

/// Keeps the environment lock and a set of guards alive together.
///
/// Guards are restored before the lock is released.
#[must_use = "dropping restores the guards and releases the environment lock"]
pub struct EnvScope {
    guards: Vec<EnvVarGuard>,
    _lock: EnvVarLock,
}

/// Set `key` to `value` until the guard is dropped.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let guard = env::set_var("OCHAMI_TEST_KEY", "on");
/// assert_eq!(std::env::var("OCHAMI_TEST_KEY").as_deref(), Ok("on"));
/// drop(guard);
/// ```
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    lock().set_var(key, value)
}

/// Remove `key` until the guard is dropped.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let _guard = env::remove_var("XDG_CONFIG_HOME");
/// assert!(std::env::var_os("XDG_CONFIG_HOME").is_none());
/// ```
pub fn remove_var<K>(key: K) -> EnvVarGuard
where
    K: Into<String>,
{
    lock().remove_var(key)
}

/// Acquire the global environment lock.
pub fn lock() -> EnvVarLock {
    EnvVarLock {
        guard: ENV_MUTEX.lock(),
    }
}

/// Build guards while holding the lock and keep holding it for the scope.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let _scope = env::scope_with(|lock| {
///     vec![lock.set_var("HOME", "/tmp/home"), lock.remove_var("XDG_CONFIG_HOME")]
/// });
/// ```
pub fn scope_with<F>(builder: F) -> EnvScope
where
    F: FnOnce(&EnvVarLock) -> Vec<EnvVarGuard>,
{
    let held = lock();
    let guards = builder(&held);
    EnvScope {
        guards,
        _lock: held,
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        while let Some(guard) = self.guards.pop() {
            drop(guard);
        }
    }
}

#[cfg(test)]
mod tests;
