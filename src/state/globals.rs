//! Process-wide key/value store shared by every module.
//!
//! # Design Decisions
//! - Values are untyped JSON; modules agree on shapes among themselves
//! - Last write wins, no expiry, nothing persisted past process exit
//! - Sharded concurrent map, so readers never block on unrelated keys

use dashmap::DashMap;
use serde_json::Value;

/// Global state entries, keyed by string.
#[derive(Debug, Default)]
pub struct GlobalStore {
    entries: DashMap<String, Value>,
}

impl GlobalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, silently replacing any previous value.
    /// Always returns `true`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let key = key.into();
        tracing::trace!(key = %key, "Global state updated");
        self.entries.insert(key, value.into());
        true
    }

    /// Look up `key`. `None` means the key was never set; a stored
    /// `null`, `false` or `""` comes back as `Some`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
