//! In-process TTL cache.
//!
//! A string-keyed map whose entries carry an absolute expiry timestamp.
//! Expired entries are invisible to `get` and removed lazily.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use super::clock::{Clock, SystemClock};

/// Key-value cache with per-entry expiry.
pub trait TtlCache<V>: Send + Sync {
    /// Value for `key` while it is unexpired.
    fn get(&self, key: &str) -> Option<V>;

    /// Insert or replace `key`, expiring `ttl` from now.
    fn set(&self, key: String, value: V, ttl: Duration);

    /// Remove `key`. Returns whether an entry was present.
    fn delete(&self, key: &str) -> bool;

    /// Remove every entry whose key starts with `prefix`. Returns the count removed.
    fn delete_by_prefix(&self, prefix: &str) -> usize;
}

/// Cached value with its expiry.
#[derive(Debug)]
struct CachedValue<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

impl<V> CachedValue<V> {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// `HashMap`-backed TTL cache guarded by an `RwLock`.
#[derive(Debug)]
pub struct MemoryCache<V> {
    entries: RwLock<HashMap<String, CachedValue<V>>>,
    clock: Arc<dyn Clock>,
}

impl<V> MemoryCache<V> {
    /// Create a cache driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a cache driven by the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { entries: RwLock::new(HashMap::new()), clock }
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop expired entries.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, cached| !cached.is_expired(now));
        before - entries.len()
    }

    fn expiry_from(&self, ttl: Duration) -> DateTime<Utc> {
        let now = self.clock.now();
        TimeDelta::from_std(ttl)
            .ok()
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync> TtlCache<V> for MemoryCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            match entries.get(key) {
                Some(cached) if !cached.is_expired(now) => return Some(cached.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if entries.get(key).is_some_and(|cached| cached.is_expired(now)) {
            entries.remove(key);
            tracing::debug!("memory cache entry expired: {}", key);
        }
        None
    }

    fn set(&self, key: String, value: V, ttl: Duration) {
        let expires_at = self.expiry_from(ttl);
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, CachedValue { value, expires_at });
    }

    fn delete(&self, key: &str) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key).is_some()
    }

    fn delete_by_prefix(&self, prefix: &str) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        before - entries.len()
    }
}
