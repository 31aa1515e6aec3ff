//! Process-wide read-through cache in front of event-by-id lookups.
//!
//! Created once at startup and held in `AppState`; nothing is persisted.
//! A fresh entry lives for `ttl`. Every hit pushes the expiry out to
//! `extended_ttl` from now, so hot events stay cached. Expired entries are
//! ignored on read and physically removed by [`TtlCache::sweep`], which the
//! background sweeper calls on a fixed interval.
//!
//! Invalidation bumps an epoch. A reader that loaded a value from the
//! repository fills the cache with [`TtlCache::insert_if_unchanged`], passing
//! the epoch it saw before the load, so a value read before an invalidate
//! can never land after it.

use crate::config::CacheConfig;
use crate::domain::models::event::EventDetails;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

struct Inner<V> {
    entries: HashMap<String, Entry<V>>,
    epoch: u64,
}

pub struct TtlCache<V> {
    inner: RwLock<Inner<V>>,
    ttl: Duration,
    extended_ttl: Duration,
}

pub type EventCache = TtlCache<EventDetails>;

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, extended_ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(Inner { entries: HashMap::new(), epoch: 0 }),
            ttl,
            extended_ttl,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.ttl, config.extended_ttl)
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut inner = self.inner.write().await;

        match inner.entries.get_mut(key) {
            Some(entry) if entry.expires_at > now => {
                entry.expires_at = now + self.extended_ttl;
                Some(entry.value.clone())
            }
            Some(_) => {
                inner.entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub async fn insert(&self, key: String, value: V) {
        let expires_at = Instant::now() + self.ttl;
        self.inner.write().await.entries.insert(key, Entry { value, expires_at });
    }

    /// Current invalidation epoch. Read it before loading the value to cache.
    pub async fn epoch(&self) -> u64 {
        self.inner.read().await.epoch
    }

    /// Inserts only if no invalidation happened since `epoch` was read.
    /// Returns whether the value was stored.
    pub async fn insert_if_unchanged(&self, key: String, value: V, epoch: u64) -> bool {
        let mut inner = self.inner.write().await;
        if inner.epoch != epoch {
            return false;
        }
        let expires_at = Instant::now() + self.ttl;
        inner.entries.insert(key, Entry { value, expires_at });
        true
    }

    pub async fn invalidate(&self, key: &str) -> bool {
        let mut inner = self.inner.write().await;
        inner.epoch += 1;
        inner.entries.remove(key).is_some()
    }

    /// Drops every expired entry and returns how many were removed.
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut inner = self.inner.write().await;
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| entry.expires_at > now);
        before - inner.entries.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }
}
