//! Read-through freshness cache keyed by value.
//!
//! Entries are never evicted for capacity. A stale entry simply stops
//! being returned and is overwritten by the next [`TtlCache::set`] for the
//! same key. Reads share the lock; a write holds it exclusively.
//!
//! Time is measured with [`tokio::time::Instant`] so tests can drive expiry
//! with a paused clock.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

/// A stored value and the moment it was written.
#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// A concurrent map whose reads are filtered by entry age.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the value for `key` if it was stored less than `max_age` ago.
    pub async fn get(&self, key: &K, max_age: Duration) -> Option<V> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        (entry.stored_at.elapsed() < max_age).then(|| entry.value.clone())
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub async fn set(&self, key: K, value: V) {
        let entry = Entry {
            value,
            stored_at: Instant::now(),
        };
        self.entries.write().await.insert(key, entry);
    }

    /// Number of entries held, fresh or stale.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries at all.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fresh_entry_is_returned() {
        let cache = TtlCache::new();
        cache.set("iowa", 7_u32).await;
        tokio::time::advance(Duration::from_secs(60)).await;

        assert_eq!(cache.get(&"iowa", Duration::from_secs(61)).await, Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_entry_is_a_miss() {
        let cache = TtlCache::new();
        cache.set("iowa", 7_u32).await;
        tokio::time::advance(Duration::from_secs(60)).await;

        assert_eq!(cache.get(&"iowa", Duration::from_secs(59)).await, None);
        // Stale entries stay until superseded.
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn set_overwrites_and_restarts_age() {
        let cache = TtlCache::new();
        cache.set("iowa", 1_u32).await;
        tokio::time::advance(Duration::from_secs(100)).await;
        cache.set("iowa", 2_u32).await;
        tokio::time::advance(Duration::from_secs(10)).await;

        assert_eq!(cache.get(&"iowa", Duration::from_secs(30)).await, Some(2));
    }

    #[tokio::test]
    async fn missing_key_is_a_miss() {
        let cache: TtlCache<&str, u32> = TtlCache::new();
        assert!(cache.is_empty().await);
        assert_eq!(cache.get(&"kansas", Duration::from_secs(30)).await, None);
    }

    #[tokio::test]
    async fn concurrent_readers_and_writers() {
        let cache = Arc::new(TtlCache::new());
        let mut handles = Vec::new();
        for i in 0_u32..16 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                cache.set(i % 4, i).await;
                cache.get(&(i % 4), Duration::from_secs(60)).await
            }));
        }
        for handle in handles {
            let read = handle.await.ok().flatten();
            assert!(read.is_some());
        }
        assert_eq!(cache.len().await, 4);
    }
}
