//! In-process store client for local development and tests.

use crate::StoreClient;
use async_trait::async_trait;
use keyhash_core::{EncodedHashObject, KeyHashError, KeyHashResult};
use parking_lot::Mutex;
use redis::{ErrorKind, RedisError};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Longest TTL honoured; larger requests are clamped to it.
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

const WRONGTYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";

#[derive(Debug, Clone)]
enum StoredValue {
    Text(String),
    Hash(EncodedHashObject),
}

#[derive(Debug, Clone)]
struct Entry {
    value: StoredValue,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-memory [`StoreClient`] with Redis-like semantics.
///
/// Expired keys are dropped lazily when touched. Reading a key with the wrong
/// command fails with a `WRONGTYPE` store error, as Redis does.
#[derive(Debug, Default)]
pub struct MemoryStoreClient {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStoreClient {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining time-to-live of a key, if it has one.
    #[must_use]
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let mut entries = self.entries.lock();
        let now = Instant::now();
        live_entry(&mut entries, key, now)
            .and_then(|entry| entry.expires_at)
            .map(|at| at.saturating_duration_since(now))
    }

    /// Number of live keys.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|_, entry| !entry.is_expired(now));
        entries.len()
    }

    /// Returns true if no live keys remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Looks up a key, dropping it first if it has expired.
fn live_entry<'a>(
    entries: &'a mut HashMap<String, Entry>,
    key: &str,
    now: Instant,
) -> Option<&'a mut Entry> {
    if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
        entries.remove(key);
        debug!("Expired key '{}'", key);
    }
    entries.get_mut(key)
}

fn wrong_type() -> KeyHashError {
    KeyHashError::Store(RedisError::from((ErrorKind::TypeError, WRONGTYPE)))
}

#[async_trait]
impl StoreClient for MemoryStoreClient {
    async fn get(&self, key: &str) -> KeyHashResult<Option<String>> {
        let mut entries = self.entries.lock();
        match live_entry(&mut entries, key, Instant::now()) {
            Some(Entry {
                value: StoredValue::Text(text),
                ..
            }) => Ok(Some(text.clone())),
            Some(_) => Err(wrong_type()),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> KeyHashResult<()> {
        self.entries.lock().insert(
            key.to_string(),
            Entry {
                value: StoredValue::Text(value.to_string()),
                expires_at: None,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> KeyHashResult<u64> {
        let mut entries = self.entries.lock();
        let existed = live_entry(&mut entries, key, Instant::now()).is_some();
        entries.remove(key);
        Ok(u64::from(existed))
    }

    async fn expire(&self, key: &str, seconds: u64) -> KeyHashResult<bool> {
        let mut entries = self.entries.lock();
        let now = Instant::now();
        match live_entry(&mut entries, key, now) {
            Some(entry) => {
                entry.expires_at = Some(now + Duration::from_secs(seconds).min(MAX_TTL));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn hash_get_all(&self, key: &str) -> KeyHashResult<EncodedHashObject> {
        let mut entries = self.entries.lock();
        match live_entry(&mut entries, key, Instant::now()) {
            Some(Entry {
                value: StoredValue::Hash(fields),
                ..
            }) => Ok(fields.clone()),
            Some(_) => Err(wrong_type()),
            None => Ok(EncodedHashObject::new()),
        }
    }

    async fn hash_set_multiple(&self, key: &str, fields: &EncodedHashObject) -> KeyHashResult<()> {
        if fields.is_empty() {
            return Ok(());
        }

        let mut entries = self.entries.lock();
        match live_entry(&mut entries, key, Instant::now()) {
            Some(Entry {
                value: StoredValue::Hash(existing),
                ..
            }) => {
                existing.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            Some(_) => return Err(wrong_type()),
            None => {
                entries.insert(
                    key.to_string(),
                    Entry {
                        value: StoredValue::Hash(fields.clone()),
                        expires_at: None,
                    },
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> EncodedHashObject {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_get_set_delete() {
        let store = MemoryStoreClient::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "\"v\"").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("\"v\""));

        assert_eq!(store.delete("k").await.unwrap(), 1);
        assert_eq!(store.delete("k").await.unwrap(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_hash_merge() {
        let store = MemoryStoreClient::new();
        store
            .hash_set_multiple("h", &fields(&[("a", "1"), ("b", "2")]))
            .await
            .unwrap();
        store
            .hash_set_multiple("h", &fields(&[("b", "3"), ("c", "4")]))
            .await
            .unwrap();

        let all = store.hash_get_all("h").await.unwrap();
        assert_eq!(all, fields(&[("a", "1"), ("b", "3"), ("c", "4")]));
    }

    #[tokio::test]
    async fn test_missing_hash_is_empty() {
        let store = MemoryStoreClient::new();
        assert!(store.hash_get_all("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_hash_set_creates_nothing() {
        let store = MemoryStoreClient::new();
        store
            .hash_set_multiple("h", &EncodedHashObject::new())
            .await
            .unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_type() {
        let store = MemoryStoreClient::new();
        store.set("text", "1").await.unwrap();
        store
            .hash_set_multiple("hash", &fields(&[("a", "1")]))
            .await
            .unwrap();

        assert!(matches!(
            store.hash_get_all("text").await,
            Err(KeyHashError::Store(_))
        ));
        assert!(matches!(store.get("hash").await, Err(KeyHashError::Store(_))));
        assert!(store
            .hash_set_multiple("text", &fields(&[("a", "1")]))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_expire() {
        let store = MemoryStoreClient::new();
        assert!(!store.expire("missing", 10).await.unwrap());

        store.set("k", "1").await.unwrap();
        assert!(store.ttl("k").is_none());
        assert!(store.expire("k", 60).await.unwrap());

        let ttl = store.ttl("k").unwrap();
        assert!(ttl > Duration::from_secs(58) && ttl <= Duration::from_secs(60));

        // SET clears any TTL
        store.set("k", "2").await.unwrap();
        assert!(store.ttl("k").is_none());
    }

    #[tokio::test]
    async fn test_huge_ttl_is_clamped() {
        let store = MemoryStoreClient::new();
        store.set("k", "1").await.unwrap();
        assert!(store.expire("k", u64::MAX).await.unwrap());

        let ttl = store.ttl("k").unwrap();
        assert!(ttl > MAX_TTL - Duration::from_secs(5) && ttl <= MAX_TTL);
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_zero_ttl_expires_immediately() {
        let store = MemoryStoreClient::new();
        store.set("k", "1").await.unwrap();
        assert!(store.expire("k", 0).await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), None);
        assert_eq!(store.delete("k").await.unwrap(), 0);
    }
}
