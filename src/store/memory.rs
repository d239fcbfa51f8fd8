//! In-memory [`Store`] implementation — always available, default feature.

use super::errors::StoreResult;
use super::traits::Store;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// A `tokio::sync::Mutex<HashMap<String, String>>`-backed store. Useful for
/// tests and single-process deployments that don't need a shared backend.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.data.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.data.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn del(&self, key: &str) -> StoreResult<()> {
        self.data.lock().await.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.data.lock().await.contains_key(key))
    }

    async fn incr(&self, key: &str, delta: i64) -> StoreResult<i64> {
        let mut data = self.data.lock().await;
        let current = data
            .get(key)
            .map(|v| v.parse::<i64>().unwrap_or(0))
            .unwrap_or(0);
        let next = current + delta;
        data.insert(key.to_string(), next.to_string());
        Ok(next)
    }

    async fn decr(&self, key: &str, delta: i64) -> StoreResult<i64> {
        let mut data = self.data.lock().await;
        let current = data
            .get(key)
            .map(|v| v.parse::<i64>().unwrap_or(0))
            .unwrap_or(0);
        let next = (current - delta).max(0);
        data.insert(key.to_string(), next.to_string());
        Ok(next)
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let data = self.data.lock().await;
        Ok(data
            .keys()
            .filter(|key| glob_match(pattern, key))
            .cloned()
            .collect())
    }
}

/// Small multi-`*` glob matcher. No ecosystem crate in the corpus covers
/// matching `*`-globs against in-memory map keys (the `glob` crate is
/// filesystem-oriented) — this stands in for what a backend's native
/// `SCAN ... MATCH` would do, and `RedisStore` delegates that to Redis
/// directly rather than duplicating this logic.
fn glob_match(pattern: &str, text: &str) -> bool {
    let segments: Vec<&str> = pattern.split('*').collect();
    if segments.len() == 1 {
        return pattern == text;
    }

    let mut pos = 0;
    for (i, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            continue;
        }
        if i == 0 {
            if !text[pos..].starts_with(segment) {
                return false;
            }
            pos += segment.len();
        } else if i == segments.len() - 1 {
            return text[pos..].ends_with(segment) && text.len() - pos >= segment.len();
        } else {
            match text[pos..].find(segment) {
                Some(found) => pos += found + segment.len(),
                None => return false,
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = InMemoryStore::new();
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn missing_key_is_none_not_error() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("nope").await.unwrap(), None);
        assert!(!store.exists("nope").await.unwrap());
    }

    #[tokio::test]
    async fn incr_and_decr_track_integer_state() {
        let store = InMemoryStore::new();
        assert_eq!(store.incr("counter", 5).await.unwrap(), 5);
        assert_eq!(store.incr("counter", 3).await.unwrap(), 8);
        assert_eq!(store.decr("counter", 2).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn decr_clamps_at_zero() {
        let store = InMemoryStore::new();
        store.set("counter", "1").await.unwrap();
        assert_eq!(store.decr("counter", 5).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn del_removes_key() {
        let store = InMemoryStore::new();
        store.set("k", "v").await.unwrap();
        store.del("k").await.unwrap();
        assert!(!store.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn keys_matches_glob_pattern() {
        let store = InMemoryStore::new();
        store.set("rel+a+b+1", "x").await.unwrap();
        store.set("rel+a+b+2", "x").await.unwrap();
        store.set("ent+a", "x").await.unwrap();

        let mut matched = store.keys("rel+a+b+*").await.unwrap();
        matched.sort();
        assert_eq!(matched, vec!["rel+a+b+1".to_string(), "rel+a+b+2".to_string()]);
    }

    #[test]
    fn glob_match_handles_multiple_wildcards() {
        assert!(glob_match("rel+*+y+*", "rel+x+y+123"));
        assert!(!glob_match("rel+*+y+*", "rel+x+z+123"));
        assert!(glob_match("*", "anything"));
        assert!(glob_match("exact", "exact"));
        assert!(!glob_match("exact", "exactly"));
    }
}
