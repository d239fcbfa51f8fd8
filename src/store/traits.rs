//! The `Store` abstraction.

use super::errors::StoreResult;
use async_trait::async_trait;
use std::fmt::Debug;

/// A minimal async key-value abstraction the Index and Bayesian engines are
/// generic over.
///
/// Connection failure is fatal and surfaces as [`StoreError`](super::StoreError);
/// a missing key is not an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync + Debug {
    /// Fetch the value at `key`, or `None` if it doesn't exist.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Set `key` to `value`, overwriting any existing value.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Removing a key that doesn't exist is not an error.
    async fn del(&self, key: &str) -> StoreResult<()>;

    /// Whether `key` currently exists.
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Atomically add `delta` to the integer stored at `key` (treating a
    /// missing key as `0`), returning the new value.
    async fn incr(&self, key: &str, delta: i64) -> StoreResult<i64>;

    /// Atomically subtract `delta` from the integer stored at `key`,
    /// returning the new value. Implementations clamp at `0` rather than
    /// going negative — callers that need the underflow amount should
    /// compare against the prior value themselves.
    async fn decr(&self, key: &str, delta: i64) -> StoreResult<i64>;

    /// List every key matching a glob `pattern` (`*` wildcards only).
    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>>;
}
