//! Redis-backed [`Store`] implementation, behind the `redis-backend`
//! feature.

use super::errors::{StoreError, StoreResult};
use super::traits::Store;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::cmd;
use tokio::sync::Mutex;

const SCAN_COUNT: usize = 1024;

#[derive(Debug)]
pub struct RedisStore {
    conn: Mutex<ConnectionManager>,
}

impl RedisStore {
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(url).map_err(StoreError::from)?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(StoreError::from)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.lock().await;
        let value: Option<String> = cmd("GET").arg(key).query_async(&mut *conn).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.conn.lock().await;
        cmd("SET").arg(key).arg(value).query_async(&mut *conn).await?;
        Ok(())
    }

    async fn del(&self, key: &str) -> StoreResult<()> {
        let mut conn = self.conn.lock().await;
        cmd("DEL").arg(key).query_async(&mut *conn).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.conn.lock().await;
        let exists: bool = cmd("EXISTS").arg(key).query_async(&mut *conn).await?;
        Ok(exists)
    }

    async fn incr(&self, key: &str, delta: i64) -> StoreResult<i64> {
        let mut conn = self.conn.lock().await;
        let next: i64 = cmd("INCRBY").arg(key).arg(delta).query_async(&mut *conn).await?;
        Ok(next)
    }

    async fn decr(&self, key: &str, delta: i64) -> StoreResult<i64> {
        let mut conn = self.conn.lock().await;
        let next: i64 = cmd("DECRBY").arg(key).arg(delta).query_async(&mut *conn).await?;
        if next < 0 {
            // Clamp at zero, matching InMemoryStore.
            cmd("SET").arg(key).arg(0).query_async(&mut *conn).await?;
            return Ok(0);
        }
        Ok(next)
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.conn.lock().await;
        let mut cursor: u64 = 0;
        let mut out = Vec::new();
        loop {
            let (next_cursor, batch): (u64, Vec<String>) = cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_COUNT)
                .query_async(&mut *conn)
                .await?;
            out.extend(batch);
            if next_cursor == 0 {
                break;
            }
            cursor = next_cursor;
        }
        Ok(out)
    }
}
