//! Expiring key/value storage for registrations that are waiting on an OTP.
//!
//! Redis is used when configured so that pending state is shared between
//! instances and survives restarts; otherwise entries live in process memory
//! and a background sweep drops them once their retention deadline passes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use redis::aio::ConnectionManager;
use tokio::task::JoinHandle;

use crate::errors::{AppError, Result};

#[async_trait]
pub trait PendingStore: Send + Sync {
    fn backend(&self) -> &'static str;

    /// Stores `value` under `key`, replacing any previous value. The store may
    /// drop the entry once `ttl` has elapsed.
    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<()>;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Returns true only if this call removed a live entry.
    async fn delete(&self, key: &str) -> Result<bool>;
}

pub struct RedisPendingStore {
    conn: ConnectionManager,
}

impl RedisPendingStore {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;
        tracing::info!("Connected to Redis pending store");
        Ok(Self { conn })
    }
}

#[async_trait]
impl PendingStore for RedisPendingStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl.num_seconds().max(1))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value = redis::cmd("GET")
            .arg(key)
            .query_async::<_, Option<String>>(&mut conn)
            .await?;
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed = redis::cmd("DEL")
            .arg(key)
            .query_async::<_, i64>(&mut conn)
            .await?;
        Ok(removed > 0)
    }
}

struct Entry {
    value: String,
    drop_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct MemoryPendingStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryPendingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>> {
        self.entries
            .lock()
            .map_err(|_| AppError::internal("pending store lock poisoned"))
    }

    /// Removes every entry past its retention deadline and returns how many
    /// were dropped.
    pub fn purge_expired(&self) -> Result<usize> {
        let now = Utc::now();
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|_, entry| entry.drop_at > now);
        Ok(before - entries.len())
    }

    /// Periodically purges expired entries until the store is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, every: std::time::Duration) -> JoinHandle<()> {
        let store: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(store) = store.upgrade() else {
                    break;
                };
                match store.purge_expired() {
                    Ok(0) => {}
                    Ok(purged) => tracing::debug!(purged, "Swept expired pending registrations"),
                    Err(e) => tracing::warn!("Pending store sweep failed: {}", e),
                }
            }
        })
    }
}

#[async_trait]
impl PendingStore for MemoryPendingStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let entry = Entry {
            value,
            drop_at: Utc::now() + ttl,
        };
        self.lock()?.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Utc::now();
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some(entry) if entry.drop_at > now => return Ok(Some(entry.value.clone())),
            Some(_) => {}
            None => return Ok(None),
        }
        // Past its retention deadline.
        entries.remove(key);
        Ok(None)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let now = Utc::now();
        Ok(self
            .lock()?
            .remove(key)
            .map_or(false, |entry| entry.drop_at > now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryPendingStore::new();
        store
            .put("otp:a@x.com", "123456".to_string(), Duration::minutes(5))
            .await
            .unwrap();

        assert_eq!(
            store.get("otp:a@x.com").await.unwrap().as_deref(),
            Some("123456")
        );
        assert!(store.delete("otp:a@x.com").await.unwrap());
        assert!(!store.delete("otp:a@x.com").await.unwrap());
        assert!(store.get("otp:a@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryPendingStore::new();
        store.put("k", "first".to_string(), Duration::minutes(1)).await.unwrap();
        store.put("k", "second".to_string(), Duration::minutes(1)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_expired_entries_are_invisible_and_purged() {
        let store = MemoryPendingStore::new();
        store.put("old", "v".to_string(), Duration::zero()).await.unwrap();
        store.put("live", "v".to_string(), Duration::minutes(1)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        assert!(!store.delete("old").await.unwrap());

        store.put("old", "v".to_string(), Duration::zero()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        assert_eq!(store.purge_expired().unwrap(), 1);
        assert!(store.get("old").await.unwrap().is_none());
        assert!(store.get("live").await.unwrap().is_some());
    }
}
