/// Session token cache
///
/// Holds the most recently issued access token per identity for a bounded
/// time. Entries expire on their own; nothing here ever deletes one.
use async_trait::async_trait;
use redis_utils::SharedConnectionManager;
use resilience::{with_timeout, TimeoutConfig};
use std::fmt;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;

#[cfg(test)]
use mockall::automock;

/// Cache key for one identity's session token, rendered `{email}:{id}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub id: Uuid,
    pub email: String,
}

impl SessionKey {
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.email, self.id)
    }
}

/// Expiring key/value storage for session tokens
///
/// `get` returns `Ok(None)` for an absent or expired key. Errors are
/// reported as-is; callers decide whether a failed read counts as a miss.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionCache: Send + Sync {
    async fn get(&self, key: &SessionKey) -> Result<Option<String>>;

    /// Overwrites any existing value and resets its expiry to `ttl`
    async fn set(&self, key: &SessionKey, token: &str, ttl: Duration) -> Result<()>;
}

/// Redis-backed session cache (`GET` / `SET .. EX ..`)
#[derive(Clone)]
pub struct RedisSessionCache {
    redis: SharedConnectionManager,
    timeout: TimeoutConfig,
}

impl RedisSessionCache {
    pub fn new(redis: SharedConnectionManager, timeout: TimeoutConfig) -> Self {
        Self { redis, timeout }
    }
}

#[async_trait]
impl SessionCache for RedisSessionCache {
    async fn get(&self, key: &SessionKey) -> Result<Option<String>> {
        let redis_key = key.to_string();
        let mut conn = self.redis.lock().await.clone();

        let value: Option<String> = with_timeout("session_cache.get", self.timeout, async {
            redis::cmd("GET")
                .arg(&redis_key)
                .query_async::<_, Option<String>>(&mut conn)
                .await
        })
        .await?;

        debug!(key = %redis_key, hit = value.is_some(), "Session cache lookup");
        Ok(value)
    }

    async fn set(&self, key: &SessionKey, token: &str, ttl: Duration) -> Result<()> {
        let redis_key = key.to_string();
        // EX takes whole seconds and rejects 0
        let ttl_secs = ttl.as_secs().max(1);
        let mut conn = self.redis.lock().await.clone();

        with_timeout("session_cache.set", self.timeout, async {
            redis::cmd("SET")
                .arg(&redis_key)
                .arg(token)
                .arg("EX")
                .arg(ttl_secs)
                .query_async::<_, ()>(&mut conn)
                .await
        })
        .await?;

        debug!(key = %redis_key, ttl_secs, "Session token cached");
        Ok(())
    }
}
