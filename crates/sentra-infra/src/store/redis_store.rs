//! Redis-backed verification token store.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use sentra_core::ports::{CacheError, VerificationTokenStore};

/// Namespace for verification entries, so the cache can be shared.
const KEY_PREFIX: &str = "verify:";

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Advisory entry TTL. Expiry is still enforced against the user's own
    /// verification deadline; this only keeps dead tokens from piling up.
    pub token_ttl: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            token_ttl: Duration::from_secs(30 * 60),
        }
    }
}

impl RedisConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            token_ttl: Duration::from_secs(
                std::env::var("VERIFY_TOKEN_TTL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30 * 60),
            ),
        }
    }
}

/// Redis-backed token store.
///
/// Uses a connection manager for automatic reconnection and pooling.
pub struct RedisTokenStore {
    conn: ConnectionManager,
    config: RedisConfig,
}

impl RedisTokenStore {
    pub async fn new(config: RedisConfig) -> Result<Self, CacheError> {
        let client =
            Client::open(config.url.as_str()).map_err(|e| CacheError::Connection(e.to_string()))?;

        // Use timeout to prevent hanging if Redis is unreachable
        let conn_manager_fut = ConnectionManager::new(client);
        let conn = tokio::time::timeout(config.connect_timeout, conn_manager_fut)
            .await
            .map_err(|_| CacheError::Connection("Connection timed out".to_string()))?
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        tracing::info!(url = %config.url, "Connected to Redis token store");

        Ok(Self { conn, config })
    }

    /// Create from environment configuration.
    pub async fn from_env() -> Result<Self, CacheError> {
        Self::new(RedisConfig::from_env()).await
    }

    fn key(token: &str) -> String {
        format!("{KEY_PREFIX}{token}")
    }
}

#[async_trait]
impl VerificationTokenStore for RedisTokenStore {
    async fn put(&self, token: &str, email: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();

        conn.set_ex::<_, _, ()>(Self::key(token), email, self.config.token_ttl.as_secs())
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))?;

        Ok(())
    }

    async fn get(&self, token: &str) -> Option<String> {
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(Self::key(token)).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Redis GET failed for verification token");
                None
            }
        }
    }

    async fn remove(&self, token: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(Self::key(token))
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn get_test_store() -> Option<RedisTokenStore> {
        let config = RedisConfig {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6389".to_string()),
            connect_timeout: Duration::from_secs(1),
            token_ttl: Duration::from_secs(60),
        };

        RedisTokenStore::new(config).await.ok()
    }

    #[tokio::test]
    async fn put_get_remove_cycle() {
        let store = match get_test_store().await {
            Some(s) => s,
            None => {
                tracing::warn!("Redis not available, skipping test");
                return;
            }
        };

        store.put("test_token", "ann@x.com").await.unwrap();
        assert_eq!(store.get("test_token").await, Some("ann@x.com".to_string()));

        store.remove("test_token").await.unwrap();
        assert_eq!(store.get("test_token").await, None);
    }
}
