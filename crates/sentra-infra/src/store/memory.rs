//! In-memory verification token store - used when Redis is unavailable.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use sentra_core::ports::{CacheError, VerificationTokenStore};

struct StoredToken {
    email: String,
    expires_at: Option<Instant>,
}

/// HashMap-backed token store with async RwLock.
///
/// The TTL here is advisory cleanup only; the verification deadline on the
/// user record stays authoritative. Entries are lost on process restart,
/// which for verification links just means the user requests a resend.
pub struct InMemoryTokenStore {
    ttl: Option<Duration>,
    entries: RwLock<HashMap<String, StoredToken>>,
}

impl InMemoryTokenStore {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn is_expired(entry: &StoredToken) -> bool {
        entry
            .expires_at
            .map(|exp| Instant::now() > exp)
            .unwrap_or(false)
    }
}

impl Default for InMemoryTokenStore {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl VerificationTokenStore for InMemoryTokenStore {
    async fn put(&self, token: &str, email: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;

        entries.insert(
            token.to_string(),
            StoredToken {
                email: email.to_string(),
                expires_at: self.ttl.map(|d| Instant::now() + d),
            },
        );

        Ok(())
    }

    async fn get(&self, token: &str) -> Option<String> {
        let entries = self.entries.read().await;
        let entry = entries.get(token)?;

        if Self::is_expired(entry) {
            drop(entries);
            // Clean up the expired entry with a write lock
            let mut entries = self.entries.write().await;
            entries.remove(token);
            return None;
        }

        Some(entry.email.clone())
    }

    async fn remove(&self, token: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        entries.remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_and_get() {
        let store = InMemoryTokenStore::default();
        store.put("tok1", "ann@x.com").await.unwrap();
        assert_eq!(store.get("tok1").await, Some("ann@x.com".to_string()));
    }

    #[tokio::test]
    async fn remove_invalidates_the_token() {
        let store = InMemoryTokenStore::default();
        store.put("tok1", "ann@x.com").await.unwrap();
        store.remove("tok1").await.unwrap();
        assert_eq!(store.get("tok1").await, None);
    }

    #[tokio::test]
    async fn unknown_token_is_absent() {
        let store = InMemoryTokenStore::default();
        assert_eq!(store.get("never-stored").await, None);
    }

    #[tokio::test]
    async fn advisory_ttl_evicts_entries() {
        let store = InMemoryTokenStore::new(Some(Duration::from_millis(10)));
        store.put("tok1", "ann@x.com").await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(store.get("tok1").await, None);
    }
}
