use async_trait::async_trait;

/// Verification token store - maps an opaque token to the email it confirms.
///
/// Backed by a key-value cache (Redis in production, in-memory otherwise).
/// Any TTL applied by the backend is advisory only: the authoritative expiry
/// check is the user's own `verify_deadline`, so a cache entry outliving its
/// intended TTL never extends the verification window.
#[async_trait]
pub trait VerificationTokenStore: Send + Sync {
    /// Associate a token with an email address.
    async fn put(&self, token: &str, email: &str) -> Result<(), CacheError>;

    /// Look up the email a token was issued for. `None` after eviction,
    /// consumption, or if the token was never stored.
    async fn get(&self, token: &str) -> Option<String>;

    /// Drop a token, invalidating its link.
    async fn remove(&self, token: &str) -> Result<(), CacheError>;
}

/// Cache operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}
