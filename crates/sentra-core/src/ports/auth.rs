//! Token issuance/verification and password hashing ports.

use uuid::Uuid;

use crate::domain::User;

/// Claims carried by an access token: full subject identity plus roles.
#[derive(Debug, Clone)]
pub struct AccessClaims {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
    pub exp: i64,
}

/// Claims carried by a refresh token: the subject id only.
#[derive(Debug, Clone)]
pub struct RefreshClaims {
    pub user_id: Uuid,
    pub exp: i64,
}

/// Signed-token service. Tokens are self-contained: validity is determined
/// by signature, issuer and expiry alone - there is no revocation list.
pub trait TokenService: Send + Sync {
    /// Mint a short-lived access token for the user.
    fn issue_access_token(&self, user: &User) -> Result<String, AuthError>;

    /// Mint a long-lived refresh token for the user.
    fn issue_refresh_token(&self, user: &User) -> Result<String, AuthError>;

    /// Check signature, issuer and expiry of an access token.
    fn verify_access_token(&self, token: &str) -> Result<AccessClaims, AuthError>;

    /// Check signature, issuer and expiry of a refresh token.
    fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, AuthError>;

    /// Access-token lifetime, for `expires_in` response fields.
    fn access_ttl_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication backend errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Signing failed: {0}")]
    SigningError(String),

    #[error("Hashing error: {0}")]
    HashingError(String),
}
