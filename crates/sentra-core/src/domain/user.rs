use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long a freshly registered account has to confirm its email address.
/// Past this deadline the verification link is dead and the account is
/// eligible for the purge sweep.
pub const VERIFY_WINDOW_MINUTES: i64 = 30;

/// User entity - a registered account.
///
/// `verified` flips to true exactly once, when a verification token is
/// consumed before `verify_deadline`. Unverified accounts past the deadline
/// are deleted by the background purge job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub verified: bool,
    pub verify_deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new unverified user with a generated ID and a verification
    /// deadline of now + [`VERIFY_WINDOW_MINUTES`].
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            verified: false,
            verify_deadline: now + Duration::minutes(VERIFY_WINDOW_MINUTES),
            created_at: now,
        }
    }

    /// Whether the verification window has closed.
    pub fn verification_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.verify_deadline
    }
}

/// Ephemeral login credentials. Never persisted.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Keeps the plaintext password out of logs and error chains.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
