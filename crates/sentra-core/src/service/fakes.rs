//! Hand-written port fakes for service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::User;
use crate::error::RepoError;
use crate::ports::{
    AccessClaims, AuthError, CacheError, Mailer, MailerError, PasswordService, RefreshClaims,
    TokenService, UserRepository, VerificationTokenStore,
};

/// HashMap-backed user store with the same unique-email semantics as the
/// real database.
#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUsers {
    pub fn insert(&self, user: User) {
        self.rows.lock().unwrap().insert(user.id, user);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        UserRepository::find_by_email(self, email).await
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
        Ok(UserRepository::find_by_email(self, email).await?.is_some())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let taken = rows
            .values()
            .any(|u| u.email == user.email && u.id != user.id);
        if taken {
            return Err(RepoError::Constraint("users.email".to_string()));
        }
        rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.rows.lock().unwrap().remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }

    async fn find_unverified(&self) -> Result<Vec<User>, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|u| !u.verified)
            .cloned()
            .collect())
    }
}

/// Deterministic stand-in for the Argon2 service.
pub struct FakePasswords;

impl PasswordService for FakePasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("fake${password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("fake${password}"))
    }
}

/// Token-to-email map without any TTL behavior.
#[derive(Default)]
pub struct InMemoryTokens {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryTokens {
    pub async fn get(&self, token: &str) -> Option<String> {
        self.entries.lock().unwrap().get(token).cloned()
    }
}

#[async_trait]
impl VerificationTokenStore for InMemoryTokens {
    async fn put(&self, token: &str, email: &str) -> Result<(), CacheError> {
        self.entries
            .lock()
            .unwrap()
            .insert(token.to_string(), email.to_string());
        Ok(())
    }

    async fn get(&self, token: &str) -> Option<String> {
        InMemoryTokens::get(self, token).await
    }

    async fn remove(&self, token: &str) -> Result<(), CacheError> {
        self.entries.lock().unwrap().remove(token);
        Ok(())
    }
}

/// Transparent token service: tokens are readable strings so tests can
/// assert on what was minted without decoding anything.
#[derive(Default)]
pub struct FakeTokenService;

impl FakeTokenService {
    pub fn refresh_token_for(user_id: Uuid) -> String {
        format!("refresh:{user_id}")
    }
}

impl TokenService for FakeTokenService {
    fn issue_access_token(&self, user: &User) -> Result<String, AuthError> {
        Ok(format!("access:{}:{}", user.id, user.email))
    }

    fn issue_refresh_token(&self, user: &User) -> Result<String, AuthError> {
        Ok(Self::refresh_token_for(user.id))
    }

    fn verify_access_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let mut parts = token.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("access"), Some(id), Some(email)) => {
                let user_id = Uuid::parse_str(id)
                    .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
                Ok(AccessClaims {
                    user_id,
                    name: String::new(),
                    email: email.to_string(),
                    roles: vec!["user".to_string()],
                    exp: 0,
                })
            }
            _ => Err(AuthError::InvalidToken("not an access token".to_string())),
        }
    }

    fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        match token.strip_prefix("refresh:") {
            Some(id) => {
                let user_id = Uuid::parse_str(id)
                    .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
                Ok(RefreshClaims { user_id, exp: 0 })
            }
            None => Err(AuthError::InvalidToken("not a refresh token".to_string())),
        }
    }

    fn access_ttl_seconds(&self) -> i64 {
        3600
    }
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub name: String,
    pub link: String,
}

/// Mailer that records every message instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    outbox: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SentMail> {
        self.outbox.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_verification(
        &self,
        to: &str,
        name: &str,
        link: &str,
    ) -> Result<(), MailerError> {
        self.outbox.lock().unwrap().push(SentMail {
            to: to.to_string(),
            name: name.to_string(),
            link: link.to_string(),
        });
        Ok(())
    }
}

/// Mailer whose transport is permanently down.
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send_verification(
        &self,
        _to: &str,
        _name: &str,
        _link: &str,
    ) -> Result<(), MailerError> {
        Err(MailerError::Transport("connection refused".to_string()))
    }
}
