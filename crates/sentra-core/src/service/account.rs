//! Account service - registration, credential checks and the
//! email-verification token lifecycle.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{AuthFailure, Credentials, LoginCheck, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, UserRepository, VerificationTokenStore};
use crate::validation::validate_credentials;

const MSG_EMAIL_TAKEN: &str = "Email already exists";

/// Orchestrates the user store, password hashing and the verification token
/// store. All expected business outcomes are returned as values; only
/// infrastructure faults become errors.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn VerificationTokenStore>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn VerificationTokenStore>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Register a new account. Returns the list of validation violations;
    /// an empty list means the user was persisted (unverified, with a
    /// 30-minute confirmation deadline). Nothing is written when validation
    /// fails.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Vec<String>, DomainError> {
        let mut violations = validate_credentials(password, email);

        if self.users.exists_by_email(email).await? {
            violations.push(MSG_EMAIL_TAKEN.to_string());
        }
        if !violations.is_empty() {
            return Ok(violations);
        }

        let password_hash = self.passwords.hash(password)?;
        let user = User::new(name.to_string(), email.to_string(), password_hash);

        match self.users.save(user).await {
            Ok(saved) => {
                tracing::info!(user_id = %saved.id, "User registered");
                Ok(Vec::new())
            }
            // Lost the uniqueness race to a concurrent registration with the
            // same email. Same violation as the pre-check, not a crash.
            Err(RepoError::Constraint(_)) => Ok(vec![MSG_EMAIL_TAKEN.to_string()]),
            Err(e) => Err(e.into()),
        }
    }

    /// Check login credentials. The check order is fixed:
    /// existence, then verification, then password.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginCheck, DomainError> {
        let Some(user) = self.users.find_by_email(&credentials.email).await? else {
            return Ok(LoginCheck::Rejected(AuthFailure::UserNotRegistered));
        };

        if !user.verified {
            return Ok(LoginCheck::Rejected(AuthFailure::EmailNotVerified));
        }

        if !self
            .passwords
            .verify(&credentials.password, &user.password_hash)?
        {
            return Ok(LoginCheck::Rejected(AuthFailure::InvalidCredentials));
        }

        Ok(LoginCheck::Verified(user))
    }

    /// Issue a fresh verification token for the given email. `None` if no
    /// such user exists. The user's existing deadline is left untouched.
    pub async fn create_verification_token(
        &self,
        email: &str,
    ) -> Result<Option<String>, DomainError> {
        if self.users.find_by_email(email).await?.is_none() {
            return Ok(None);
        }

        let token = Uuid::new_v4().simple().to_string();
        self.tokens.put(&token, email).await?;
        Ok(Some(token))
    }

    /// Consume a verification token. Returns true exactly when the token
    /// resolves to a user whose deadline has not passed; the user is then
    /// marked verified and the token dropped (single use). Unknown tokens
    /// and expired windows fail closed without mutating anything.
    pub async fn verify_email_token(&self, token: &str) -> Result<bool, DomainError> {
        let Some(email) = self.tokens.get(token).await else {
            return Ok(false);
        };
        let Some(mut user) = self.users.find_by_email(&email).await? else {
            return Ok(false);
        };

        if user.verification_expired_at(Utc::now()) {
            return Ok(false);
        }

        if !user.verified {
            user.verified = true;
            self.users.save(user).await?;
        }

        // Best effort: the account is already verified, a stale cache entry
        // only risks a harmless re-confirmation.
        if let Err(e) = self.tokens.remove(token).await {
            tracing::warn!(error = %e, "Failed to drop consumed verification token");
        }

        Ok(true)
    }

    /// Delete every unverified user whose deadline has passed. A failed
    /// deletion is logged and skipped so one bad row never aborts the sweep.
    /// Returns the number of users purged.
    pub async fn purge_unverified_expired(&self) -> Result<u64, DomainError> {
        let now = Utc::now();
        let mut purged = 0;

        for user in self.users.find_unverified().await? {
            if !user.verification_expired_at(now) {
                continue;
            }
            match self.users.delete(user.id).await {
                Ok(()) => purged += 1,
                Err(e) => {
                    tracing::warn!(user_id = %user.id, error = %e, "Failed to purge unverified user");
                }
            }
        }

        if purged > 0 {
            tracing::info!(purged, "Removed unverified accounts past their deadline");
        }
        Ok(purged)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.find_by_id(id).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self.users.find_by_email(email).await?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::service::fakes::{FakePasswords, InMemoryTokens, InMemoryUsers};
    use crate::validation::MSG_NO_DIGIT;

    fn service(users: Arc<InMemoryUsers>, tokens: Arc<InMemoryTokens>) -> AccountService {
        AccountService::new(users, Arc::new(FakePasswords), tokens)
    }

    fn stored_user(email: &str, verified: bool) -> User {
        let mut user = User::new(
            "Ann".to_string(),
            email.to_string(),
            FakePasswords.hash("Secret1!").unwrap(),
        );
        user.verified = verified;
        user
    }

    #[tokio::test]
    async fn register_persists_unverified_user() {
        let users = Arc::new(InMemoryUsers::default());
        let svc = service(users.clone(), Arc::new(InMemoryTokens::default()));

        let violations = svc.register("Ann", "ann@x.com", "Secret1!").await.unwrap();

        assert!(violations.is_empty());
        let saved = users.find_by_email("ann@x.com").await.unwrap().unwrap();
        assert!(!saved.verified);
        assert_ne!(saved.password_hash, "Secret1!");
    }

    #[tokio::test]
    async fn register_reports_violations_without_writing() {
        let users = Arc::new(InMemoryUsers::default());
        let svc = service(users.clone(), Arc::new(InMemoryTokens::default()));

        let violations = svc.register("Ann", "ann@x.com", "Secret!!").await.unwrap();

        assert!(violations.contains(&MSG_NO_DIGIT.to_string()));
        assert!(users.find_by_email("ann@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let users = Arc::new(InMemoryUsers::default());
        let svc = service(users.clone(), Arc::new(InMemoryTokens::default()));

        assert!(
            svc.register("Ann", "ann@x.com", "Secret1!")
                .await
                .unwrap()
                .is_empty()
        );
        let second = svc.register("Other", "ann@x.com", "Secret1!").await.unwrap();

        assert!(second.contains(&MSG_EMAIL_TAKEN.to_string()));
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn login_distinguishes_every_rejection() {
        let users = Arc::new(InMemoryUsers::default());
        users.insert(stored_user("unverified@x.com", false));
        users.insert(stored_user("ann@x.com", true));
        let svc = service(users, Arc::new(InMemoryTokens::default()));

        let unknown = svc
            .login(&Credentials::new("ghost@x.com", "Secret1!"))
            .await
            .unwrap();
        assert!(matches!(
            unknown,
            LoginCheck::Rejected(AuthFailure::UserNotRegistered)
        ));

        // Verification is checked before the password: even the right
        // password is rejected on an unconfirmed account.
        let unverified = svc
            .login(&Credentials::new("unverified@x.com", "Secret1!"))
            .await
            .unwrap();
        assert!(matches!(
            unverified,
            LoginCheck::Rejected(AuthFailure::EmailNotVerified)
        ));

        let wrong_password = svc
            .login(&Credentials::new("ann@x.com", "WrongPass1!"))
            .await
            .unwrap();
        assert!(matches!(
            wrong_password,
            LoginCheck::Rejected(AuthFailure::InvalidCredentials)
        ));

        let ok = svc
            .login(&Credentials::new("ann@x.com", "Secret1!"))
            .await
            .unwrap();
        assert!(matches!(ok, LoginCheck::Verified(_)));
    }

    #[tokio::test]
    async fn verification_token_resolves_only_for_existing_user() {
        let users = Arc::new(InMemoryUsers::default());
        users.insert(stored_user("ann@x.com", false));
        let tokens = Arc::new(InMemoryTokens::default());
        let svc = service(users, tokens.clone());

        assert!(
            svc.create_verification_token("ghost@x.com")
                .await
                .unwrap()
                .is_none()
        );

        let token = svc
            .create_verification_token("ann@x.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tokens.get(&token).await, Some("ann@x.com".to_string()));
    }

    #[tokio::test]
    async fn verify_flips_verified_once_and_consumes_the_token() {
        let users = Arc::new(InMemoryUsers::default());
        users.insert(stored_user("ann@x.com", false));
        let tokens = Arc::new(InMemoryTokens::default());
        let svc = service(users.clone(), tokens.clone());

        let token = svc
            .create_verification_token("ann@x.com")
            .await
            .unwrap()
            .unwrap();

        assert!(svc.verify_email_token(&token).await.unwrap());
        assert!(users.find_by_email("ann@x.com").await.unwrap().unwrap().verified);

        // Single use: the consumed token no longer resolves.
        assert!(!svc.verify_email_token(&token).await.unwrap());
    }

    #[tokio::test]
    async fn verify_fails_closed_after_the_deadline() {
        let users = Arc::new(InMemoryUsers::default());
        let mut expired = stored_user("late@x.com", false);
        expired.verify_deadline = Utc::now() - Duration::minutes(1);
        users.insert(expired);
        let tokens = Arc::new(InMemoryTokens::default());
        let svc = service(users.clone(), tokens.clone());

        let token = svc
            .create_verification_token("late@x.com")
            .await
            .unwrap()
            .unwrap();

        assert!(!svc.verify_email_token(&token).await.unwrap());
        let user = users.find_by_email("late@x.com").await.unwrap().unwrap();
        assert!(!user.verified);
        // The cache entry may outlive the deadline; the deadline still wins.
        assert_eq!(tokens.get(&token).await, Some("late@x.com".to_string()));
    }

    #[tokio::test]
    async fn verify_with_unknown_token_fails_closed() {
        let svc = service(
            Arc::new(InMemoryUsers::default()),
            Arc::new(InMemoryTokens::default()),
        );

        assert!(!svc.verify_email_token("no-such-token").await.unwrap());
    }

    #[tokio::test]
    async fn purge_deletes_only_expired_unverified_users() {
        let users = Arc::new(InMemoryUsers::default());
        let mut fresh = stored_user("fresh@x.com", false);
        fresh.verify_deadline = Utc::now() + Duration::minutes(10);
        users.insert(fresh);
        for email in ["late1@x.com", "late2@x.com"] {
            let mut stale = stored_user(email, false);
            stale.verify_deadline = Utc::now() - Duration::minutes(5);
            users.insert(stale);
        }
        let svc = service(users.clone(), Arc::new(InMemoryTokens::default()));

        let purged = svc.purge_unverified_expired().await.unwrap();

        assert_eq!(purged, 2);
        assert!(users.find_by_email("fresh@x.com").await.unwrap().is_some());
        assert!(users.find_by_email("late1@x.com").await.unwrap().is_none());
        assert!(users.find_by_email("late2@x.com").await.unwrap().is_none());
    }
}
