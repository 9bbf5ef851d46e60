//! Auth orchestrator - composes the account service, token service and mail
//! transport into the user-facing register/login/refresh/verify operations.

use std::sync::Arc;

use crate::domain::{
    AuthFailure, AuthOutcome, Credentials, LoginCheck, VerificationFailure, VerificationOutcome,
};
use crate::error::DomainError;
use crate::ports::{Mailer, TokenService};
use crate::service::AccountService;

pub struct AuthService {
    accounts: Arc<AccountService>,
    tokens: Arc<dyn TokenService>,
    mailer: Arc<dyn Mailer>,
    /// Base URL prepended to verification links, e.g. `https://api.example.com`.
    public_url: String,
}

impl AuthService {
    pub fn new(
        accounts: Arc<AccountService>,
        tokens: Arc<dyn TokenService>,
        mailer: Arc<dyn Mailer>,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            accounts,
            tokens,
            mailer,
            public_url: public_url.into(),
        }
    }

    fn verification_link(&self, token: &str) -> String {
        format!("{}/api/auth/verify-email/{}", self.public_url, token)
    }

    /// Register a new account and dispatch the verification mail.
    ///
    /// The mail is sent on a detached task: the caller's response never waits
    /// on SMTP, and a send failure does not roll back the created account.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Vec<String>, DomainError> {
        let violations = self.accounts.register(name, email, password).await?;
        if !violations.is_empty() {
            return Ok(violations);
        }

        if let Some(token) = self.accounts.create_verification_token(email).await? {
            let link = self.verification_link(&token);
            let mailer = Arc::clone(&self.mailer);
            let to = email.to_string();
            let name = name.to_string();
            tokio::spawn(async move {
                if let Err(e) = mailer.send_verification(&to, &name, &link).await {
                    tracing::error!(error = %e, "Verification mail was not delivered");
                }
            });
        }

        Ok(Vec::new())
    }

    /// Check credentials and mint an access/refresh token pair.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthOutcome, DomainError> {
        match self.accounts.login(credentials).await? {
            LoginCheck::Rejected(reason) => Ok(AuthOutcome::Rejected(reason)),
            LoginCheck::Verified(user) => {
                let access_token = self.tokens.issue_access_token(&user)?;
                let refresh_token = self.tokens.issue_refresh_token(&user)?;
                Ok(AuthOutcome::Authenticated {
                    access_token,
                    refresh_token,
                })
            }
        }
    }

    /// Exchange a refresh token for a fresh access token. The refresh token
    /// itself is returned unchanged - no rotation.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthOutcome, DomainError> {
        let claims = match self.tokens.verify_refresh_token(refresh_token) {
            Ok(claims) => claims,
            Err(_) => return Ok(AuthOutcome::Rejected(AuthFailure::RefreshTokenInvalid)),
        };

        let Some(user) = self.accounts.find_by_id(claims.user_id).await? else {
            // Valid signature but the subject is gone (purged or deleted).
            return Ok(AuthOutcome::Rejected(AuthFailure::UserNotRegistered));
        };

        let access_token = self.tokens.issue_access_token(&user)?;
        Ok(AuthOutcome::Authenticated {
            access_token,
            refresh_token: refresh_token.to_string(),
        })
    }

    /// Consume an email-verification token.
    pub async fn confirm_email(&self, token: &str) -> Result<bool, DomainError> {
        self.accounts.verify_email_token(token).await
    }

    /// Re-issue a verification token and send a new mail. Precedence of
    /// rejections: unknown user, then already verified, then expired window,
    /// then transport failure. Unlike registration, the send is awaited so
    /// the caller learns about transport failures.
    pub async fn resend_verification(
        &self,
        email: &str,
    ) -> Result<VerificationOutcome, DomainError> {
        let Some(user) = self.accounts.find_by_email(email).await? else {
            return Ok(VerificationOutcome::Rejected(
                VerificationFailure::UserNotFound,
            ));
        };
        if user.verified {
            return Ok(VerificationOutcome::Rejected(
                VerificationFailure::AlreadyVerified,
            ));
        }
        if user.verification_expired_at(chrono::Utc::now()) {
            return Ok(VerificationOutcome::Rejected(
                VerificationFailure::WindowExpired,
            ));
        }

        let Some(token) = self.accounts.create_verification_token(email).await? else {
            return Ok(VerificationOutcome::Rejected(
                VerificationFailure::UserNotFound,
            ));
        };
        let link = self.verification_link(&token);

        match self.mailer.send_verification(email, &user.name, &link).await {
            Ok(()) => Ok(VerificationOutcome::Sent),
            Err(e) => {
                tracing::error!(error = %e, "Verification mail resend failed");
                Ok(VerificationOutcome::Rejected(
                    VerificationFailure::EmailNotSent,
                ))
            }
        }
    }
}
