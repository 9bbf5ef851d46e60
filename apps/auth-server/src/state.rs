//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use sentra_core::domain::VERIFY_WINDOW_MINUTES;
use sentra_core::ports::{Mailer, TokenService, UserRepository, VerificationTokenStore};
use sentra_core::service::{AccountService, AuthService};
use sentra_infra::auth::{Argon2PasswordService, JwtTokenService};
use sentra_infra::database::InMemoryUserRepository;
use sentra_infra::mailer::{SmtpConfig, SmtpMailer};
use sentra_infra::store::InMemoryTokenStore;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub auth: Arc<AuthService>,
    pub tokens: Arc<dyn TokenService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let users = Self::user_repository(config).await;
        let token_store = Self::token_store(config).await;
        let mailer = Self::mailer();

        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());
        let accounts = Arc::new(AccountService::new(
            users,
            Arc::new(Argon2PasswordService::new()),
            token_store,
        ));
        let auth = Arc::new(AuthService::new(
            accounts.clone(),
            tokens.clone(),
            mailer,
            config.public_url.clone(),
        ));

        tracing::info!("Application state initialized");

        Self {
            accounts,
            auth,
            tokens,
        }
    }

    #[cfg(feature = "postgres")]
    async fn user_repository(config: &AppConfig) -> Arc<dyn UserRepository> {
        use sentra_infra::database::PostgresUserRepository;

        if let Some(db_config) = &config.database {
            match sentra_infra::database::connect(db_config).await {
                Ok(conn) => return Arc::new(PostgresUserRepository::new(conn)),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }
        Arc::new(InMemoryUserRepository::new())
    }

    #[cfg(not(feature = "postgres"))]
    async fn user_repository(_config: &AppConfig) -> Arc<dyn UserRepository> {
        tracing::info!("Running without postgres feature - using in-memory repository");
        Arc::new(InMemoryUserRepository::new())
    }

    #[cfg(feature = "redis")]
    async fn token_store(config: &AppConfig) -> Arc<dyn VerificationTokenStore> {
        use sentra_infra::store::RedisTokenStore;

        if config.redis_url.is_some() {
            match RedisTokenStore::from_env().await {
                Ok(store) => return Arc::new(store),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to Redis: {}. Using in-memory token store.",
                        e
                    );
                }
            }
        }
        Arc::new(Self::memory_token_store())
    }

    #[cfg(not(feature = "redis"))]
    async fn token_store(_config: &AppConfig) -> Arc<dyn VerificationTokenStore> {
        Arc::new(Self::memory_token_store())
    }

    fn memory_token_store() -> InMemoryTokenStore {
        // Advisory TTL matching the verification window; the user's own
        // deadline remains the authoritative expiry.
        InMemoryTokenStore::new(Some(Duration::from_secs(
            VERIFY_WINDOW_MINUTES as u64 * 60,
        )))
    }

    fn mailer() -> Arc<dyn Mailer> {
        match SmtpMailer::new(SmtpConfig::from_env()) {
            Ok(mailer) => Arc::new(mailer),
            Err(e) => {
                tracing::error!(error = %e, "SMTP setup failed, mails will be skipped");
                Arc::new(SmtpMailer::disabled())
            }
        }
    }

    /// Fully in-memory state for tests.
    #[cfg(test)]
    pub fn in_memory(public_url: &str) -> Self {
        let tokens: Arc<dyn TokenService> =
            Arc::new(JwtTokenService::new(sentra_infra::auth::JwtConfig {
                secret: "test-secret-key".to_string(),
                ..Default::default()
            }));
        let accounts = Arc::new(AccountService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(Argon2PasswordService::new()),
            Arc::new(Self::memory_token_store()),
        ));
        let auth = Arc::new(AuthService::new(
            accounts.clone(),
            tokens.clone(),
            Arc::new(SmtpMailer::disabled()),
            public_url,
        ));

        Self {
            accounts,
            auth,
            tokens,
        }
    }
}
