//! # Sentra Infrastructure
//!
//! Concrete implementations of the ports defined in `sentra-core`:
//! database, token cache, JWT/Argon2 auth and SMTP integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory adapters only
//! - `postgres` - PostgreSQL user store via SeaORM
//! - `auth` - JWT + Argon2 authentication
//! - `redis` - Redis-backed verification token store
//! - `mailer` - SMTP delivery via lettre

pub mod database;
pub mod store;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "mailer")]
pub mod mailer;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, InMemoryUserRepository};
pub use store::InMemoryTokenStore;

#[cfg(feature = "postgres")]
pub use database::{PostgresUserRepository, connect};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "redis")]
pub use store::{RedisConfig, RedisTokenStore};

#[cfg(feature = "mailer")]
pub use mailer::{SmtpConfig, SmtpMailer};
