//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod mailer;
mod repository;
mod verification;

pub use auth::{AccessClaims, AuthError, PasswordService, RefreshClaims, TokenService};
pub use mailer::{Mailer, MailerError};
pub use repository::UserRepository;
pub use verification::{CacheError, VerificationTokenStore};
