//! Domain-level error types.
//!
//! Business outcomes (a rejected login, an expired verification link) are NOT
//! errors - they are modeled as tagged unions in [`crate::domain`]. The types
//! here cover infrastructure faults only.

use thiserror::Error;
use uuid::Uuid;

use crate::ports::{AuthError, CacheError, MailerError};

/// Domain errors - infrastructure faults surfaced to the orchestrator.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("User store error: {0}")]
    Store(#[from] RepoError),

    #[error("Token cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Auth backend error: {0}")]
    Auth(#[from] AuthError),

    #[error("Mail transport error: {0}")]
    Mail(#[from] MailerError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
