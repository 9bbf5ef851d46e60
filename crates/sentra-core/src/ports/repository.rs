use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::User;
use crate::error::RepoError;

/// User store. The backing database enforces email uniqueness; a concurrent
/// duplicate insert surfaces as [`RepoError::Constraint`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Check whether any user has this email.
    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError>;

    /// Save a user (create or update).
    async fn save(&self, user: User) -> Result<User, RepoError>;

    /// Delete a user by ID.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// All users that have not confirmed their email yet. Feeds the purge
    /// sweep; the deadline filter happens in the domain layer.
    async fn find_unverified(&self) -> Result<Vec<User>, RepoError>;
}
