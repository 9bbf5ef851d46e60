//! In-memory user repository - used when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use sentra_core::domain::User;
use sentra_core::error::RepoError;
use sentra_core::ports::UserRepository;

/// HashMap-backed user store with async RwLock.
///
/// Keeps the same unique-email semantics as the real database so the
/// registration race behaves identically in no-database mode. Data is lost
/// on process restart.
#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut rows = self.rows.write().await;

        let taken = rows
            .values()
            .any(|u| u.email == user.email && u.id != user.id);
        if taken {
            return Err(RepoError::Constraint(format!(
                "users.email duplicate: {}",
                user.email
            )));
        }

        rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.rows.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }

    async fn find_unverified(&self) -> Result<Vec<User>, RepoError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|u| !u.verified)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User::new("Ann".to_string(), email.to_string(), "hash".to_string())
    }

    #[tokio::test]
    async fn save_and_find_round_trip() {
        let repo = InMemoryUserRepository::new();
        let saved = repo.save(user("ann@x.com")).await.unwrap();

        assert_eq!(
            repo.find_by_id(saved.id).await.unwrap().unwrap().email,
            "ann@x.com"
        );
        assert!(repo.exists_by_email("ann@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_violates_constraint() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("ann@x.com")).await.unwrap();

        let result = repo.save(user("ann@x.com")).await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn updating_own_row_keeps_the_email() {
        let repo = InMemoryUserRepository::new();
        let mut saved = repo.save(user("ann@x.com")).await.unwrap();

        saved.verified = true;
        let updated = repo.save(saved).await.unwrap();

        assert!(updated.verified);
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found() {
        let repo = InMemoryUserRepository::new();

        let result = repo.delete(Uuid::new_v4()).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}
