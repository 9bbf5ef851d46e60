//! PostgreSQL user repository.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use sentra_core::domain::User;
use sentra_core::error::RepoError;
use sentra_core::ports::UserRepository;

use super::entity::user::{self, Entity as UserEntity};

/// SeaORM-backed user store. Email uniqueness is enforced by the database;
/// constraint violations surface as [`RepoError::Constraint`] so a lost
/// registration race maps to a validation failure upstream.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

/// Mask the local part so emails stay out of logs.
fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            if local.len() > 1 {
                format!("{}***{}", &local[..1], domain)
            } else {
                format!("***{domain}")
            }
        }
        None => "***".to_string(),
    }
}

fn map_db_err(e: sea_orm::DbErr) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint(err_str)
    } else {
        RepoError::Query(err_str)
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
        let count = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(count > 0)
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let active_model: user::ActiveModel = user.into();

        // Insert-or-update on the primary key; the email uniqueness
        // constraint still fires for a different user with the same address.
        let model = UserEntity::insert(active_model)
            .on_conflict(
                OnConflict::column(user::Column::Id)
                    .update_columns([
                        user::Column::Name,
                        user::Column::Email,
                        user::Column::PasswordHash,
                        user::Column::Verified,
                        user::Column::VerifyDeadline,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn find_unverified(&self) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Verified.eq(false))
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    fn user_model(email: &str, verified: bool) -> user::Model {
        let now = chrono::Utc::now();
        user::Model {
            id: Uuid::new_v4(),
            name: "Ann".to_owned(),
            email: email.to_owned(),
            password_hash: "$argon2$hash".to_owned(),
            verified,
            verify_deadline: (now + chrono::Duration::minutes(30)).into(),
            created_at: now.into(),
        }
    }

    #[tokio::test]
    async fn find_by_email_maps_model_to_domain() {
        let model = user_model("ann@x.com", false);
        let expected_id = model.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();
        let repo = PostgresUserRepository::new(db);

        let user = repo.find_by_email("ann@x.com").await.unwrap().unwrap();

        assert_eq!(user.id, expected_id);
        assert_eq!(user.email, "ann@x.com");
        assert!(!user.verified);
    }

    #[tokio::test]
    async fn find_unverified_converts_every_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                user_model("a@x.com", false),
                user_model("b@x.com", false),
            ]])
            .into_connection();
        let repo = PostgresUserRepository::new(db);

        let users = repo.find_unverified().await.unwrap();

        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| !u.verified));
    }

    #[test]
    fn email_masking_hides_the_local_part() {
        assert_eq!(mask_email("annabel@x.com"), "a***@x.com");
        assert_eq!(mask_email("a@x.com"), "***@x.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
