use async_trait::async_trait;
use sqlx::PgPool;

use super::{
    error::UserError,
    repo_types::{NewUser, User},
};

/// Persistence capability for user records.
///
/// Lookups report a missing row as [`UserError::NotFound`]; writes that hit the
/// unique email index report [`UserError::DuplicateEmail`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; the store assigns id and timestamps.
    async fn create(&self, new_user: NewUser) -> Result<User, UserError>;

    async fn find_by_id(&self, id: i64) -> Result<User, UserError>;

    async fn find_by_email(&self, email: &str) -> Result<User, UserError>;

    /// All users. Order is not part of the contract.
    async fn find_all(&self) -> Result<Vec<User>, UserError>;

    /// Persist name and email of an existing user and refresh `updated_at`.
    async fn update(&self, user: &User) -> Result<User, UserError>;

    /// Hard delete.
    async fn delete(&self, id: i64) -> Result<(), UserError>;

    /// Connectivity probe.
    async fn ping(&self) -> Result<(), UserError>;
}

#[derive(Debug, Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, UserError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<User, UserError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        user.ok_or(UserError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> Result<User, UserError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        user.ok_or(UserError::NotFound)
    }

    async fn find_all(&self) -> Result<Vec<User>, UserError> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn update(&self, user: &User) -> Result<User, UserError> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET name = $1, email = $2, updated_at = now()
             WHERE id = $3
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.id)
        .fetch_optional(&self.db)
        .await?;
        updated.ok_or(UserError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<(), UserError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(UserError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), UserError> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}
