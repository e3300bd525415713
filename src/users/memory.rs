use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use time::OffsetDateTime;

use super::{
    error::UserError,
    repo::UserRepository,
    repo_types::{NewUser, User},
};

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, User>,
}

impl Table {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// In-memory fake with the same contract as the Postgres repository,
/// including the unique email index.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    table: Arc<Mutex<Table>>,
    offline: bool,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose every call fails like an unreachable database.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    fn table(&self) -> Result<std::sync::MutexGuard<'_, Table>, UserError> {
        if self.offline {
            return Err(UserError::Database(sqlx::Error::PoolClosed));
        }
        Ok(self.table.lock().unwrap())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, UserError> {
        let mut table = self.table()?;
        if table.email_taken(&new_user.email, None) {
            return Err(UserError::DuplicateEmail);
        }
        table.next_id += 1;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: table.next_id,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<User, UserError> {
        self.table()?.rows.get(&id).cloned().ok_or(UserError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> Result<User, UserError> {
        self.table()?
            .rows
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(UserError::NotFound)
    }

    async fn find_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.table()?.rows.values().cloned().collect())
    }

    async fn update(&self, user: &User) -> Result<User, UserError> {
        let mut table = self.table()?;
        if table.email_taken(&user.email, Some(user.id)) {
            return Err(UserError::DuplicateEmail);
        }
        let row = table.rows.get_mut(&user.id).ok_or(UserError::NotFound)?;
        row.name = user.name.clone();
        row.email = user.email.clone();
        row.updated_at = OffsetDateTime::now_utc();
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), UserError> {
        self.table()?
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(UserError::NotFound)
    }

    async fn ping(&self) -> Result<(), UserError> {
        self.table().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ann".into(),
            email: email.into(),
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn ids_increase_and_timestamps_are_set() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create(new_user("a@x.com")).await.unwrap();
        let b = repo.create(new_user("b@x.com")).await.unwrap();
        assert!(b.id > a.id);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[tokio::test]
    async fn unique_email_is_enforced_as_a_backstop() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("a@x.com")).await.unwrap();
        let err = repo.create(new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, UserError::DuplicateEmail));
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_rows_fail() {
        let repo = InMemoryUserRepository::new();
        let mut user = repo.create(new_user("a@x.com")).await.unwrap();
        repo.delete(user.id).await.unwrap();

        user.name = "Bo".into();
        assert!(matches!(repo.update(&user).await, Err(UserError::NotFound)));
        assert!(matches!(repo.delete(user.id).await, Err(UserError::NotFound)));
    }

    #[tokio::test]
    async fn offline_repository_reports_database_errors() {
        let repo = InMemoryUserRepository::offline();
        assert!(matches!(repo.ping().await, Err(UserError::Database(_))));
        assert!(matches!(repo.find_all().await, Err(UserError::Database(_))));
    }
}
