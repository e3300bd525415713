use std::sync::Arc;

use tracing::{debug, info};

use super::{
    dto::{CreateUserRequest, UpdateUserRequest},
    error::UserError,
    password::hash_password,
    repo::UserRepository,
    repo_types::{NewUser, User},
};

/// User business logic over an injected repository.
///
/// The email uniqueness checks here are not atomic with the following write;
/// the store's unique index catches what slips through.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_user(&self, input: CreateUserRequest) -> Result<User, UserError> {
        match self.repo.find_by_email(&input.email).await {
            Ok(_) => return Err(UserError::DuplicateEmail),
            Err(UserError::NotFound) => {}
            Err(e) => return Err(e),
        }

        let password_hash = hash_password(&input.password)?;
        let user = self
            .repo
            .create(NewUser {
                name: input.name,
                email: input.email,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, email = %user.email, "user created");
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repo.find_all().await
    }

    pub async fn get_user(&self, id: i64) -> Result<User, UserError> {
        self.repo.find_by_id(id).await
    }

    pub async fn update_user(&self, id: i64, input: UpdateUserRequest) -> Result<User, UserError> {
        let mut user = self.repo.find_by_id(id).await?;

        if let Some(name) = input.name.filter(|n| !n.is_empty()) {
            user.name = name;
        }
        if let Some(email) = input.email.filter(|e| !e.is_empty()) {
            match self.repo.find_by_email(&email).await {
                Ok(existing) if existing.id != id => return Err(UserError::DuplicateEmail),
                Ok(_) | Err(UserError::NotFound) => {}
                Err(e) => return Err(e),
            }
            user.email = email;
        }

        let user = self.repo.update(&user).await?;
        info!(user_id = user.id, "user updated");
        Ok(user)
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), UserError> {
        self.repo.find_by_id(id).await?;
        self.repo.delete(id).await?;
        info!(user_id = id, "user deleted");
        Ok(())
    }

    /// Whether the backing store answers.
    pub async fn database_reachable(&self) -> bool {
        match self.repo.ping().await {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "database ping failed");
                false
            }
        }
    }
}
