use std::sync::Arc;

use crate::config::AppConfig;
use crate::users::{repo::UserRepository, services::UserService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: UserService,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, repo: Arc<dyn UserRepository>) -> Self {
        Self {
            config,
            users: UserService::new(repo),
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::with_repo(Arc::new(crate::users::memory::InMemoryUserRepository::new()))
    }

    #[cfg(test)]
    pub fn fake_offline() -> Self {
        Self::with_repo(Arc::new(crate::users::memory::InMemoryUserRepository::offline()))
    }

    #[cfg(test)]
    fn with_repo(repo: Arc<dyn UserRepository>) -> Self {
        let config = AppConfig::from_lookup(|key| match key {
            "APP_NAME" => Some("test-app".into()),
            "APP_VERSION" => Some("9.9.9".into()),
            "APP_ENV" => Some("test".into()),
            _ => None,
        })
        .expect("test config");
        Self::new(Arc::new(config), repo)
    }
}
