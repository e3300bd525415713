use thiserror::Error;

/// Failures of the user repository and service. Repository errors pass
/// through the service unchanged.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,

    #[error("email already exists")]
    DuplicateEmail,

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl From<sqlx::Error> for UserError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => UserError::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => UserError::DuplicateEmail,
            other => UserError::Database(other),
        }
    }
}
