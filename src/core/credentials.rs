//! Account registration and login

use tracing::{info, warn};

use crate::db::{DbEngine, UserTable};
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::models::User;
use crate::utils::auth::{hash_password, verify_password};

/// Account storage with hashed passwords
#[derive(Debug, Clone)]
pub struct CredentialStore {
    db: DbEngine,
}

impl CredentialStore {
    pub fn new(db: DbEngine) -> Self {
        Self { db }
    }

    /// Create an account
    ///
    /// The lookups before the insert only produce the precise error early;
    /// the UNIQUE constraints decide when two registrations race.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> AppResult<User> {
        let pool = self.db.pool();

        if UserTable::get_by_email(pool, email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }
        if UserTable::get_by_username(pool, username).await?.is_some() {
            return Err(AppError::DuplicateUsername);
        }

        let password_hash = hash_password(password);

        match UserTable::insert(pool, username, email, &password_hash).await {
            Ok(user) => {
                info!("Registered user {} (id {})", user.username, user.id);
                Ok(user)
            }
            Err(err) if is_unique_violation(&err) => {
                if UserTable::get_by_email(pool, email).await?.is_some() {
                    Err(AppError::DuplicateEmail)
                } else {
                    Err(AppError::DuplicateUsername)
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Check an email/password pair
    ///
    /// Unknown email and wrong password fail the same way.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let user = UserTable::get_by_email(self.db.pool(), email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            warn!("Failed login for user id {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn get(&self, id: i64) -> AppResult<User> {
        UserTable::get_by_id(self.db.pool(), id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}
