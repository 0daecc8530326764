//! Identity collaborator: account registration and credential checks.
//!
//! The rest of the service only needs "validate credentials, give me a user";
//! password storage stays behind the `IdentityProvider` trait.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::sync::Arc;
use thiserror::Error;

use super::TokenError;
use crate::db::{Database, StoreError};
use crate::models::User;
use crate::validation::{self, ValidationError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid user name or password")]
    InvalidCredentials,

    #[error("user name is already taken")]
    UserNameTaken,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("password hashing failed: {0}")]
    Hashing(password_hash::Error),

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Rejected(v) if v.field == "userName" => AuthError::UserNameTaken,
            StoreError::Rejected(v) => AuthError::Validation(v),
            other => AuthError::Store(other),
        }
    }
}

pub trait IdentityProvider: Send + Sync {
    fn register(
        &self,
        user_name: &str,
        email: Option<&str>,
        password: &str,
    ) -> Result<User, AuthError>;

    fn validate_credentials(&self, user_name: &str, password: &str) -> Result<User, AuthError>;
}

/// Accounts in the `users` table with Argon2id password hashes
pub struct SqliteIdentityProvider {
    db: Arc<Database>,
}

impl SqliteIdentityProvider {
    pub fn new(db: Arc<Database>) -> Self {
        SqliteIdentityProvider { db }
    }

    fn hasher() -> Argon2<'static> {
        Argon2::default()
    }
}

impl IdentityProvider for SqliteIdentityProvider {
    fn register(
        &self,
        user_name: &str,
        email: Option<&str>,
        password: &str,
    ) -> Result<User, AuthError> {
        let user_name = validation::user_name(user_name)?;
        let email = validation::email(email)?;
        validation::required("password", password)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::hasher()
            .hash_password(password.as_bytes(), &salt)
            .map_err(AuthError::Hashing)?
            .to_string();

        Ok(self.db.create_user(user_name, email, &hash)?)
    }

    fn validate_credentials(&self, user_name: &str, password: &str) -> Result<User, AuthError> {
        let user_name = validation::required("userName", user_name)?;
        validation::required("password", password)?;

        let Some(user) = self.db.find_user_by_name(user_name)? else {
            return Err(AuthError::InvalidCredentials);
        };

        let parsed = PasswordHash::new(&user.password_hash).map_err(AuthError::Hashing)?;
        match Self::hasher().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => {}
            Err(password_hash::Error::Password) => return Err(AuthError::InvalidCredentials),
            Err(e) => return Err(AuthError::Hashing(e)),
        }

        self.db.record_login(&user.id)?;
        Ok(user)
    }
}
