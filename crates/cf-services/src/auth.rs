//! Registration, login, and password reset.
//!
//! Identity is deliberately thin: Argon2 hashing and token keys come from
//! the `AuthProvider` port, storage from `UserRepo`. One token per user,
//! reused across logins.

use cf_core::error::{AppError, Result};
use cf_core::models::{NewUser, User};
use cf_core::traits::{AuthProvider, UserRepo};
use std::sync::Arc;

/// Input for account creation.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<u32>,
    pub country: String,
    pub residence: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepo>,
    auth: Arc<dyn AuthProvider>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepo>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { users, auth }
    }

    /// Creates an account and issues its token. Duplicate handles surface
    /// as a validation failure, whether caught by pre-check or by the
    /// storage uniqueness constraint.
    pub async fn register(&self, reg: Registration) -> Result<(User, String)> {
        if reg.username.trim().is_empty() {
            return Err(AppError::Validation("username must not be empty".into()));
        }
        if reg.password.is_empty() {
            return Err(AppError::Validation("password must not be empty".into()));
        }

        let password_hash = self.auth.hash_password(&reg.password)?;
        let user = self
            .users
            .create_user(NewUser {
                username: reg.username,
                email: reg.email,
                password_hash,
                first_name: reg.first_name,
                last_name: reg.last_name,
                age: reg.age,
                country: reg.country,
                residence: reg.residence,
            })
            .await?;

        let token = self
            .users
            .get_or_create_token(user.id, &self.auth.generate_token_key())
            .await?;
        log::info!("registered user {}", user.username);
        Ok((user, token))
    }

    /// Returns the account token for valid credentials. Bad credentials are
    /// a 400-style validation failure, same as an unknown handle, so the
    /// response does not reveal which half was wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .filter(|u| self.auth.verify_password(password, &u.password_hash))
            .ok_or_else(|| {
                AppError::Validation("unable to log in with provided credentials".into())
            })?;
        self.users
            .get_or_create_token(user.id, &self.auth.generate_token_key())
            .await
    }

    /// Resets the password of the oldest account holding `email`.
    pub async fn reset_password(&self, email: &str, new_password: &str) -> Result<()> {
        if new_password.is_empty() {
            return Err(AppError::Validation("password must not be empty".into()));
        }
        let user = self
            .users
            .find_by_email_oldest(email)
            .await?
            .ok_or_else(|| AppError::NotFound("user with this email".into()))?;
        let hash = self.auth.hash_password(new_password)?;
        self.users.update_password(user.id, &hash).await?;
        log::info!("password reset for user {}", user.username);
        Ok(())
    }

    /// Resolves a presented token key to its principal, if any.
    pub async fn principal_for_token(&self, key: &str) -> Result<Option<User>> {
        self.users.user_for_token(key).await
    }
}
