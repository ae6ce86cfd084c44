//! Signup and login against the user store.
//!
//! Passwords are stored as Argon2id PHC strings with a random salt, so the
//! algorithm parameters travel with each hash.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tracing::{info, warn};

use vnation_models::UserRecord;
use vnation_store::{StoreResult, UserStore};

use crate::error::{ApiError, ApiResult};

pub const USER_EXISTS: &str = "User already exists";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const MISSING_FIELDS: &str = "All fields are required";
pub const SIGNUP_OK: &str = "Signup successful. Please login.";
pub const LOGIN_OK: &str = "Login successful";

fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Account operations over a [`UserStore`].
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Register a user and return the confirmation message.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> ApiResult<String> {
        if [name, email, password].iter().any(|f| f.trim().is_empty()) {
            return Err(ApiError::account_rejected(MISSING_FIELDS));
        }
        let email = email.trim();

        if self.users.find_by_email(email).await?.is_some() {
            return Err(ApiError::account_rejected(USER_EXISTS));
        }

        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| ApiError::internal(format!("hashing task failed: {}", e)))?
            .map_err(|e| ApiError::internal(format!("password hashing failed: {}", e)))?;

        let record = UserRecord::new(name.trim(), email, password_hash);
        match self.users.insert(&record).await {
            Ok(()) => {}
            // Lost a race with a concurrent signup for the same email.
            Err(e) if e.is_conflict() => return Err(ApiError::account_rejected(USER_EXISTS)),
            Err(e) => return Err(e.into()),
        }

        info!(email = %email, "User signed up");
        Ok(SIGNUP_OK.to_string())
    }

    /// Check credentials and return the confirmation message.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<String> {
        let email = email.trim();
        let Some(user) = self.users.find_by_email(email).await? else {
            return Err(ApiError::account_rejected(INVALID_CREDENTIALS));
        };

        let password = password.to_string();
        let stored = user.password_hash;
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|e| ApiError::internal(format!("verification task failed: {}", e)))?
            .map_err(|e| {
                warn!(email = %email, "Stored password hash is unreadable: {}", e);
                ApiError::internal("stored password hash is invalid")
            })?;

        if !verified {
            return Err(ApiError::account_rejected(INVALID_CREDENTIALS));
        }

        info!(email = %email, "User logged in");
        Ok(LOGIN_OK.to_string())
    }

    pub async fn ping(&self) -> StoreResult<()> {
        self.users.ping().await
    }
}
