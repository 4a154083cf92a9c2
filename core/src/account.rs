//! Registered accounts and the document they persist as.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collection::ListCollection;

/// Passwords must be longer than eight characters.
pub const MIN_PASSWORD_LEN: usize = 9;

/// Hashes and checks passwords. Implemented by the server's auth layer.
pub trait PasswordHasher {
    fn hash(&self, raw: &str) -> Result<String, AccountError>;
    fn verify(&self, raw: &str, hash: &str) -> bool;
}

/// Canonical form of an email used as the account key.
pub fn normalize_email(email: &str) -> &str {
    email.trim()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("Password length is too short, must be greater than 8 characters")]
    WeakPassword,

    #[error("'{0}' is not a valid email")]
    InvalidEmail(String),

    #[error("Password could not be hashed: {0}")]
    Hashing(String),
}

/// One user and their lists. This is also the persisted record:
/// `{ email, username, passwordHash, lists, version }`.
///
/// `version` is bumped by the store on every write and compared on the next
/// one, so two requests racing on the same account cannot both win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    #[serde(default)]
    pub lists: ListCollection,
    #[serde(default)]
    pub version: u64,
}

impl Account {
    pub fn register(
        email: &str,
        username: &str,
        password: &str,
        hasher: &impl PasswordHasher,
    ) -> Result<Self, AccountError> {
        let email = normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(AccountError::InvalidEmail(email.to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountError::WeakPassword);
        }
        Ok(Self {
            email: email.to_string(),
            username: username.to_string(),
            password_hash: hasher.hash(password)?,
            lists: ListCollection::new(),
            version: 0,
        })
    }

    pub fn authenticate(&self, password: &str, hasher: &impl PasswordHasher) -> bool {
        hasher.verify(password, &self.password_hash)
    }
}
