//! Persistence adapter for account documents.
//!
//! # Design
//! Accounts are stored as whole JSON documents keyed by email, the way a
//! document database would hold them. Writes go through
//! [`AccountStore::apply_partial_update`], which only succeeds when the
//! caller's `expected_version` matches the stored one and then bumps it. Two
//! requests that loaded the same version cannot both write: the second one
//! gets [`StoreError::VersionConflict`].

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use lists_core::{Account, ListCollection};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("account '{0}' not found")]
    NotFound(String),

    #[error("account '{0}' already exists")]
    DuplicateKey(String),

    #[error("account '{key}' is at version {actual}, expected {expected}")]
    VersionConflict {
        key: String,
        expected: u64,
        actual: u64,
    },

    #[error("document for '{key}' could not be (de)serialized: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The fields of an account a write may replace. Absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountUpdate {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub lists: Option<ListCollection>,
}

impl AccountUpdate {
    pub fn lists(lists: ListCollection) -> Self {
        Self {
            lists: Some(lists),
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Account, StoreError>;

    async fn insert(&self, account: &Account) -> Result<(), StoreError>;

    /// Apply `update` if the stored version equals `expected_version`.
    /// Returns the new version.
    async fn apply_partial_update(
        &self,
        key: &str,
        expected_version: u64,
        update: AccountUpdate,
    ) -> Result<u64, StoreError>;
}

/// In-process document store. Cloning shares the underlying documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn decode(key: &str, document: &str) -> Result<Account, StoreError> {
    serde_json::from_str(document).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })
}

fn encode(account: &Account) -> Result<String, StoreError> {
    serde_json::to_string(account).map_err(|source| StoreError::Corrupt {
        key: account.email.clone(),
        source,
    })
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Account, StoreError> {
        let documents = self.documents.read().await;
        let document = documents
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        decode(key, document)
    }

    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        let document = encode(account)?;
        let mut documents = self.documents.write().await;
        if documents.contains_key(&account.email) {
            return Err(StoreError::DuplicateKey(account.email.clone()));
        }
        documents.insert(account.email.clone(), document);
        debug!(key = %account.email, "inserted account");
        Ok(())
    }

    async fn apply_partial_update(
        &self,
        key: &str,
        expected_version: u64,
        update: AccountUpdate,
    ) -> Result<u64, StoreError> {
        let mut documents = self.documents.write().await;
        let document = documents
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        let mut account = decode(key, document)?;
        if account.version != expected_version {
            return Err(StoreError::VersionConflict {
                key: key.to_string(),
                expected: expected_version,
                actual: account.version,
            });
        }

        let AccountUpdate {
            username,
            password_hash,
            lists,
        } = update;
        if let Some(username) = username {
            account.username = username;
        }
        if let Some(password_hash) = password_hash {
            account.password_hash = password_hash;
        }
        if let Some(lists) = lists {
            account.lists = lists;
        }
        account.version += 1;

        let document = encode(&account)?;
        documents.insert(key.to_string(), document);
        debug!(key, version = account.version, "updated account");
        Ok(account.version)
    }
}
