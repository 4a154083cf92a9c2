use std::collections::BTreeMap;

use lists_core::{IndexedItem, ListPage};
use serde::{Deserialize, Serialize};

/// Lists keyed by name, as returned by the list routes.
pub type Pages = BTreeMap<String, ListPage>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// A bearer token and its expiry in epoch milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub expires_at: i64,
}

/// Both lists after a move, with fresh positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Moved {
    pub source: Vec<IndexedItem>,
    pub target: Vec<IndexedItem>,
}
