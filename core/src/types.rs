//! Item DTOs shared by the domain model, the server and the client.
//!
//! # Design
//! Timestamps are epoch milliseconds (`i64`) so the persisted document and the
//! JSON wire format stay identical. `Item` never carries its own position;
//! [`IndexedItem`] pairs an item with the position it had when the response
//! was built.

use serde::{Deserialize, Serialize};

/// A single todo entry as stored inside a list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    #[serde(default)]
    pub notes: Vec<String>,
    pub created: i64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<i64>,
}

/// Payload for adding an item. New items always start out not completed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewItem {
    pub title: String,
    #[serde(default)]
    pub notes: Vec<String>,
    pub created: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<i64>,
}

impl NewItem {
    pub fn new(title: impl Into<String>, created: i64) -> Self {
        Self {
            title: title.into(),
            notes: Vec::new(),
            created,
            deadline: None,
            reminder: None,
        }
    }

    pub fn with_notes(mut self, notes: Vec<String>) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_deadline(mut self, deadline: i64) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_reminder(mut self, reminder: i64) -> Self {
        self.reminder = Some(reminder);
        self
    }
}

impl From<NewItem> for Item {
    fn from(new: NewItem) -> Self {
        Self {
            title: new.title,
            notes: new.notes,
            created: new.created,
            completed: false,
            deadline: new.deadline,
            reminder: new.reminder,
        }
    }
}

/// Partial update for an existing item. Only the fields present are applied;
/// `null` in JSON is treated the same as an omitted field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<i64>,
}

impl ItemUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.notes.is_none()
            && self.completed.is_none()
            && self.deadline.is_none()
            && self.reminder.is_none()
    }
}

/// An item together with its position at the time it was read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexedItem {
    pub id: usize,
    #[serde(flatten)]
    pub item: Item,
}

/// One page of a list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListPage {
    pub items: Vec<IndexedItem>,
    pub pages: usize,
}
