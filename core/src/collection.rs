//! A user's named todo lists and the operations that reorder them.
//!
//! # Invariants
//! - The default list [`DEFAULT_LIST`] always exists and cannot be deleted or
//!   renamed.
//! - At most [`MAX_LISTS`] lists, each holding at most [`MAX_ITEMS`] items.
//! - List names are 1..=[`MAX_LIST_NAME_LEN`] characters with at least one
//!   non-whitespace character.
//! - Every list is deadline-sorted as long as all insertions go through
//!   [`ordering::insert_sorted`].
//!
//! Every operation validates all of its preconditions before it mutates, so a
//! returned error always means the collection is unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Limit, ListError};
use crate::ordering::{self, insert_sorted};
use crate::types::{IndexedItem, Item, ItemUpdate, ListPage, NewItem};

pub const DEFAULT_LIST: &str = "Main";
pub const MAX_LISTS: usize = 50;
pub const MAX_LIST_NAME_LEN: usize = 30;
pub const MAX_ITEMS: usize = 100;
pub const MAX_NOTES: usize = 10;
pub const PAGE_SIZE: usize = 25;

/// Outcome of making sure a list exists before adding to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Vivify {
    Created,
    AlreadyExisted,
    Rejected(ListError),
}

/// Result of a successful [`ListCollection::add_item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Added {
    pub index: usize,
    /// Either `Created` or `AlreadyExisted`.
    pub list: Vivify,
}

/// Mapping from list name to its ordered items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<Item>>",
    into = "BTreeMap<String, Vec<Item>>"
)]
pub struct ListCollection {
    lists: BTreeMap<String, Vec<Item>>,
}

impl Default for ListCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<BTreeMap<String, Vec<Item>>> for ListCollection {
    type Error = ListError;

    fn try_from(lists: BTreeMap<String, Vec<Item>>) -> Result<Self, Self::Error> {
        if !lists.contains_key(DEFAULT_LIST) {
            return Err(ListError::NotFound(DEFAULT_LIST.to_string()));
        }
        Ok(Self { lists })
    }
}

impl From<ListCollection> for BTreeMap<String, Vec<Item>> {
    fn from(collection: ListCollection) -> Self {
        collection.lists
    }
}

impl ListCollection {
    /// A collection holding only an empty default list.
    pub fn new() -> Self {
        let mut lists = BTreeMap::new();
        lists.insert(DEFAULT_LIST.to_string(), Vec::new());
        Self { lists }
    }

    /// Number of lists.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Always false: the default list cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lists.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    pub fn items(&self, name: &str) -> Result<&[Item], ListError> {
        self.lists
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ListError::NotFound(name.to_string()))
    }

    pub fn item(&self, name: &str, index: usize) -> Result<&Item, ListError> {
        self.items(name)?
            .get(index)
            .ok_or_else(|| out_of_range(name, index))
    }

    /// The whole list with derived positions attached.
    pub fn indexed(&self, name: &str) -> Result<Vec<IndexedItem>, ListError> {
        Ok(index_items(self.items(name)?, 0))
    }

    /// Check a list name against the length and whitespace rules.
    pub fn validate_name(name: &str) -> Result<(), ListError> {
        let length = name.chars().count();
        if length == 0 || length > MAX_LIST_NAME_LEN || name.trim().is_empty() {
            return Err(ListError::InvalidName(name.to_string()));
        }
        Ok(())
    }

    pub fn create_list(&mut self, name: &str) -> Result<(), ListError> {
        Self::validate_name(name)?;
        if self.contains(name) {
            return Err(ListError::AlreadyExists(name.to_string()));
        }
        if self.lists.len() >= MAX_LISTS {
            return Err(ListError::LimitExceeded(Limit::Lists { max: MAX_LISTS }));
        }
        self.lists.insert(name.to_string(), Vec::new());
        Ok(())
    }

    pub fn delete_list(&mut self, name: &str) -> Result<(), ListError> {
        if !self.contains(name) {
            return Err(ListError::NotFound(name.to_string()));
        }
        if name == DEFAULT_LIST {
            return Err(protected(name, "delete"));
        }
        self.lists.remove(name);
        Ok(())
    }

    pub fn rename_list(&mut self, old: &str, new: &str) -> Result<(), ListError> {
        if old == DEFAULT_LIST {
            return Err(protected(old, "rename"));
        }
        if !self.contains(old) {
            return Err(ListError::NotFound(old.to_string()));
        }
        if self.contains(new) {
            return Err(ListError::AlreadyExists(new.to_string()));
        }
        Self::validate_name(new)?;
        let items = self
            .lists
            .remove(old)
            .ok_or_else(|| ListError::NotFound(old.to_string()))?;
        self.lists.insert(new.to_string(), items);
        Ok(())
    }

    pub fn clear_list(&mut self, name: &str) -> Result<(), ListError> {
        self.list_mut(name)?.clear();
        Ok(())
    }

    /// Create `name` unless it already exists.
    pub fn ensure_list(&mut self, name: &str) -> Vivify {
        if self.contains(name) {
            return Vivify::AlreadyExisted;
        }
        match self.create_list(name) {
            Ok(()) => Vivify::Created,
            Err(err) => Vivify::Rejected(err),
        }
    }

    /// Add an item to `name`, creating the list when it does not exist yet.
    pub fn add_item(&mut self, name: &str, new: NewItem) -> Result<Added, ListError> {
        check_notes(new.notes.len())?;
        if let Some(items) = self.lists.get(name) {
            check_capacity(name, items)?;
        }
        let list = match self.ensure_list(name) {
            Vivify::Rejected(err) => return Err(err),
            outcome => outcome,
        };
        let index = insert_sorted(self.list_mut(name)?, new.into());
        Ok(Added { index, list })
    }

    /// Apply the fields present in `update` and return the item's position
    /// afterwards. A changed deadline re-sorts the item.
    pub fn update_item(
        &mut self,
        name: &str,
        index: usize,
        update: ItemUpdate,
    ) -> Result<usize, ListError> {
        let items = self.list_mut(name)?;
        let item = items
            .get_mut(index)
            .ok_or_else(|| out_of_range(name, index))?;
        if let Some(notes) = &update.notes {
            check_notes(notes.len())?;
        }

        let ItemUpdate {
            title,
            notes,
            completed,
            deadline,
            reminder,
        } = update;
        if let Some(title) = title {
            item.title = title;
        }
        if let Some(notes) = notes {
            item.notes = notes;
        }
        if let Some(completed) = completed {
            item.completed = completed;
        }
        if let Some(reminder) = reminder {
            item.reminder = Some(reminder);
        }
        let resort = match deadline {
            Some(deadline) if item.deadline != Some(deadline) => {
                item.deadline = Some(deadline);
                true
            }
            _ => false,
        };

        if !resort {
            return Ok(index);
        }
        let item = items.remove(index);
        Ok(insert_sorted(items, item))
    }

    pub fn delete_item(&mut self, name: &str, index: usize) -> Result<Item, ListError> {
        let items = self.list_mut(name)?;
        if index >= items.len() {
            return Err(out_of_range(name, index));
        }
        Ok(items.remove(index))
    }

    /// Move an item into a different list, placing it by the deadline rule.
    /// Returns its position in `to`.
    pub fn move_item(&mut self, from: &str, index: usize, to: &str) -> Result<usize, ListError> {
        let source = self.items(from)?;
        if index >= source.len() {
            return Err(out_of_range(from, index));
        }
        let target = self.items(to)?;
        if from == to {
            return Err(ListError::InvalidOperation(format!(
                "Cannot move an item within '{from}' list, choose a different list"
            )));
        }
        check_capacity(to, target)?;

        let item = self.list_mut(from)?.remove(index);
        Ok(insert_sorted(self.list_mut(to)?, item))
    }

    /// Page `page` (1-based) of `name`. An empty list has one empty page.
    pub fn get_list(&self, name: &str, page: usize) -> Result<ListPage, ListError> {
        let items = self.items(name)?;
        let pages = page_count(items.len());
        if page == 0 || page > pages {
            return Err(ListError::InvalidPage {
                list: name.to_string(),
                page,
                pages,
            });
        }
        let start = (page - 1) * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(items.len());
        Ok(ListPage {
            items: index_items(&items[start..end], start),
            pages,
        })
    }

    /// First page of every list.
    pub fn get_lists(&self) -> BTreeMap<String, ListPage> {
        self.lists
            .iter()
            .map(|(name, items)| {
                let end = PAGE_SIZE.min(items.len());
                let page = ListPage {
                    items: index_items(&items[..end], 0),
                    pages: page_count(items.len()),
                };
                (name.clone(), page)
            })
            .collect()
    }

    /// Whether every list satisfies the deadline ordering.
    pub fn is_sorted(&self) -> bool {
        self.lists.values().all(|items| ordering::is_deadline_sorted(items))
    }

    fn list_mut(&mut self, name: &str) -> Result<&mut Vec<Item>, ListError> {
        self.lists
            .get_mut(name)
            .ok_or_else(|| ListError::NotFound(name.to_string()))
    }
}

fn index_items(items: &[Item], offset: usize) -> Vec<IndexedItem> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| IndexedItem {
            id: offset + i,
            item: item.clone(),
        })
        .collect()
}

fn page_count(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE).max(1)
}

fn check_notes(count: usize) -> Result<(), ListError> {
    if count > MAX_NOTES {
        return Err(ListError::TooManyNotes {
            max: MAX_NOTES,
            got: count,
        });
    }
    Ok(())
}

fn check_capacity(name: &str, items: &[Item]) -> Result<(), ListError> {
    if items.len() >= MAX_ITEMS {
        return Err(ListError::LimitExceeded(Limit::Items {
            list: name.to_string(),
            max: MAX_ITEMS,
        }));
    }
    Ok(())
}

fn out_of_range(name: &str, index: usize) -> ListError {
    ListError::IndexOutOfRange {
        list: name.to_string(),
        index,
    }
}

fn protected(name: &str, action: &'static str) -> ListError {
    ListError::Protected {
        list: name.to_string(),
        action,
    }
}
