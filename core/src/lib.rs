//! Domain model for named todo lists.
//!
//! # Overview
//! An [`Account`] owns a [`ListCollection`]: a mapping from list name to an
//! ordered sequence of [`Item`]s. Every mutation the REST server exposes is a
//! method on `ListCollection`, and every method either applies completely or
//! leaves the collection untouched.
//!
//! # Design
//! - Positions are derived from an item's place in its `Vec` and never
//!   stored. Responses expose them transiently through [`IndexedItem`].
//! - Lists are kept sorted by deadline: items with a deadline come first in
//!   ascending order, items without one follow in insertion order. See
//!   [`ordering`].
//! - The crate performs no I/O. Password hashing is injected through the
//!   [`PasswordHasher`] trait and persistence is owned by the server.

pub mod account;
pub mod collection;
pub mod error;
pub mod ordering;
pub mod types;
pub mod validate;

pub use account::{normalize_email, Account, AccountError, PasswordHasher, MIN_PASSWORD_LEN};
pub use collection::{
    Added, ListCollection, Vivify, DEFAULT_LIST, MAX_ITEMS, MAX_LISTS, MAX_LIST_NAME_LEN,
    MAX_NOTES, PAGE_SIZE,
};
pub use error::{Limit, ListError};
pub use types::{IndexedItem, Item, ItemUpdate, ListPage, NewItem};
pub use validate::{validate_array, FieldRule, FieldType, Schema, Violation, ViolationKind, Violations};
