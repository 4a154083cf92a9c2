//! Error types for list and item operations.
//!
//! # Design
//! Every variant carries enough context to render the message shown to the
//! user verbatim. None of them are retryable without changing the input, and
//! the server maps each kind to a status code.

use thiserror::Error;

/// Errors returned by [`ListCollection`](crate::ListCollection) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("'{0}' list does not exist")]
    NotFound(String),

    #[error("'{0}' list already exists")]
    AlreadyExists(String),

    /// The operation is forbidden on the default list.
    #[error("Cannot {action} '{list}' list")]
    Protected { list: String, action: &'static str },

    #[error("{0}")]
    LimitExceeded(Limit),

    #[error("An item cannot have more than {max} notes, got {got}")]
    TooManyNotes { max: usize, got: usize },

    #[error("'{0}' is not a valid list name")]
    InvalidName(String),

    #[error("Item {index} does not exist in '{list}' list")]
    IndexOutOfRange { list: String, index: usize },

    #[error("{0}")]
    InvalidOperation(String),

    #[error("Page {page} does not exist in '{list}' list, it has {pages} page(s)")]
    InvalidPage {
        list: String,
        page: usize,
        pages: usize,
    },
}

/// Which cap a [`ListError::LimitExceeded`] hit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Limit {
    #[error("Cannot have more than {max} lists")]
    Lists { max: usize },

    #[error("'{list}' list cannot hold more than {max} items")]
    Items { list: String, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_list() {
        assert_eq!(
            ListError::NotFound("Food".into()).to_string(),
            "'Food' list does not exist"
        );
        assert_eq!(
            ListError::Protected {
                list: "Main".into(),
                action: "delete",
            }
            .to_string(),
            "Cannot delete 'Main' list"
        );
        assert_eq!(
            ListError::IndexOutOfRange {
                list: "Main".into(),
                index: 100,
            }
            .to_string(),
            "Item 100 does not exist in 'Main' list"
        );
    }

    #[test]
    fn limit_message_is_forwarded() {
        let err = ListError::LimitExceeded(Limit::Items {
            list: "Main".into(),
            max: 100,
        });
        assert_eq!(err.to_string(), "'Main' list cannot hold more than 100 items");
    }
}
