//! The sort-by-deadline insertion rule.
//!
//! A list is deadline-sorted when every item with a deadline precedes every
//! item without one, and the deadlines are non-decreasing. Items without a
//! deadline keep their insertion order at the tail.
//!
//! New items are placed immediately before the first item whose deadline is
//! strictly later, or before the first item without a deadline, whichever
//! comes first. Equal deadlines therefore keep insertion order. An item
//! without a deadline is appended.

use crate::types::Item;

/// Position at which an item with `deadline` belongs in `items`.
pub fn insertion_index(items: &[Item], deadline: Option<i64>) -> usize {
    let Some(deadline) = deadline else {
        return items.len();
    };
    items
        .iter()
        .position(|item| item.deadline.map_or(true, |existing| existing > deadline))
        .unwrap_or(items.len())
}

/// Insert `item` according to the deadline rule and return its position.
pub fn insert_sorted(items: &mut Vec<Item>, item: Item) -> usize {
    let index = insertion_index(items, item.deadline);
    items.insert(index, item);
    index
}

/// Whether `items` satisfies the deadline ordering.
pub fn is_deadline_sorted(items: &[Item]) -> bool {
    let mut seen_undated = false;
    let mut last = i64::MIN;
    for item in items {
        match item.deadline {
            Some(_) if seen_undated => return false,
            Some(deadline) if deadline < last => return false,
            Some(deadline) => last = deadline,
            None => seen_undated = true,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewItem;

    fn item(title: &str, deadline: Option<i64>) -> Item {
        let new = NewItem::new(title, 0);
        match deadline {
            Some(d) => new.with_deadline(d).into(),
            None => new.into(),
        }
    }

    fn titles(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn undated_items_append() {
        let mut items = vec![item("a", Some(5)), item("b", None)];
        assert_eq!(insert_sorted(&mut items, item("c", None)), 2);
        assert_eq!(titles(&items), ["a", "b", "c"]);
    }

    #[test]
    fn dated_item_goes_before_first_later_deadline() {
        let mut items = vec![item("a", Some(5)), item("b", Some(20)), item("c", None)];
        assert_eq!(insert_sorted(&mut items, item("d", Some(10))), 1);
        assert_eq!(titles(&items), ["a", "d", "b", "c"]);
    }

    #[test]
    fn dated_item_goes_before_first_undated() {
        let mut items = vec![item("a", Some(5)), item("b", None)];
        assert_eq!(insert_sorted(&mut items, item("c", Some(50))), 1);
        assert_eq!(titles(&items), ["a", "c", "b"]);
    }

    #[test]
    fn equal_deadlines_keep_insertion_order() {
        let mut items = vec![item("a", Some(5))];
        insert_sorted(&mut items, item("b", Some(5)));
        assert_eq!(titles(&items), ["a", "b"]);
    }

    #[test]
    fn empty_list_inserts_at_zero() {
        let mut items = Vec::new();
        assert_eq!(insert_sorted(&mut items, item("a", Some(1))), 0);
    }

    #[test]
    fn sortedness_check() {
        assert!(is_deadline_sorted(&[item("a", Some(1)), item("b", Some(1)), item("c", None)]));
        assert!(!is_deadline_sorted(&[item("a", None), item("b", Some(1))]));
        assert!(!is_deadline_sorted(&[item("a", Some(2)), item("b", Some(1))]));
        assert!(is_deadline_sorted(&[]));
    }
}
