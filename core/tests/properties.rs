//! Property tests for the ordering invariants of `ListCollection`.
//!
//! Random operation sequences run against three lists. Operations that fail
//! must leave the collection unchanged; the ones that succeed must keep every
//! list deadline-sorted with contiguous positions.

use lists_core::{ItemUpdate, ListCollection, NewItem, MAX_ITEMS};
use proptest::prelude::*;

const LISTS: [&str; 3] = ["Main", "ListA", "ListB"];

#[derive(Debug, Clone)]
enum Op {
    Add { list: usize, deadline: Option<i64> },
    Delete { list: usize, index: usize },
    Move { from: usize, index: usize, to: usize },
    Update { list: usize, index: usize, deadline: Option<i64> },
}

fn deadline() -> impl Strategy<Value = Option<i64>> {
    prop::option::of(0i64..50)
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let list = || 0..LISTS.len();
    prop_oneof![
        4 => (list(), deadline()).prop_map(|(list, deadline)| Op::Add { list, deadline }),
        1 => (list(), 0usize..12).prop_map(|(list, index)| Op::Delete { list, index }),
        2 => (list(), 0usize..12, list())
            .prop_map(|(from, index, to)| Op::Move { from, index, to }),
        2 => (list(), 0usize..12, deadline())
            .prop_map(|(list, index, deadline)| Op::Update { list, index, deadline }),
    ]
}

/// Apply `op`, returning the change in total item count on success.
fn apply(lists: &mut ListCollection, op: &Op, step: usize) -> Option<isize> {
    match *op {
        Op::Add { list, deadline } => {
            let mut item = NewItem::new(format!("item {step}"), step as i64);
            if let Some(deadline) = deadline {
                item = item.with_deadline(deadline);
            }
            lists.add_item(LISTS[list], item).ok().map(|_| 1)
        }
        Op::Delete { list, index } => lists.delete_item(LISTS[list], index).ok().map(|_| -1),
        Op::Move { from, index, to } => lists
            .move_item(LISTS[from], index, LISTS[to])
            .ok()
            .map(|_| 0),
        Op::Update {
            list,
            index,
            deadline,
        } => {
            let update = ItemUpdate {
                deadline,
                ..Default::default()
            };
            lists.update_item(LISTS[list], index, update).ok().map(|_| 0)
        }
    }
}

fn total_items(lists: &ListCollection) -> usize {
    lists
        .names()
        .map(|name| lists.items(name).unwrap().len())
        .sum()
}

proptest! {
    #[test]
    fn prop_lists_stay_sorted_and_contiguous(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut lists = ListCollection::new();
        let mut expected_total: isize = 0;

        for (step, op) in ops.iter().enumerate() {
            let before = lists.clone();
            match apply(&mut lists, op, step) {
                Some(delta) => expected_total += delta,
                None => prop_assert_eq!(&lists, &before, "failed {:?} must not mutate", op),
            }

            prop_assert!(lists.is_sorted(), "unsorted after {:?}", op);
            for name in lists.names() {
                let indexed = lists.indexed(name).unwrap();
                prop_assert!(indexed.len() <= MAX_ITEMS);
                for (position, item) in indexed.iter().enumerate() {
                    prop_assert_eq!(item.id, position);
                }
            }
        }

        prop_assert_eq!(total_items(&lists) as isize, expected_total);
    }

    #[test]
    fn prop_adding_to_sorted_list_keeps_it_sorted(
        deadlines in prop::collection::vec(prop::option::of(any::<i64>()), 0..40),
        new_deadline in prop::option::of(any::<i64>()),
    ) {
        let mut lists = ListCollection::new();
        for (i, deadline) in deadlines.iter().enumerate() {
            let mut item = NewItem::new(i.to_string(), 0);
            if let Some(deadline) = deadline {
                item = item.with_deadline(*deadline);
            }
            lists.add_item("Main", item).unwrap();
        }
        prop_assert!(lists.is_sorted());

        let mut item = NewItem::new("new", 0);
        if let Some(deadline) = new_deadline {
            item = item.with_deadline(deadline);
        }
        let added = lists.add_item("Main", item).unwrap();
        prop_assert!(lists.is_sorted());
        prop_assert_eq!(&lists.item("Main", added.index).unwrap().title, "new");
        if new_deadline.is_none() {
            prop_assert_eq!(added.index, deadlines.len());
        }
    }

    #[test]
    fn prop_persisted_collection_round_trips(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut lists = ListCollection::new();
        for (step, op) in ops.iter().enumerate() {
            apply(&mut lists, op, step);
        }
        let json = serde_json::to_string(&lists).unwrap();
        let back: ListCollection = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, lists);
    }
}
