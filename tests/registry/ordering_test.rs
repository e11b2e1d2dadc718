/*!
 * Registry Ordering Tests
 * Sequential behaviour checked against a BTreeSet model
 */

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeSet;
use sync_pipelines::core::types::{Item, Tag};
use sync_pipelines::OrderedRegistry;

#[derive(Debug, Clone)]
enum Op {
    Insert(Tag),
    Remove(Tag),
    Contains(Tag),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-50i64..50).prop_map(Op::Insert),
        (-50i64..50).prop_map(Op::Remove),
        (-50i64..50).prop_map(Op::Contains),
    ]
}

proptest! {
    #[test]
    fn prop_registry_matches_sorted_set(ops in proptest::collection::vec(op(), 0..200)) {
        let registry = OrderedRegistry::new();
        let mut model = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(tag) => {
                    prop_assert_eq!(registry.insert(Item::new(tag)), model.insert(tag));
                }
                Op::Remove(tag) => {
                    prop_assert_eq!(registry.remove(tag).is_some(), model.remove(&tag));
                }
                Op::Contains(tag) => {
                    prop_assert_eq!(registry.contains(tag), model.contains(&tag));
                }
            }

            let snapshot = registry.snapshot();
            prop_assert!(snapshot.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(snapshot, model.iter().copied().collect::<Vec<_>>());
        }
    }
}

#[test]
fn test_insert_order_does_not_matter() {
    for order in [[5, 3, 8, 1], [1, 3, 5, 8], [8, 5, 3, 1], [3, 1, 8, 5]] {
        let registry = OrderedRegistry::new();
        for tag in order {
            registry.insert(Item::new(tag));
        }
        assert_eq!(registry.snapshot(), vec![1, 3, 5, 8]);
    }
}

#[test]
fn test_remove_then_missing_remove() {
    let registry = OrderedRegistry::new();
    for tag in [5, 3, 8, 1] {
        registry.insert(Item::new(tag));
    }

    registry.remove(3);
    assert_eq!(registry.snapshot(), vec![1, 5, 8]);

    assert_eq!(registry.remove(99), None);
    assert_eq!(registry.snapshot(), vec![1, 5, 8]);
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_negative_tags_sort_first() {
    let registry = OrderedRegistry::new();
    for tag in [0, -7, 12, -1] {
        registry.insert(Item::new(tag));
    }
    assert_eq!(registry.snapshot(), vec![-7, -1, 0, 12]);
}
