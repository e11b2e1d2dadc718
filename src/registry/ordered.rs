/*!
 * Ordered Registry
 * Mutually-exclusive, tag-ordered collection of in-flight items
 */

use super::chain::Chain;
use crate::core::types::{Item, Tag};
use parking_lot::Mutex;

/// Sorted set of items keyed by tag, guarded by one lock
///
/// Every operation takes the same lock for its whole walk. Nothing that
/// borrows the chain escapes the lock: `snapshot` copies the tags out.
///
/// # Example
///
/// ```
/// use sync_pipelines::core::types::Item;
/// use sync_pipelines::OrderedRegistry;
///
/// let registry = OrderedRegistry::new();
/// for tag in [5, 3, 8, 1] {
///     registry.insert(Item::new(tag));
/// }
/// assert_eq!(registry.snapshot(), vec![1, 3, 5, 8]);
///
/// registry.remove(3);
/// registry.remove(99); // missing tag: no-op
/// assert_eq!(registry.snapshot(), vec![1, 5, 8]);
/// ```
#[derive(Debug, Default)]
pub struct OrderedRegistry {
    chain: Mutex<Chain>,
}

impl OrderedRegistry {
    pub fn new() -> Self {
        Self {
            chain: Mutex::new(Chain::new()),
        }
    }

    /// Insert in tag order; O(n) walk
    ///
    /// Returns `false` if an item with the same tag is already registered.
    pub fn insert(&self, item: Item) -> bool {
        self.chain.lock().insert(item)
    }

    /// Remove the item tagged `tag`
    ///
    /// A missing tag is not an error: concurrent removals may race.
    pub fn remove(&self, tag: Tag) -> Option<Item> {
        self.chain.lock().remove(tag)
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.chain.lock().contains(tag)
    }

    pub fn len(&self) -> usize {
        self.chain.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tags in ascending order, copied out under the lock
    pub fn snapshot(&self) -> Vec<Tag> {
        self.chain.lock().tags()
    }
}
