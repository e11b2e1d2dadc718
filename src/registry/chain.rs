/*!
 * Tag Chain
 * Singly-linked ascending chain stored in an index arena
 *
 * Nodes live in a `Vec` and link to each other by slot index. Removed slots
 * go on a free list and are reused by later inserts, so an insert/remove
 * workload of bounded width never grows the arena.
 */

use crate::core::types::{Item, Tag};

/// Index of a node slot in the arena
type NodeId = usize;

#[derive(Debug, Clone, Copy)]
struct RegistryNode {
    item: Item,
    next: Option<NodeId>,
}

/// Unsynchronized chain; `OrderedRegistry` wraps it in a single lock
#[derive(Debug, Default)]
pub(super) struct Chain {
    /// Slots on the free list hold stale nodes that are never linked
    nodes: Vec<RegistryNode>,
    free: Vec<NodeId>,
    head: Option<NodeId>,
    len: usize,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Splice `item` before the first node whose tag is >= its tag
    ///
    /// Returns `false` without modifying the chain if the tag is present.
    pub fn insert(&mut self, item: Item) -> bool {
        let (prev, cursor) = self.seek(item.tag);

        if let Some(id) = cursor {
            if self.nodes[id].item.tag == item.tag {
                return false;
            }
        }

        let id = self.alloc(RegistryNode { item, next: cursor });
        match prev {
            Some(prev) => self.nodes[prev].next = Some(id),
            None => self.head = Some(id),
        }
        self.len += 1;
        true
    }

    /// Unlink the node tagged `tag`, returning its item
    pub fn remove(&mut self, tag: Tag) -> Option<Item> {
        let (prev, cursor) = self.seek(tag);
        let id = cursor.filter(|&id| self.nodes[id].item.tag == tag)?;

        let node = self.nodes[id];
        match prev {
            Some(prev) => self.nodes[prev].next = node.next,
            None => self.head = node.next,
        }
        self.free.push(id);
        self.len -= 1;
        Some(node.item)
    }

    pub fn contains(&self, tag: Tag) -> bool {
        matches!(self.seek(tag), (_, Some(id)) if self.nodes[id].item.tag == tag)
    }

    /// Tags in chain order
    pub fn tags(&self) -> Vec<Tag> {
        let mut tags = Vec::with_capacity(self.len);
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            tags.push(node.item.tag);
            cursor = node.next;
        }
        tags
    }

    /// Arena slots ever allocated (linked + free)
    #[cfg(test)]
    pub fn slots(&self) -> usize {
        self.nodes.len()
    }

    /// Walk to the first node with tag >= `tag`
    ///
    /// Returns (last node with a smaller tag, first node with tag >= `tag`).
    fn seek(&self, tag: Tag) -> (Option<NodeId>, Option<NodeId>) {
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            if node.item.tag >= tag {
                break;
            }
            prev = Some(id);
            cursor = node.next;
        }
        (prev, cursor)
    }

    fn alloc(&mut self, node: RegistryNode) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }
}
