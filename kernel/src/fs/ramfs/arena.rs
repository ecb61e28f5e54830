//! Node Arena
//!
//! Slot storage for every node of one RAMFS instance. Freed slots are
//! recycled through a free list, so a [`NodeId`] is only meaningful while its
//! node is alive. Indexing with a stale handle is a kernel bug and aborts.

use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use super::node::{NodeId, RamfsNode};
use crate::fs::vfs::error::{FsError, FsResult};

#[derive(Debug, Default)]
pub struct NodeArena {
    slots: Vec<Option<RamfsNode>>,
    free: Vec<NodeId>,
    live: usize,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a node, reusing a free slot when there is one
    pub fn insert(&mut self, node: RamfsNode) -> FsResult<NodeId> {
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id.index()] = Some(node);
                id
            }
            None => {
                let id = NodeId::from_index(self.slots.len())?;
                self.slots.try_reserve(1).map_err(|_| FsError::NoSpace)?;
                // Keep room for every slot on the free list so `remove` never allocates
                let wanted = self.slots.len() + 1 - self.free.len();
                self.free.try_reserve(wanted).map_err(|_| FsError::NoSpace)?;
                self.slots.push(Some(node));
                id
            }
        };
        self.live += 1;
        Ok(id)
    }

    /// Take a node out of the arena, freeing its slot
    pub fn remove(&mut self, id: NodeId) -> Option<RamfsNode> {
        let node = self.slots.get_mut(id.index())?.take()?;
        self.free.push(id);
        self.live -= 1;
        Some(node)
    }

    pub fn get(&self, id: NodeId) -> Option<&RamfsNode> {
        self.slots.get(id.index())?.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut RamfsNode> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Every live node in slot order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &RamfsNode)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| Some((NodeId::from_index(index).ok()?, slot.as_ref()?)))
    }

    /// Drop every node and release the slot storage
    pub fn clear(&mut self) {
        self.slots = Vec::new();
        self.free = Vec::new();
        self.live = 0;
    }
}

impl Index<NodeId> for NodeArena {
    type Output = RamfsNode;

    fn index(&self, id: NodeId) -> &RamfsNode {
        self.get(id)
            .unwrap_or_else(|| crate::kpanic!("ramfs: stale node handle {:?}", id))
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut RamfsNode {
        match self.get_mut(id) {
            Some(node) => node,
            None => crate::kpanic!("ramfs: stale node handle {:?}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::vfs::metadata::{FileType, Permissions};
    use alloc::string::String;

    fn file(path: &str) -> RamfsNode {
        RamfsNode::new(String::from(path), FileType::Regular, Permissions::DEFAULT_FILE, Vec::new())
    }

    #[test]
    fn test_insert_and_remove() {
        let mut arena = NodeArena::new();
        let a = arena.insert(file("/a")).expect("insert");
        let b = arena.insert(file("/b")).expect("insert");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena[b].path, "/b");

        let removed = arena.remove(a).expect("live node");
        assert_eq!(removed.path, "/a");
        assert_eq!(arena.len(), 1);
        assert!(!arena.contains(a));
        assert!(arena.remove(a).is_none());
    }

    #[test]
    fn test_freed_slot_is_reused() {
        let mut arena = NodeArena::new();
        let a = arena.insert(file("/a")).expect("insert");
        arena.insert(file("/b")).expect("insert");
        arena.remove(a);

        let c = arena.insert(file("/c")).expect("insert");
        assert_eq!(c, a);
        assert_eq!(arena[c].path, "/c");
    }

    #[test]
    fn test_iter_skips_free_slots() {
        let mut arena = NodeArena::new();
        let a = arena.insert(file("/a")).expect("insert");
        arena.insert(file("/b")).expect("insert");
        arena.remove(a);

        let paths: Vec<_> = arena.iter().map(|(_, node)| node.path.as_str()).collect();
        assert_eq!(paths, ["/b"]);
    }

    #[test]
    #[should_panic(expected = "stale node handle")]
    fn test_stale_handle_aborts() {
        let mut arena = NodeArena::new();
        let a = arena.insert(file("/a")).expect("insert");
        arena.remove(a);
        let _ = &arena[a];
    }
}
