//! RAMFS Store
//!
//! One RAMFS instance: the node arena, the directory tree threaded through
//! it, the path hash index and the running byte counter. Every mutation goes
//! through [`RamfsStore::attach`] and [`RamfsStore::detach`], which keep the
//! three structures in step.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use core::iter;

use super::arena::NodeArena;
use super::hash::{bucket_index, HashIndex};
use super::node::{NodeId, RamfsNode};
use crate::config::RAMFS_HASH_BUCKETS;
use crate::fs::vfs::error::{FsError, FsResult};
use crate::fs::vfs::metadata::{FileType, Permissions};
use crate::fs::vfs::path::{self, ROOT};

/// Invariant violation found by [`RamfsStore::check_consistency`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Inconsistency {
    #[error("dangling node handle {0:?}")]
    Dangling(NodeId),
    #[error("node '{0}' is reachable twice")]
    Cycle(String),
    #[error("node '{0}' has a path that is not normalized")]
    NotNormalized(String),
    #[error("node '{0}' is not findable through the hash index")]
    NotIndexed(String),
    #[error("node '{0}' is chained in the wrong bucket")]
    WrongBucket(String),
    #[error("node '{0}' does not point back to its parent")]
    BrokenParent(String),
    #[error("node '{0}' has children but is not a directory")]
    ChildOfNonDirectory(String),
    #[error("node '{0}' holds data but is not a regular file")]
    DataInNonRegular(String),
    #[error("node '{0}' is allocated but not in the tree")]
    Orphan(String),
    #[error("hash index holds {indexed} nodes, arena holds {live}")]
    IndexCount { indexed: usize, live: usize },
    #[error("total size is {recorded} but files hold {counted} bytes")]
    SizeMismatch { recorded: usize, counted: usize },
}

#[derive(Debug)]
pub struct RamfsStore {
    pub(super) nodes: NodeArena,
    pub(super) index: HashIndex,
    pub(super) root: NodeId,
    /// Sum of regular file sizes
    pub(super) total_size: usize,
}

impl RamfsStore {
    /// Create an empty store holding only the root directory
    pub fn new() -> FsResult<Self> {
        let mut nodes = NodeArena::new();
        let root = nodes.insert(RamfsNode::new(
            String::from(ROOT),
            FileType::Directory,
            Permissions::DEFAULT_DIR,
            Vec::new(),
        ))?;

        let mut index = HashIndex::new();
        index.insert(&mut nodes, root);

        Ok(Self {
            nodes,
            index,
            root,
            total_size: 0,
        })
    }

    /// Find a node by normalized path
    pub fn lookup(&self, path: &str) -> Option<NodeId> {
        self.index.lookup(&self.nodes, path)
    }

    /// Normalize `path` and look it up
    pub(super) fn resolve(&self, path: &str) -> (String, Option<NodeId>) {
        let normalized = path::normalize(path);
        let id = self.lookup(&normalized);
        (normalized, id)
    }

    /// Directory that would hold the normalized `path`
    pub fn parent_of(&self, path: &str) -> FsResult<NodeId> {
        let (parent, _) = path::split_parent(path).ok_or(FsError::NoEntry)?;
        let id = if parent == ROOT {
            self.root
        } else {
            self.lookup(parent).ok_or(FsError::NoEntry)?
        };

        // A released store has no root left to hang new nodes from
        let node = self.nodes.get(id).ok_or(FsError::InvalidArgument)?;
        if !node.is_directory() {
            return Err(FsError::NotDirectory);
        }
        Ok(id)
    }

    /// Link a new node under `parent` and into the hash index
    ///
    /// The node becomes the head of the parent's child chain.
    pub(super) fn attach(&mut self, mut node: RamfsNode, parent: NodeId) -> FsResult<NodeId> {
        node.parent = Some(parent);
        node.next_sibling = self.nodes[parent].first_child;

        let id = self.nodes.insert(node)?;
        self.nodes[parent].first_child = Some(id);
        self.index.insert(&mut self.nodes, id);
        Ok(id)
    }

    /// Unlink a childless node from its parent and the hash index, and free it
    pub(super) fn detach(&mut self, id: NodeId) -> Option<RamfsNode> {
        if let Some(parent) = self.nodes[id].parent {
            let next = self.nodes[id].next_sibling.take();
            if self.nodes[parent].first_child == Some(id) {
                self.nodes[parent].first_child = next;
            } else {
                let prev = self
                    .children(parent)
                    .find(|&child| self.nodes[child].next_sibling == Some(id));
                if let Some(prev) = prev {
                    self.nodes[prev].next_sibling = next;
                }
            }
        }

        self.index.remove(&mut self.nodes, id);
        self.nodes.remove(id)
    }

    /// Immediate children of `dir`, most recently added first
    pub fn children(&self, dir: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(self.nodes[dir].first_child, move |&id| {
            self.nodes[id].next_sibling
        })
    }

    pub fn node(&self, id: NodeId) -> Option<&RamfsNode> {
        self.nodes.get(id)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Bytes held by regular files
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Live nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Free every node, leaving an empty shell
    pub(super) fn release(&mut self) {
        let freed = self.nodes.len();
        self.nodes.clear();
        self.index.clear();
        self.total_size = 0;
        log::debug!(target: "ramfs", "released {} nodes", freed);
    }

    /// Verify that the tree, the hash index and the arena agree
    pub fn check_consistency(&self) -> Result<(), Inconsistency> {
        let mut seen = BTreeSet::new();
        let mut stack = Vec::from([self.root]);
        let mut counted = 0usize;

        while let Some(id) = stack.pop() {
            let node = self.nodes.get(id).ok_or(Inconsistency::Dangling(id))?;
            if !seen.insert(id) {
                return Err(Inconsistency::Cycle(node.path.clone()));
            }
            if !path::is_normalized(&node.path) {
                return Err(Inconsistency::NotNormalized(node.path.clone()));
            }
            if self.lookup(&node.path) != Some(id) {
                return Err(Inconsistency::NotIndexed(node.path.clone()));
            }
            if !node.is_regular() && !node.data.is_empty() {
                return Err(Inconsistency::DataInNonRegular(node.path.clone()));
            }
            if node.is_regular() {
                counted += node.data.len();
            }
            if node.first_child.is_some() && !node.is_directory() {
                return Err(Inconsistency::ChildOfNonDirectory(node.path.clone()));
            }

            let mut cursor = node.first_child;
            while let Some(child) = cursor {
                let child_node = self.nodes.get(child).ok_or(Inconsistency::Dangling(child))?;
                if child_node.parent != Some(id) {
                    return Err(Inconsistency::BrokenParent(child_node.path.clone()));
                }
                if seen.contains(&child) {
                    return Err(Inconsistency::Cycle(child_node.path.clone()));
                }
                stack.push(child);
                cursor = child_node.next_sibling;
            }
        }

        if let Some((_, orphan)) = self.nodes.iter().find(|(id, _)| !seen.contains(id)) {
            return Err(Inconsistency::Orphan(orphan.path.clone()));
        }

        let mut indexed = 0;
        for bucket in 0..RAMFS_HASH_BUCKETS {
            for id in self.index.chain(&self.nodes, bucket) {
                if bucket_index(&self.nodes[id].path) != bucket {
                    return Err(Inconsistency::WrongBucket(self.nodes[id].path.clone()));
                }
                indexed += 1;
                if indexed > self.nodes.len() {
                    return Err(Inconsistency::IndexCount { indexed, live: self.nodes.len() });
                }
            }
        }
        if indexed != self.nodes.len() {
            return Err(Inconsistency::IndexCount { indexed, live: self.nodes.len() });
        }

        if counted != self.total_size {
            return Err(Inconsistency::SizeMismatch {
                recorded: self.total_size,
                counted,
            });
        }
        Ok(())
    }
}
