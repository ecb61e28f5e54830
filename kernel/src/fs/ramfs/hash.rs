//! Path Hash Index
//!
//! Exact-match lookup by normalized path. Each bucket is a singly linked
//! chain threaded through [`RamfsNode::hash_next`](super::node::RamfsNode);
//! new nodes are pushed at the head of their chain.

use core::iter;

use super::arena::NodeArena;
use super::node::NodeId;
use crate::config::RAMFS_HASH_BUCKETS;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// 32-bit FNV-1a
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Bucket a normalized path hashes to
pub fn bucket_index(path: &str) -> usize {
    fnv1a_32(path.as_bytes()) as usize % RAMFS_HASH_BUCKETS
}

#[derive(Debug)]
pub struct HashIndex {
    buckets: [Option<NodeId>; RAMFS_HASH_BUCKETS],
}

impl HashIndex {
    pub const fn new() -> Self {
        Self {
            buckets: [None; RAMFS_HASH_BUCKETS],
        }
    }

    /// Link `id` at the head of its bucket
    pub fn insert(&mut self, nodes: &mut NodeArena, id: NodeId) {
        let bucket = bucket_index(&nodes[id].path);
        nodes[id].hash_next = self.buckets[bucket];
        self.buckets[bucket] = Some(id);
    }

    /// Unlink `id` from its bucket; returns false if it was not indexed
    pub fn remove(&mut self, nodes: &mut NodeArena, id: NodeId) -> bool {
        let bucket = bucket_index(&nodes[id].path);
        let mut prev: Option<NodeId> = None;
        let mut cursor = self.buckets[bucket];

        while let Some(current) = cursor {
            if current == id {
                let next = nodes[current].hash_next.take();
                match prev {
                    Some(prev) => nodes[prev].hash_next = next,
                    None => self.buckets[bucket] = next,
                }
                return true;
            }
            prev = Some(current);
            cursor = nodes[current].hash_next;
        }
        false
    }

    pub fn lookup(&self, nodes: &NodeArena, path: &str) -> Option<NodeId> {
        self.chain(nodes, bucket_index(path))
            .find(|&id| nodes[id].path == path)
    }

    /// Nodes chained in one bucket, head first
    pub fn chain<'a>(&self, nodes: &'a NodeArena, bucket: usize) -> impl Iterator<Item = NodeId> + 'a {
        iter::successors(self.buckets[bucket], move |&id| nodes[id].hash_next)
    }

    pub fn clear(&mut self) {
        self.buckets = [None; RAMFS_HASH_BUCKETS];
    }
}

impl Default for HashIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::ramfs::node::RamfsNode;
    use crate::fs::vfs::metadata::{FileType, Permissions};
    use alloc::string::String;
    use alloc::vec::Vec;

    fn node(path: &str) -> RamfsNode {
        RamfsNode::new(String::from(path), FileType::Regular, Permissions::DEFAULT_FILE, Vec::new())
    }

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a_32(b""), 0x811c_9dc5);
        assert_eq!(fnv1a_32(b"a"), 0xe40c_292c);
        assert_eq!(fnv1a_32(b"foobar"), 0xbf9c_f968);
    }

    #[test]
    fn test_bucket_index_in_range() {
        for path in ["/", "/a", "/docs/notes.txt"] {
            assert!(bucket_index(path) < RAMFS_HASH_BUCKETS);
        }
        assert_eq!(bucket_index("/"), fnv1a_32(b"/") as usize % 64);
    }

    #[test]
    fn test_insert_lookup_remove() {
        let mut nodes = NodeArena::new();
        let mut index = HashIndex::new();
        let a = nodes.insert(node("/a")).expect("insert");
        let b = nodes.insert(node("/b")).expect("insert");
        index.insert(&mut nodes, a);
        index.insert(&mut nodes, b);

        assert_eq!(index.lookup(&nodes, "/a"), Some(a));
        assert_eq!(index.lookup(&nodes, "/b"), Some(b));
        assert_eq!(index.lookup(&nodes, "/c"), None);

        assert!(index.remove(&mut nodes, a));
        assert!(!index.remove(&mut nodes, a));
        assert_eq!(index.lookup(&nodes, "/a"), None);
        assert_eq!(index.lookup(&nodes, "/b"), Some(b));
    }

    #[test]
    fn test_colliding_paths_share_a_chain() {
        let mut nodes = NodeArena::new();
        let mut index = HashIndex::new();

        // Find three paths landing in the same bucket
        let target = bucket_index("/f0");
        let paths: Vec<String> = (0..)
            .map(|i| alloc::format!("/f{}", i))
            .filter(|p| bucket_index(p) == target)
            .take(3)
            .collect();

        let ids: Vec<NodeId> = paths
            .iter()
            .map(|p| {
                let id = nodes.insert(node(p)).expect("insert");
                index.insert(&mut nodes, id);
                id
            })
            .collect();

        let chain: Vec<_> = index.chain(&nodes, target).collect();
        assert_eq!(chain, [ids[2], ids[1], ids[0]]);

        // Unlink from the middle of the chain
        assert!(index.remove(&mut nodes, ids[1]));
        let chain: Vec<_> = index.chain(&nodes, target).collect();
        assert_eq!(chain, [ids[2], ids[0]]);
        assert_eq!(index.lookup(&nodes, &paths[0]), Some(ids[0]));
    }
}
