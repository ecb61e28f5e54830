//! RAMFS Node

use alloc::string::String;
use alloc::vec::Vec;

use crate::fs::vfs::error::{FsError, FsResult};
use crate::fs::vfs::metadata::{FileType, Metadata, Permissions};
use crate::fs::vfs::path;

/// Handle to a node slot in a [`NodeArena`](super::arena::NodeArena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(super) fn from_index(index: usize) -> FsResult<Self> {
        u32::try_from(index).map(Self).map_err(|_| FsError::NoSpace)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One file, directory, or symlink
///
/// All links are handles into the owning store's arena. `parent` is a
/// back-reference only; the arena owns every node.
#[derive(Debug)]
pub struct RamfsNode {
    /// Normalized absolute path, also the hash key
    pub path: String,
    /// File contents (regular files only)
    pub data: Vec<u8>,
    pub kind: FileType,
    pub perms: Permissions,
    pub parent: Option<NodeId>,
    /// Head of the child chain (directories only)
    pub first_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    /// Next node in the same hash bucket
    pub hash_next: Option<NodeId>,
}

impl RamfsNode {
    pub fn new(path: String, kind: FileType, perms: Permissions, data: Vec<u8>) -> Self {
        Self {
            path,
            data,
            kind,
            perms,
            parent: None,
            first_child: None,
            next_sibling: None,
            hash_next: None,
        }
    }

    pub fn name(&self) -> &str {
        path::basename(&self.path)
    }

    pub fn metadata(&self) -> Metadata {
        Metadata::new(self.kind, self.perms)
    }

    pub fn is_regular(&self) -> bool {
        self.kind == FileType::Regular
    }

    pub fn is_directory(&self) -> bool {
        self.kind == FileType::Directory
    }

    /// `PermissionDenied` unless every bit of `perm` is set
    pub fn require(&self, perm: Permissions) -> FsResult<()> {
        if self.perms.contains(perm) {
            Ok(())
        } else {
            Err(FsError::PermissionDenied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_metadata_packs_type_and_perms() {
        let node = RamfsNode::new(
            String::from("/docs"),
            FileType::Directory,
            Permissions::DEFAULT_DIR,
            Vec::new(),
        );
        assert_eq!(node.metadata().bits(), 0x17);
        assert_eq!(node.name(), "docs");
        assert!(node.is_directory());
    }

    #[test]
    fn test_require() {
        let node = RamfsNode::new(String::from("/a"), FileType::Regular, Permissions::READ, Vec::new());
        assert_eq!(node.require(Permissions::READ), Ok(()));
        assert_eq!(node.require(Permissions::WRITE), Err(FsError::PermissionDenied));
    }

    #[test]
    fn test_node_id_round_trips_index() {
        assert_eq!(NodeId::from_index(7).map(NodeId::index), Ok(7));
    }
}
