//! RAMFS Directory Operations

use alloc::string::String;
use alloc::vec::Vec;

use super::node::RamfsNode;
use super::store::RamfsStore;
use crate::fs::vfs::error::{FsError, FsResult};
use crate::fs::vfs::metadata::{FileType, Permissions};
use crate::fs::vfs::path::ROOT;

impl RamfsStore {
    /// Create a directory; the parent must exist and be writable
    pub fn make_directory(&mut self, path: &str) -> FsResult<()> {
        let (path, existing) = self.resolve(path);
        if existing.is_some() {
            return Err(FsError::AlreadyExists);
        }

        let parent = self.parent_of(&path)?;
        self.nodes[parent].require(Permissions::WRITE)?;

        let node = RamfsNode::new(path, FileType::Directory, Permissions::DEFAULT_DIR, Vec::new());
        let id = self.attach(node, parent)?;
        log::trace!(target: "ramfs", "created directory {}", self.nodes[id].path);
        Ok(())
    }

    /// Remove an empty directory; the root is never removable
    pub fn remove_directory(&mut self, path: &str) -> FsResult<()> {
        let (path, id) = self.resolve(path);
        if path == ROOT {
            return Err(FsError::PermissionDenied);
        }

        let id = id.ok_or(FsError::NoEntry)?;
        let node = &self.nodes[id];
        if !node.is_directory() {
            return Err(FsError::NotDirectory);
        }
        if node.first_child.is_some() {
            return Err(FsError::DirectoryNotEmpty);
        }
        node.require(Permissions::WRITE)?;

        self.detach(id);
        log::trace!(target: "ramfs", "removed directory {}", path);
        Ok(())
    }

    /// `Ok(true)` for a directory, `NoEntry` for anything else
    pub fn directory_exists(&self, path: &str) -> FsResult<bool> {
        match self.resolve(path).1 {
            Some(id) if self.nodes[id].is_directory() => Ok(true),
            _ => Err(FsError::NoEntry),
        }
    }

    /// Total bytes of every regular file below `path`
    pub fn directory_size(&self, path: &str) -> FsResult<usize> {
        let (_, id) = self.resolve(path);
        let id = id.ok_or(FsError::NoEntry)?;
        let node = &self.nodes[id];
        if !node.is_directory() {
            return Err(FsError::NotDirectory);
        }
        node.require(Permissions::READ)?;

        let mut total = 0usize;
        let mut pending = Vec::from([id]);
        while let Some(dir) = pending.pop() {
            for child in self.children(dir) {
                let child_node = &self.nodes[child];
                if child_node.is_regular() {
                    total += child_node.data.len();
                } else if child_node.is_directory() {
                    pending.push(child);
                }
            }
        }
        Ok(total)
    }

    /// Base names of at most `max_entries` children, newest first
    pub fn list_directory(&self, path: &str, max_entries: usize) -> FsResult<Vec<String>> {
        let (_, id) = self.resolve(path);
        let id = id.ok_or(FsError::NoEntry)?;
        let node = &self.nodes[id];
        if !node.is_directory() {
            return Err(FsError::NotDirectory);
        }
        node.require(Permissions::READ)?;

        let count = self.children(id).take(max_entries).count();
        let mut names = Vec::new();
        names.try_reserve_exact(count).map_err(|_| FsError::NoSpace)?;

        for child in self.children(id).take(count) {
            let name = self.nodes[child].name();
            let mut entry = String::new();
            entry.try_reserve_exact(name.len()).map_err(|_| FsError::NoSpace)?;
            entry.push_str(name);
            names.push(entry);
        }
        Ok(names)
    }
}
