//! RAMFS File Operations

use alloc::vec::Vec;

use super::node::RamfsNode;
use super::store::RamfsStore;
use crate::fs::vfs::error::{FsError, FsResult};
use crate::fs::vfs::metadata::{FileType, Permissions};
use crate::fs::vfs::path::ROOT;

/// Copy `data` into a fresh buffer, reporting allocation failure
fn copy_buffer(data: &[u8]) -> FsResult<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(data.len())
        .map_err(|_| FsError::NoSpace)?;
    buffer.extend_from_slice(data);
    Ok(buffer)
}

impl RamfsStore {
    /// Create a regular file
    ///
    /// The low nibble of `metadata` is the permission set; zero means
    /// read-write. The parent directory must exist and be writable.
    pub fn add_file(&mut self, path: &str, data: &[u8], metadata: u8) -> FsResult<()> {
        let (path, existing) = self.resolve(path);
        if path == ROOT {
            return Err(FsError::InvalidArgument);
        }
        if existing.is_some() {
            return Err(FsError::AlreadyExists);
        }

        let parent = self.parent_of(&path)?;
        self.nodes[parent].require(Permissions::WRITE)?;

        let mut perms = Permissions::from_metadata(metadata);
        if perms.is_empty() {
            perms = Permissions::DEFAULT_FILE;
        }

        let buffer = copy_buffer(data)?;
        let node = RamfsNode::new(path, FileType::Regular, perms, buffer);
        let id = self.attach(node, parent)?;
        self.total_size += data.len();

        log::trace!(target: "ramfs", "created {} ({} bytes)", self.nodes[id].path, data.len());
        Ok(())
    }

    /// Borrow the contents of a regular file
    pub fn read_file(&self, path: &str) -> FsResult<&[u8]> {
        let (_, id) = self.resolve(path);
        let node = &self.nodes[id.ok_or(FsError::NoEntry)?];
        if !node.is_regular() {
            return Err(FsError::InvalidType);
        }
        node.require(Permissions::READ)?;
        Ok(&node.data)
    }

    /// Replace the contents of a regular file
    ///
    /// Only the file's own WRITE bit is checked. On allocation failure the
    /// old contents are left in place.
    pub fn write_file(&mut self, path: &str, data: &[u8]) -> FsResult<()> {
        let (_, id) = self.resolve(path);
        let id = id.ok_or(FsError::NoEntry)?;
        let node = &self.nodes[id];
        if !node.is_regular() {
            return Err(FsError::InvalidType);
        }
        node.require(Permissions::WRITE)?;

        let buffer = copy_buffer(data)?;
        let old = core::mem::replace(&mut self.nodes[id].data, buffer);
        self.total_size = self.total_size.saturating_sub(old.len()) + data.len();
        Ok(())
    }

    /// Delete a regular file; needs WRITE on the file itself
    pub fn remove_file(&mut self, path: &str) -> FsResult<()> {
        let (path, id) = self.resolve(path);
        let id = id.ok_or(FsError::NoEntry)?;
        let node = &self.nodes[id];
        if !node.is_regular() {
            return Err(FsError::InvalidType);
        }
        node.require(Permissions::WRITE)?;

        if let Some(node) = self.detach(id) {
            self.total_size = self.total_size.saturating_sub(node.data.len());
        }
        log::trace!(target: "ramfs", "removed {}", path);
        Ok(())
    }

    /// `Ok(true)` for a regular file, `NoEntry` for anything else
    pub fn file_exists(&self, path: &str) -> FsResult<bool> {
        match self.resolve(path).1 {
            Some(id) if self.nodes[id].is_regular() => Ok(true),
            _ => Err(FsError::NoEntry),
        }
    }

    pub fn file_size(&self, path: &str) -> FsResult<usize> {
        let (_, id) = self.resolve(path);
        let node = &self.nodes[id.ok_or(FsError::NoEntry)?];
        if !node.is_regular() {
            return Err(FsError::InvalidType);
        }
        node.require(Permissions::READ)?;
        Ok(node.data.len())
    }
}
