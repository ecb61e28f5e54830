//! RAMFS Backend Registration
//!
//! [`RamfsType`] is the factory the mount table registers; every instance it
//! creates is an independent [`RamfsStore`].

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use super::store::RamfsStore;
use crate::fs::vfs::backend::{FsBackend, FsStats, FsType};
use crate::fs::vfs::error::FsResult;
use crate::fs::vfs::metadata::{Metadata, Permissions};

/// RAM filesystem type
pub struct RamfsType;

/// Registration handle for boot code
pub static RAMFS: RamfsType = RamfsType;

impl FsType for RamfsType {
    fn name(&self) -> &'static str {
        "ramfs"
    }

    fn create(&self) -> FsResult<Box<dyn FsBackend>> {
        let store = RamfsStore::new()?;
        log::debug!(target: "ramfs", "created instance");
        Ok(Box::new(store))
    }
}

impl FsBackend for RamfsStore {
    fn destroy(&mut self) {
        self.release();
    }

    fn mount(&mut self) {
        log::debug!(target: "ramfs", "mounted ({} nodes)", self.node_count());
    }

    fn unmount(&mut self) {
        log::debug!(target: "ramfs", "unmounted");
    }

    fn add_file(&mut self, path: &str, data: &[u8], metadata: u8) -> FsResult<()> {
        RamfsStore::add_file(self, path, data, metadata)
    }

    fn read_file(&self, path: &str) -> FsResult<&[u8]> {
        RamfsStore::read_file(self, path)
    }

    fn remove_file(&mut self, path: &str) -> FsResult<()> {
        RamfsStore::remove_file(self, path)
    }

    fn write_file(&mut self, path: &str, data: &[u8]) -> FsResult<()> {
        RamfsStore::write_file(self, path, data)
    }

    fn file_exists(&self, path: &str) -> FsResult<bool> {
        RamfsStore::file_exists(self, path)
    }

    fn file_size(&self, path: &str) -> FsResult<usize> {
        RamfsStore::file_size(self, path)
    }

    fn make_directory(&mut self, path: &str) -> FsResult<()> {
        RamfsStore::make_directory(self, path)
    }

    fn remove_directory(&mut self, path: &str) -> FsResult<()> {
        RamfsStore::remove_directory(self, path)
    }

    fn directory_exists(&self, path: &str) -> FsResult<bool> {
        RamfsStore::directory_exists(self, path)
    }

    fn directory_size(&self, path: &str) -> FsResult<usize> {
        RamfsStore::directory_size(self, path)
    }

    fn list_directory(&self, path: &str, max_entries: usize) -> FsResult<Vec<String>> {
        RamfsStore::list_directory(self, path, max_entries)
    }

    fn get_file_metadata(&self, path: &str) -> FsResult<Metadata> {
        RamfsStore::get_file_metadata(self, path)
    }

    fn set_file_permissions(&mut self, path: &str, perms: Permissions) -> FsResult<()> {
        RamfsStore::set_file_permissions(self, path, perms)
    }

    fn get_file_permissions(&self, path: &str) -> FsResult<Permissions> {
        RamfsStore::get_file_permissions(self, path)
    }

    fn statfs(&self) -> FsStats {
        FsStats {
            used_bytes: self.total_size(),
            nodes: self.node_count(),
        }
    }
}
