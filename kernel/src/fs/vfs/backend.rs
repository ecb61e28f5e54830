//! Backend Contract
//!
//! A storage backend is split the same way as a mounted filesystem:
//! - [`FsType`]: the registered implementation (name, capability set, factory)
//! - [`FsBackend`]: one live instance and its state, created by `FsType::create`
//!
//! All paths handed to a backend are raw caller paths; the backend normalizes.
//! Argument-shape checks and the read-only flag are enforced by the VFS before
//! any backend method runs.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use super::error::FsResult;
use super::metadata::{Metadata, Permissions};

bitflags::bitflags! {
    /// Operations a backend implements
    ///
    /// Checked once when an instance is registered; a backend missing any
    /// of [`BackendOps::REQUIRED`] is a configuration error.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BackendOps: u32 {
        const CREATE = 1 << 0;
        const DESTROY = 1 << 1;
        const MOUNT = 1 << 2;
        const UNMOUNT = 1 << 3;
        const ADD_FILE = 1 << 4;
        const READ_FILE = 1 << 5;
        const REMOVE_FILE = 1 << 6;
        const WRITE_FILE = 1 << 7;
        const FILE_EXISTS = 1 << 8;
        const FILE_SIZE = 1 << 9;
        const MAKE_DIRECTORY = 1 << 10;
        const REMOVE_DIRECTORY = 1 << 11;
        const DIRECTORY_EXISTS = 1 << 12;
        const DIRECTORY_SIZE = 1 << 13;
        const LIST_DIRECTORY = 1 << 14;
        const GET_FILE_METADATA = 1 << 15;
        const SET_FILE_PERMISSIONS = 1 << 16;
        const GET_FILE_PERMISSIONS = 1 << 17;

        const REQUIRED = (1 << 18) - 1;
    }
}

impl BackendOps {
    /// Contract name of the first operation missing from `self`
    pub fn first_missing(self) -> Option<&'static str> {
        let missing = BackendOps::REQUIRED.difference(self);
        missing
            .iter_names()
            .find(|(name, _)| *name != "REQUIRED")
            .map(|(name, _)| name)
    }
}

/// Space accounting reported by a backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FsStats {
    /// Bytes held by regular files
    pub used_bytes: usize,
    /// Live nodes, root included
    pub nodes: usize,
}

/// Filesystem type: registration name, capability set and instance factory
pub trait FsType: Send + Sync {
    /// Returns the filesystem type name (e.g., "ramfs")
    fn name(&self) -> &'static str;

    /// Operations this backend provides
    fn supported_ops(&self) -> BackendOps {
        BackendOps::REQUIRED
    }

    /// Create a fresh, empty instance
    fn create(&self) -> FsResult<Box<dyn FsBackend>>;
}

/// One live backend instance
pub trait FsBackend: Send + Sync {
    // Lifecycle

    /// Release every node and buffer; the instance is dropped afterwards
    fn destroy(&mut self);

    fn mount(&mut self);

    fn unmount(&mut self);

    // Files

    /// Create a regular file holding a copy of `data`
    ///
    /// Only the permission nibble of `metadata` is used; zero means the
    /// backend default.
    fn add_file(&mut self, path: &str, data: &[u8], metadata: u8) -> FsResult<()>;

    /// Borrow a regular file's contents
    fn read_file(&self, path: &str) -> FsResult<&[u8]>;

    fn remove_file(&mut self, path: &str) -> FsResult<()>;

    /// Replace a regular file's contents
    fn write_file(&mut self, path: &str, data: &[u8]) -> FsResult<()>;

    /// `Ok(true)` for an existing regular file, `NoEntry` otherwise
    fn file_exists(&self, path: &str) -> FsResult<bool>;

    fn file_size(&self, path: &str) -> FsResult<usize>;

    // Directories

    fn make_directory(&mut self, path: &str) -> FsResult<()>;

    fn remove_directory(&mut self, path: &str) -> FsResult<()>;

    /// `Ok(true)` for an existing directory, `NoEntry` otherwise
    fn directory_exists(&self, path: &str) -> FsResult<bool>;

    /// Total bytes of all regular files below `path`
    fn directory_size(&self, path: &str) -> FsResult<usize>;

    /// Names of at most `max_entries` immediate children
    fn list_directory(&self, path: &str, max_entries: usize) -> FsResult<Vec<String>>;

    // Metadata

    fn get_file_metadata(&self, path: &str) -> FsResult<Metadata>;

    fn set_file_permissions(&mut self, path: &str, perms: Permissions) -> FsResult<()>;

    fn get_file_permissions(&self, path: &str) -> FsResult<Permissions>;

    /// Space accounting; backends without a counter report zeros
    fn statfs(&self) -> FsStats {
        FsStats::default()
    }
}
