//! VFS Dispatch
//!
//! Uniform file operations on a [`Filesystem`]. Every call is validated
//! here before it reaches the backend:
//!
//! 1. the instance must still have backend state (`InvalidArgument`)
//! 2. mutating calls are refused on a read-only instance (`ReadOnly`)
//! 3. the path must be non-empty, except where an empty path means the
//!    root (`add_file`, `make_directory`, `remove_directory`,
//!    `directory_exists`)
//!
//! Backend status codes are passed through unchanged.

use alloc::string::String;
use alloc::vec::Vec;

use super::backend::{FsBackend, FsStats};
use super::error::{FsError, FsResult};
use super::metadata::{Metadata, Permissions};
use super::mount::Filesystem;

/// Whether an operation accepts an empty path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmptyPath {
    Allowed,
    Rejected,
}

impl EmptyPath {
    fn check(self, path: &str) -> FsResult<()> {
        if self == EmptyPath::Rejected && path.is_empty() {
            return Err(FsError::InvalidArgument);
        }
        Ok(())
    }
}

impl Filesystem {
    fn backend(&self) -> FsResult<&(dyn FsBackend + 'static)> {
        self.backend.as_deref().ok_or(FsError::InvalidArgument)
    }

    fn log_failure(&self, op: &str, path: &str, err: FsError) {
        log::debug!(target: "vfs", "{}: {} '{}': {}", self.name(), op, path, err.as_str());
    }

    fn validated<'a, T>(
        &'a self,
        path: &str,
        empty: EmptyPath,
        call: impl FnOnce(&'a (dyn FsBackend + 'static)) -> FsResult<T>,
    ) -> FsResult<T> {
        self.backend().and_then(|backend| {
            empty.check(path)?;
            call(backend)
        })
    }

    /// Run a non-mutating backend call after validation
    fn query<'a, T>(
        &'a self,
        op: &'static str,
        path: &str,
        empty: EmptyPath,
        call: impl FnOnce(&'a (dyn FsBackend + 'static)) -> FsResult<T>,
    ) -> FsResult<T> {
        let result = self.validated(path, empty, call);
        if let Err(e) = result {
            self.log_failure(op, path, e);
        }
        result
    }

    /// Existence check; `NoEntry` is the ordinary negative answer and stays quiet
    fn exists(
        &self,
        op: &'static str,
        path: &str,
        empty: EmptyPath,
        call: impl FnOnce(&(dyn FsBackend + 'static)) -> FsResult<bool>,
    ) -> FsResult<bool> {
        let result = self.validated(path, empty, call);
        match result {
            Err(FsError::NoEntry) | Ok(_) => {}
            Err(e) => self.log_failure(op, path, e),
        }
        result
    }

    /// Run a mutating backend call after validation
    fn update(
        &mut self,
        op: &'static str,
        path: &str,
        empty: EmptyPath,
        call: impl FnOnce(&mut (dyn FsBackend + 'static)) -> FsResult<()>,
    ) -> FsResult<()> {
        let readonly = self.is_readonly();
        let result = match self.backend.as_deref_mut() {
            None => Err(FsError::InvalidArgument),
            Some(_) if readonly => Err(FsError::ReadOnly),
            Some(backend) => empty.check(path).and_then(|()| call(backend)),
        };
        if let Err(e) = result {
            self.log_failure(op, path, e);
        }
        result
    }

    // Files

    /// Create a regular file holding a copy of `data`
    pub fn add_file(&mut self, path: &str, data: &[u8], metadata: u8) -> FsResult<()> {
        self.update("add_file", path, EmptyPath::Allowed, |fs| {
            fs.add_file(path, data, metadata)
        })
    }

    /// Borrow a file's contents; valid until the next mutation
    pub fn read_file(&self, path: &str) -> FsResult<&[u8]> {
        self.query("read_file", path, EmptyPath::Rejected, |fs| fs.read_file(path))
    }

    pub fn remove_file(&mut self, path: &str) -> FsResult<()> {
        self.update("remove_file", path, EmptyPath::Rejected, |fs| fs.remove_file(path))
    }

    /// Replace a file's contents
    pub fn write_file(&mut self, path: &str, data: &[u8]) -> FsResult<()> {
        self.update("write_file", path, EmptyPath::Rejected, |fs| {
            fs.write_file(path, data)
        })
    }

    pub fn file_exists(&self, path: &str) -> FsResult<bool> {
        self.exists("file_exists", path, EmptyPath::Rejected, |fs| fs.file_exists(path))
    }

    pub fn file_size(&self, path: &str) -> FsResult<usize> {
        self.query("file_size", path, EmptyPath::Rejected, |fs| fs.file_size(path))
    }

    // Directories

    pub fn make_directory(&mut self, path: &str) -> FsResult<()> {
        self.update("make_directory", path, EmptyPath::Allowed, |fs| {
            fs.make_directory(path)
        })
    }

    pub fn remove_directory(&mut self, path: &str) -> FsResult<()> {
        self.update("remove_directory", path, EmptyPath::Allowed, |fs| {
            fs.remove_directory(path)
        })
    }

    pub fn directory_exists(&self, path: &str) -> FsResult<bool> {
        self.exists("directory_exists", path, EmptyPath::Allowed, |fs| {
            fs.directory_exists(path)
        })
    }

    /// Recursive size of every regular file below `path`
    pub fn directory_size(&self, path: &str) -> FsResult<usize> {
        self.query("directory_size", path, EmptyPath::Rejected, |fs| {
            fs.directory_size(path)
        })
    }

    /// Names of at most `max_entries` immediate children of `path`
    ///
    /// `max_entries` of zero is rejected with `InvalidArgument`.
    pub fn list_directory(&self, path: &str, max_entries: usize) -> FsResult<Vec<String>> {
        self.query("list_directory", path, EmptyPath::Rejected, |fs| {
            if max_entries == 0 {
                return Err(FsError::InvalidArgument);
            }
            fs.list_directory(path, max_entries)
        })
    }

    // Metadata

    pub fn get_metadata(&self, path: &str) -> FsResult<Metadata> {
        self.query("get_metadata", path, EmptyPath::Rejected, |fs| {
            fs.get_file_metadata(path)
        })
    }

    pub fn set_permissions(&mut self, path: &str, perms: Permissions) -> FsResult<()> {
        self.update("set_permissions", path, EmptyPath::Rejected, |fs| {
            fs.set_file_permissions(path, perms)
        })
    }

    pub fn get_permissions(&self, path: &str) -> FsResult<Permissions> {
        self.query("get_permissions", path, EmptyPath::Rejected, |fs| {
            fs.get_file_permissions(path)
        })
    }

    /// Space accounting of the backend
    pub fn stat_fs(&self) -> FsResult<FsStats> {
        self.backend().map(|fs| fs.statfs())
    }
}
