//! Virtual File System (VFS) Layer
//!
//! This module provides a unified interface for all filesystem operations in Agave.
//! Storage backends implement the [`FsType`]/[`FsBackend`] contract; the
//! [`MountTable`] owns the live instances and every [`Filesystem`] validates
//! calls before forwarding them to its backend.

pub mod backend;
pub mod dispatch;
pub mod error;
pub mod metadata;
pub mod mount;
pub mod path;

// Re-export commonly used items
pub use backend::{BackendOps, FsBackend, FsStats, FsType};
pub use error::{status_str, FsError, FsResult};
pub use metadata::{FileType, Metadata, Permissions};
pub use mount::{Filesystem, FsFlags, MountTable};
