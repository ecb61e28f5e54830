//! Filesystem Support
//!
//! This module contains filesystem implementations and the Virtual File System (VFS) layer.

pub mod ramfs;
pub mod vfs;

use ramfs::RAMFS;
use vfs::{FsFlags, MountTable};

/// Bring up the boot filesystem
///
/// Registers a RAMFS instance named "ramfs" as the primary filesystem and
/// mounts it. Aborts on any registration failure.
pub fn init() -> MountTable {
    log::info!(target: "vfs", "initializing virtual file system");

    let mut table = MountTable::new();
    table.initialize("ramfs", &RAMFS, FsFlags::PRIMARY);
    table.mount_all();

    log::info!(target: "vfs", "virtual file system ready ({} mounted)", table.len());
    table
}
