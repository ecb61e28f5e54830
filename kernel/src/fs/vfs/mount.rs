//! Mount Table
//!
//! The mount table is the registry of live filesystem instances, in mount
//! order, and the record of which one is the kernel's primary (active)
//! filesystem. Boot code owns one table and drives its lifecycle:
//! `initialize` → `mount_all` → (`switch_primary`) → `shutdown_all`.
//!
//! Registration problems (table full, backend missing an operation, backend
//! refusing to start) are configuration errors and abort the kernel.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::backend::{BackendOps, FsBackend, FsType};
use super::error::{FsError, FsResult};
use crate::config::MAX_FS;

bitflags::bitflags! {
    /// Per-instance state flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FsFlags: u8 {
        const READONLY = 0x01;
        const MOUNTED = 0x02;
        const PRIMARY = 0x04;
    }
}

/// A registered filesystem instance
pub struct Filesystem {
    /// Instance name used by `switch_primary` and the shell
    name: String,
    /// Implementation this instance was created from
    fs_type: &'static dyn FsType,
    /// Backend state; `None` once destroyed
    pub(super) backend: Option<Box<dyn FsBackend>>,
    flags: FsFlags,
}

impl Filesystem {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fs_type(&self) -> &'static str {
        self.fs_type.name()
    }

    pub fn flags(&self) -> FsFlags {
        self.flags
    }

    pub fn is_mounted(&self) -> bool {
        self.flags.contains(FsFlags::MOUNTED)
    }

    pub fn is_readonly(&self) -> bool {
        self.flags.contains(FsFlags::READONLY)
    }

    pub fn is_primary(&self) -> bool {
        self.flags.contains(FsFlags::PRIMARY)
    }

    /// Flip the read-only flag (remount)
    pub fn set_readonly(&mut self, readonly: bool) {
        self.flags.set(FsFlags::READONLY, readonly);
        log::info!(
            target: "vfs",
            "remounted '{}' {}",
            self.name,
            if readonly { "read-only" } else { "read-write" }
        );
    }
}

impl fmt::Debug for Filesystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filesystem")
            .field("name", &self.name)
            .field("type", &self.fs_type.name())
            .field("flags", &self.flags)
            .field("live", &self.backend.is_some())
            .finish()
    }
}

/// Registry of filesystem instances
#[derive(Debug)]
pub struct MountTable {
    instances: Vec<Filesystem>,
    /// Index of the PRIMARY instance
    primary: Option<usize>,
}

impl MountTable {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(MAX_FS),
            primary: None,
        }
    }

    /// Register and create a new filesystem instance
    ///
    /// # Arguments
    /// * `name` - Instance name
    /// * `fs_type` - Backend implementation
    /// * `flags` - Initial flags; `PRIMARY` makes it the active filesystem.
    ///   `MOUNTED` is ignored, it is only set by `mount_all`.
    ///
    /// Aborts if the table is full, the backend lacks an operation, or the
    /// backend fails to create its state.
    pub fn initialize(
        &mut self,
        name: &str,
        fs_type: &'static dyn FsType,
        flags: FsFlags,
    ) -> &mut Filesystem {
        if self.instances.len() >= MAX_FS {
            crate::kpanic!("too many filesystems mounted (max {})", MAX_FS);
        }

        if let Some(missing) = fs_type.supported_ops().first_missing() {
            crate::kpanic!(
                "filesystem backend for '{}' missing method: {}",
                name,
                missing.to_ascii_lowercase()
            );
        }

        let backend = match fs_type.create() {
            Ok(backend) => backend,
            Err(e) => crate::kpanic!(
                "failed to initialize filesystem backend for '{}': {}",
                name,
                e
            ),
        };

        let index = self.instances.len();
        self.instances.push(Filesystem {
            name: String::from(name),
            fs_type,
            backend: Some(backend),
            flags: flags.difference(FsFlags::MOUNTED),
        });

        log::info!(
            target: "vfs",
            "registered '{}' ({}) flags={:?}",
            name,
            fs_type.name(),
            flags
        );

        if flags.contains(FsFlags::PRIMARY) {
            self.set_primary(index);
        }

        &mut self.instances[index]
    }

    /// Mount every registered instance in registration order
    pub fn mount_all(&mut self) {
        if self.instances.is_empty() {
            crate::kpanic!("no filesystems initialized to mount");
        }

        for fs in self.instances.iter_mut() {
            if !fs.fs_type.supported_ops().contains(BackendOps::MOUNT) {
                crate::kpanic!("filesystem backend for '{}' does not support mounting", fs.name);
            }
            let Some(backend) = fs.backend.as_deref_mut() else {
                crate::kpanic!("filesystem '{}' has no backend state to mount", fs.name);
            };

            backend.mount();
            fs.flags.insert(FsFlags::MOUNTED);
            log::info!(target: "vfs", "mounted '{}' ({})", fs.name, fs.fs_type.name());
        }
    }

    /// Unmount one instance by name; its state stays alive until shutdown
    pub fn unmount(&mut self, name: &str) -> FsResult<()> {
        let fs = self.get_mut(name).ok_or(FsError::NoEntry)?;
        if !fs.is_mounted() {
            return Ok(());
        }

        let backend = fs.backend.as_deref_mut().ok_or(FsError::InvalidArgument)?;
        backend.unmount();
        fs.flags.remove(FsFlags::MOUNTED);
        log::info!(target: "vfs", "unmounted '{}'", fs.name);
        Ok(())
    }

    /// Make `name` the primary filesystem
    ///
    /// Aborts if no instance has that name.
    pub fn switch_primary(&mut self, name: &str) {
        match self.instances.iter().position(|fs| fs.name == name) {
            Some(index) => self.set_primary(index),
            None => crate::kpanic!("filesystem '{}' not found to switch primary", name),
        }
    }

    fn set_primary(&mut self, index: usize) {
        for fs in self.instances.iter_mut() {
            fs.flags.remove(FsFlags::PRIMARY);
        }
        self.instances[index].flags.insert(FsFlags::PRIMARY);
        self.primary = Some(index);
        log::info!(target: "vfs", "primary filesystem is now '{}'", self.instances[index].name);
    }

    /// Destroy every instance and empty the table
    pub fn shutdown_all(&mut self) {
        for mut fs in self.instances.drain(..) {
            if let Some(mut backend) = fs.backend.take() {
                backend.destroy();
            }
            log::info!(target: "vfs", "destroyed '{}'", fs.name);
        }
        self.primary = None;
    }

    /// Registered instances in mount order
    pub fn mounted(&self) -> &[Filesystem] {
        &self.instances
    }

    /// The kernel's active filesystem
    pub fn primary(&self) -> Option<&Filesystem> {
        self.instances.get(self.primary?)
    }

    pub fn primary_mut(&mut self) -> Option<&mut Filesystem> {
        let index = self.primary?;
        self.instances.get_mut(index)
    }

    pub fn get(&self, name: &str) -> Option<&Filesystem> {
        self.instances.iter().find(|fs| fs.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Filesystem> {
        self.instances.iter_mut().find(|fs| fs.name == name)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl Default for MountTable {
    fn default() -> Self {
        Self::new()
    }
}
