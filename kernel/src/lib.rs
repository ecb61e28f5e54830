//! Agave kernel storage core
//!
//! Virtual File System dispatch, the mount table, and the in-memory `ramfs`
//! backend, plus the small slice of kernel services they lean on (logging,
//! fatal aborts, the serial console).
//!
//! The crate is `no_std` + `alloc`; host builds of the test suite link `std`.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod kcore;
pub mod klog;
mod panic;
#[cfg(target_arch = "x86_64")]
pub mod serial;

pub mod fs;

pub use fs::vfs::{FsError, FsResult};
