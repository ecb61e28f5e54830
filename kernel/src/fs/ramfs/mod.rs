//! RAM Filesystem
//!
//! Volatile in-memory filesystem used as the kernel's boot filesystem.
//! Features:
//! - Path-keyed nodes held in a slot arena, linked into a directory tree
//! - O(1) average lookup through a 64-bucket FNV-1a hash index
//! - Per-node READ/WRITE/EXECUTE bits checked on every operation
//! - Running byte counter kept equal to the sum of file sizes

pub mod arena;
pub mod attr;
pub mod dir;
pub mod file;
pub mod hash;
pub mod node;
pub mod store;
pub mod super_impl;

pub use node::{NodeId, RamfsNode};
pub use store::{Inconsistency, RamfsStore};
pub use super_impl::{RamfsType, RAMFS};
