/// Configuration constants for the Agave storage core

/// Maximum number of filesystem instances the mount table can hold
pub const MAX_FS: usize = 4;

/// Number of hash buckets in each ramfs lookup table
pub const RAMFS_HASH_BUCKETS: usize = 64;

/// Log level installed by `klog::init` during boot
pub const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;

/// Size of the in-kernel log ring buffer read back by dmesg
pub const LOG_BUFFER_SIZE: usize = 16 * 1024;

/// Longest single log line kept in the ring buffer
pub const LOG_LINE_MAX: usize = 256;
