//! Filesystem Error Taxonomy
//!
//! Every VFS and backend operation reports failure through [`FsError`]; success
//! is `Ok`. The shell prints [`status_str`] for each result.

/// Result type for filesystem operations
pub type FsResult<T> = Result<T, FsError>;

/// Filesystem error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FsError {
    /// No such file or directory (or not one of the requested type)
    #[error("no such file or directory")]
    NoEntry,
    /// Missing READ/WRITE permission, or an attempt to remove the root
    #[error("permission denied")]
    PermissionDenied,
    /// Target path is already taken
    #[error("file exists")]
    AlreadyExists,
    /// Operation needs a regular file
    #[error("not a regular file")]
    InvalidType,
    /// Operation needs a directory
    #[error("not a directory")]
    NotDirectory,
    /// Directory still has children
    #[error("directory not empty")]
    DirectoryNotEmpty,
    /// Filesystem is mounted read-only
    #[error("read-only filesystem")]
    ReadOnly,
    /// Allocation failed
    #[error("no space left")]
    NoSpace,
    /// Malformed call: missing backend, empty path, zero-sized output
    #[error("invalid argument")]
    InvalidArgument,
    /// Reserved; never produced by the in-tree backends
    #[error("unknown error")]
    Unknown,
}

impl FsError {
    /// Stable status name shown by the shell
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoEntry => "FILE_NOT_FOUND",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::InvalidType => "INVALID_TYPE",
            Self::NotDirectory => "NOT_A_DIRECTORY",
            Self::DirectoryNotEmpty => "DIRECTORY_NOT_EMPTY",
            Self::ReadOnly => "READ_ONLY",
            Self::NoSpace => "NO_SPACE",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Status name for any filesystem result, `"OK"` on success
pub fn status_str<T>(result: &FsResult<T>) -> &'static str {
    match result {
        Ok(_) => "OK",
        Err(e) => e.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_status_strings() {
        assert_eq!(status_str(&Ok::<(), FsError>(())), "OK");
        assert_eq!(status_str::<()>(&Err(FsError::NoEntry)), "FILE_NOT_FOUND");
        assert_eq!(FsError::NotDirectory.as_str(), "NOT_A_DIRECTORY");
        assert_eq!(FsError::Unknown.as_str(), "UNKNOWN");
    }

    #[test]
    fn test_display_is_human_readable() {
        assert_eq!(FsError::DirectoryNotEmpty.to_string(), "directory not empty");
        assert_eq!(FsError::ReadOnly.to_string(), "read-only filesystem");
    }
}
