//! Path Normalization
//!
//! Paths are plain strings. Every node is keyed by its normalized absolute
//! path: a single leading `/`, segments joined by one `/`, no trailing `/`
//! except for the root itself.
//!
//! `.` and `..` are ordinary names here; nothing is resolved.

use alloc::string::String;

/// Root path
pub const ROOT: &str = "/";

/// Normalize an arbitrary path
///
/// Leading, trailing and repeated slashes collapse; an empty or all-slash
/// input becomes `/`.
pub fn normalize(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 1);
    normalized.push('/');

    for (i, segment) in path.split('/').filter(|s| !s.is_empty()).enumerate() {
        if i > 0 {
            normalized.push('/');
        }
        normalized.push_str(segment);
    }

    normalized
}

/// Check whether a path is already in normalized form
pub fn is_normalized(path: &str) -> bool {
    if path == ROOT {
        return true;
    }
    path.starts_with('/') && !path.ends_with('/') && !path.contains("//")
}

/// Split a normalized path into (parent_path, name)
///
/// Returns `None` when the path has no separator at all.
pub fn split_parent(path: &str) -> Option<(&str, &str)> {
    let pos = path.rfind('/')?;
    let parent = if pos == 0 { ROOT } else { &path[..pos] };
    Some((parent, &path[pos + 1..]))
}

/// Final segment of a normalized path (`""` for the root)
pub fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}
