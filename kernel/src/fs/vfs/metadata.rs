//! Node Metadata Byte
//!
//! Each filesystem node carries one packed byte: the low nibble is the
//! permission set, the high nibble is the node type.
//!
//! ```text
//!  7   6   5   4   3   2   1   0
//! +---------------+---+---+---+---+
//! |   type tag    | - | X | W | R |
//! +---------------+---+---+---+---+
//! ```

use core::fmt;

bitflags::bitflags! {
    /// Permission bits (low nibble of the metadata byte)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u8 {
        const READ = 0x01;
        const WRITE = 0x02;
        const EXECUTE = 0x04;
    }
}

impl Permissions {
    /// Default for regular files created without explicit permissions
    pub const DEFAULT_FILE: Self = Self::READ.union(Self::WRITE);
    /// Default for new directories
    pub const DEFAULT_DIR: Self = Self::READ.union(Self::WRITE).union(Self::EXECUTE);

    /// Permission nibble of a raw metadata byte
    ///
    /// Unassigned bit 3 is carried along so a caller's nibble round-trips.
    pub const fn from_metadata(raw: u8) -> Self {
        Self::from_bits_retain(raw & Metadata::PERM_MASK)
    }
}

/// Node type (high nibble of the metadata byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FileType {
    Regular = 0x0,
    Directory = 0x1,
    /// Reserved; links are stored but never followed
    Symlink = 0x2,
}

impl FileType {
    /// Decode a type tag (already shifted down to bits 0-3)
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x0 => Some(Self::Regular),
            0x1 => Some(Self::Directory),
            0x2 => Some(Self::Symlink),
            _ => None,
        }
    }

    pub const fn tag(self) -> u8 {
        self as u8
    }
}

/// Packed type + permission byte
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Metadata(u8);

impl Metadata {
    pub const PERM_MASK: u8 = 0x0F;
    pub const TYPE_MASK: u8 = 0xF0;
    pub const TYPE_SHIFT: u8 = 4;

    pub const REGULAR: u8 = (FileType::Regular as u8) << Self::TYPE_SHIFT;
    pub const DIRECTORY: u8 = (FileType::Directory as u8) << Self::TYPE_SHIFT;
    pub const SYMLINK: u8 = (FileType::Symlink as u8) << Self::TYPE_SHIFT;

    pub const fn new(file_type: FileType, perms: Permissions) -> Self {
        Self((file_type.tag() << Self::TYPE_SHIFT) | (perms.bits() & Self::PERM_MASK))
    }

    pub const fn from_bits(raw: u8) -> Self {
        Self(raw)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Node type, `None` for a tag no backend assigns
    pub const fn file_type(self) -> Option<FileType> {
        FileType::from_tag((self.0 & Self::TYPE_MASK) >> Self::TYPE_SHIFT)
    }

    pub const fn permissions(self) -> Permissions {
        Permissions::from_metadata(self.0)
    }

    /// Replace the permission nibble, keeping the type tag
    pub const fn with_permissions(self, perms: Permissions) -> Self {
        Self((self.0 & Self::TYPE_MASK) | (perms.bits() & Self::PERM_MASK))
    }

    pub const fn is_regular(self) -> bool {
        matches!(self.file_type(), Some(FileType::Regular))
    }

    pub const fn is_directory(self) -> bool {
        matches!(self.file_type(), Some(FileType::Directory))
    }

    pub const fn is_symlink(self) -> bool {
        matches!(self.file_type(), Some(FileType::Symlink))
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metadata")
            .field("type", &self.file_type())
            .field("perms", &self.permissions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags_live_in_high_nibble() {
        assert_eq!(Metadata::REGULAR, 0x00);
        assert_eq!(Metadata::DIRECTORY, 0x10);
        assert_eq!(Metadata::SYMLINK, 0x20);
    }

    #[test]
    fn test_pack_and_unpack() {
        let meta = Metadata::new(FileType::Directory, Permissions::DEFAULT_DIR);
        assert_eq!(meta.bits(), 0x17);
        assert!(meta.is_directory());
        assert_eq!(meta.permissions(), Permissions::READ | Permissions::WRITE | Permissions::EXECUTE);
    }

    #[test]
    fn test_with_permissions_keeps_type() {
        let meta = Metadata::new(FileType::Regular, Permissions::DEFAULT_FILE);
        let meta = meta.with_permissions(Permissions::READ);
        assert!(meta.is_regular());
        assert_eq!(meta.bits(), 0x01);
    }

    #[test]
    fn test_unknown_type_tag() {
        assert_eq!(Metadata::from_bits(0x30).file_type(), None);
        assert_eq!(FileType::from_tag(0x1), Some(FileType::Directory));
    }

    #[test]
    fn test_from_metadata_ignores_type_nibble() {
        let perms = Permissions::from_metadata(Metadata::REGULAR | 0x03);
        assert_eq!(perms, Permissions::DEFAULT_FILE);
    }
}
