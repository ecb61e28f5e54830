//! RAMFS Metadata and Permissions
//!
//! Attribute queries only need the node to exist; the permission bits being
//! read or changed are not themselves checked.

use super::store::RamfsStore;
use crate::fs::vfs::error::{FsError, FsResult};
use crate::fs::vfs::metadata::{Metadata, Permissions};

impl RamfsStore {
    /// Packed type and permission byte of any node
    pub fn get_file_metadata(&self, path: &str) -> FsResult<Metadata> {
        let id = self.resolve(path).1.ok_or(FsError::NoEntry)?;
        Ok(self.nodes[id].metadata())
    }

    /// Replace the permission bits of any node, including the root
    pub fn set_file_permissions(&mut self, path: &str, perms: Permissions) -> FsResult<()> {
        let id = self.resolve(path).1.ok_or(FsError::NoEntry)?;
        let node = &mut self.nodes[id];
        node.perms = Permissions::from_bits_retain(perms.bits() & Metadata::PERM_MASK);
        log::trace!(target: "ramfs", "{} permissions now {:?}", node.path, node.perms);
        Ok(())
    }

    pub fn get_file_permissions(&self, path: &str) -> FsResult<Permissions> {
        let id = self.resolve(path).1.ok_or(FsError::NoEntry)?;
        Ok(self.nodes[id].perms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::vfs::metadata::FileType;

    #[test]
    fn test_metadata_of_file_and_directory() {
        let mut fs = RamfsStore::new().expect("store");
        fs.make_directory("/d").expect("mkdir");
        fs.add_file("/d/f", b"", Permissions::READ.bits()).expect("add");

        let dir = fs.get_file_metadata("/d").expect("meta");
        assert_eq!(dir.file_type(), Some(FileType::Directory));
        assert_eq!(dir.bits(), Metadata::DIRECTORY | 0x07);

        let file = fs.get_file_metadata("/d/f").expect("meta");
        assert_eq!(file.bits(), Metadata::REGULAR | 0x01);
    }

    #[test]
    fn test_set_permissions_keeps_type() {
        let mut fs = RamfsStore::new().expect("store");
        fs.make_directory("/d").expect("mkdir");
        fs.set_file_permissions("/d", Permissions::READ).expect("chmod");

        assert_eq!(fs.get_file_permissions("/d"), Ok(Permissions::READ));
        assert!(fs.get_file_metadata("/d").expect("meta").is_directory());
    }

    #[test]
    fn test_permissions_on_root() {
        let mut fs = RamfsStore::new().expect("store");
        assert_eq!(fs.get_file_permissions("/"), Ok(Permissions::DEFAULT_DIR));

        fs.set_file_permissions("/", Permissions::READ | Permissions::EXECUTE).expect("chmod");
        assert_eq!(fs.make_directory("/d"), Err(FsError::PermissionDenied));
    }

    #[test]
    fn test_missing_node() {
        let mut fs = RamfsStore::new().expect("store");
        assert_eq!(fs.get_file_metadata("/nope"), Err(FsError::NoEntry));
        assert_eq!(fs.get_file_permissions("/nope"), Err(FsError::NoEntry));
        assert_eq!(fs.set_file_permissions("/nope", Permissions::READ), Err(FsError::NoEntry));
    }
}
