//! RAM filesystem property tests
//!
//! Random operation sequences must leave the tree, the hash index and the
//! byte counter in agreement.

use agave_kernel::fs::ramfs::RamfsStore;
use agave_kernel::fs::vfs::path::{is_normalized, normalize};
use proptest::prelude::*;

/// Small fixed namespace so random operations collide often
const PATHS: [&str; 8] = ["/a", "/b", "/a/x", "/a/y", "/b/x", "/a/x/deep", "/c", "/a/y/z"];

#[derive(Debug, Clone)]
enum Op {
    Add(usize, Vec<u8>),
    Write(usize, Vec<u8>),
    Remove(usize),
    Mkdir(usize),
    Rmdir(usize),
}

fn op() -> impl Strategy<Value = Op> {
    let path = 0..PATHS.len();
    let data = proptest::collection::vec(any::<u8>(), 0..32);
    prop_oneof![
        (path.clone(), data.clone()).prop_map(|(p, d)| Op::Add(p, d)),
        (path.clone(), data).prop_map(|(p, d)| Op::Write(p, d)),
        path.clone().prop_map(Op::Remove),
        path.clone().prop_map(Op::Mkdir),
        path.prop_map(Op::Rmdir),
    ]
}

fn apply(fs: &mut RamfsStore, op: &Op) {
    // Failures are expected; only the invariants matter
    let _ = match op {
        Op::Add(p, data) => fs.add_file(PATHS[*p], data, 0),
        Op::Write(p, data) => fs.write_file(PATHS[*p], data),
        Op::Remove(p) => fs.remove_file(PATHS[*p]),
        Op::Mkdir(p) => fs.make_directory(PATHS[*p]),
        Op::Rmdir(p) => fs.remove_directory(PATHS[*p]),
    };
}

/// Sum of file sizes found by walking `list_directory` from `dir`
fn walk_size(fs: &RamfsStore, dir: &str) -> usize {
    let names = fs.list_directory(dir, usize::MAX).unwrap_or_default();
    names
        .iter()
        .map(|name| {
            let child = if dir == "/" { format!("/{}", name) } else { format!("{}/{}", dir, name) };
            match fs.file_size(&child) {
                Ok(size) => size,
                Err(_) => walk_size(fs, &child),
            }
        })
        .sum()
}

proptest! {
    #[test]
    fn prop_invariants_hold_after_any_sequence(ops in proptest::collection::vec(op(), 0..64)) {
        let mut fs = RamfsStore::new().expect("store");
        for op in &ops {
            apply(&mut fs, op);
            prop_assert_eq!(fs.check_consistency(), Ok(()));
        }

        let files: usize = PATHS.iter().filter_map(|p| fs.file_size(p).ok()).sum();
        prop_assert_eq!(fs.total_size(), files);
        prop_assert_eq!(fs.directory_size("/"), Ok(files));
    }

    #[test]
    fn prop_directory_size_matches_traversal(ops in proptest::collection::vec(op(), 0..64)) {
        let mut fs = RamfsStore::new().expect("store");
        for op in &ops {
            apply(&mut fs, op);
        }

        for dir in ["/", "/a", "/b", "/a/x"] {
            if fs.directory_exists(dir).is_ok() {
                prop_assert_eq!(fs.directory_size(dir), Ok(walk_size(&fs, dir)));
            }
        }
    }

    #[test]
    fn prop_write_then_read(first in proptest::collection::vec(any::<u8>(), 0..128),
                            second in proptest::collection::vec(any::<u8>(), 0..128)) {
        let mut fs = RamfsStore::new().expect("store");
        fs.add_file("/f", &first, 0).expect("add");
        prop_assert_eq!(fs.read_file("/f"), Ok(&first[..]));

        fs.write_file("/f", &second).expect("write");
        prop_assert_eq!(fs.read_file("/f"), Ok(&second[..]));
        prop_assert_eq!(fs.total_size(), second.len());
    }

    #[test]
    fn prop_normalize_is_idempotent(path in "[a-z/]{0,24}") {
        let once = normalize(&path);
        prop_assert!(is_normalized(&once));
        prop_assert_eq!(normalize(&once), once.clone());
    }

    #[test]
    fn prop_add_then_exists_then_remove(name in "[a-z]{1,12}") {
        let mut fs = RamfsStore::new().expect("store");
        let path = format!("/{}", name);

        fs.add_file(&path, b"x", 0).expect("add");
        prop_assert_eq!(fs.file_exists(&path), Ok(true));
        fs.remove_file(&path).expect("remove");
        prop_assert!(fs.file_exists(&path).is_err());
        prop_assert_eq!(fs.node_count(), 1);
    }
}
