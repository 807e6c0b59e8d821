use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Directory layout for the three keyspaces.
///
/// Given a root path `P`, documents live in `P/`, the path-value index in
/// `P.index/`, and the inverted text index in `P.text_index/`.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    pub store_dir: PathBuf,
    pub index_dir: PathBuf,
    pub text_index_dir: PathBuf,
}

impl StorageLayout {
    pub fn new(root: &Path) -> Self {
        StorageLayout {
            store_dir: root.to_path_buf(),
            index_dir: sibling(root, ".index"),
            text_index_dir: sibling(root, ".text_index"),
        }
    }
}

fn sibling(root: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(root.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
