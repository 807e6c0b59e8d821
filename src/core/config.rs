use std::path::PathBuf;

/// Database configuration.
///
/// `root` names the primary keyspace directory; the index keyspaces live
/// beside it (see `storage::layout`).
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub create_if_missing: bool,
    /// Request a durable write for every put and delete.
    pub sync_writes: bool,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Config {
            root: root.into(),
            ..Config::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            root: PathBuf::from("./data"),
            create_if_missing: true,
            sync_writes: true,
        }
    }
}
