use crate::store::fs::FileStore;
use std::path::PathBuf;
use tempfile::TempDir;

/// A data directory for file-backed tests: a `FileStore` over it plus the
/// path, so tests can damage `cards/` or the mirror file on disk and then
/// [`reopen`](TestEnv::reopen) the directory as the next process would.
pub struct TestEnv {
    pub _temp_dir: TempDir,
    pub store: FileStore,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let store = FileStore::new(root.clone());
        Self {
            _temp_dir: temp_dir,
            store,
            root,
        }
    }

    /// A second store over the same directory, as a new process would see it.
    pub fn reopen(&self) -> FileStore {
        FileStore::new(self.root.clone())
    }
}
