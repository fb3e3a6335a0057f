use super::card_store::CardStore;
use super::fs_backend::FsBackend;
use std::path::PathBuf;

pub type FileStore = CardStore<FsBackend>;

impl FileStore {
    /// A store rooted at `root`, using the default mirror file name.
    pub fn new(root: PathBuf) -> Self {
        CardStore::with_backend(FsBackend::new(root))
    }

    pub fn with_mirror_file(self, name: &str) -> Self {
        CardStore::with_backend(self.backend.with_mirror_file(name))
    }

    pub fn root(&self) -> &std::path::Path {
        self.backend.root()
    }
}
