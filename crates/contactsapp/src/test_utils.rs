use crate::contact_store::{ContactStore, StoreOptions};
use crate::store::FsBackend;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
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
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    pub fn backend(&self) -> FsBackend {
        FsBackend::new(self.root.clone())
    }

    /// A fresh, not yet hydrated store over this environment's directory.
    /// Each call returns an independent instance, like a process restart.
    pub fn store(&self) -> ContactStore<FsBackend> {
        ContactStore::with_options(self.backend(), StoreOptions::default())
    }

    pub fn contacts_file(&self) -> PathBuf {
        self.backend().path_for(crate::contact_store::DEFAULT_STORE_NAME)
    }
}
