use super::backend::StorageBackend;
use crate::error::{ContactsError, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

/// Stores each named blob as `<root>/<name><ext>`.
pub struct FsBackend {
    root: PathBuf,
    file_ext: String,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            file_ext: ".csv".to_string(),
        }
    }

    pub fn with_file_ext(mut self, ext: &str) -> Self {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn file_ext(&self) -> &str {
        &self.file_ext
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}{}", name, self.file_ext))
    }

    async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(ContactsError::Io)
    }
}

#[async_trait]
impl StorageBackend for FsBackend {
    async fn get(&self, name: &str) -> Result<Option<String>> {
        let path = self.path_for(name);
        debug!(path = %path.display(), "reading");
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ContactsError::Io(e)),
        }
    }

    async fn set(&self, name: &str, text: &str) -> Result<()> {
        self.ensure_dir().await?;
        let path = self.path_for(name);
        debug!(path = %path.display(), bytes = text.len(), "writing");

        // Atomic write
        let tmp_path = self.root.join(format!(".{}-{}.tmp", name, Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp_path, text).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(ContactsError::Io(e));
        }
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(ContactsError::Io(e));
        }
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        let path = self.path_for(name);
        debug!(path = %path.display(), "deleting");
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ContactsError::Io(e)),
        }
    }

    fn location(&self, name: &str) -> String {
        self.path_for(name).display().to_string()
    }
}
