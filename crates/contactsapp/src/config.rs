//! # Configuration
//!
//! Contacts configuration is managed by [`confique`], which handles layered
//! loading from a TOML file and environment variables.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `CONTACTS_DATA_DIR`, `CONTACTS_STORE_NAME`, etc.
//! 2. **Config file**: `contacts.toml` in the OS-appropriate config directory
//!    (via `directories` crate).
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `data_dir` | `CONTACTS_DATA_DIR` | platform data dir | Where the contacts file lives |
//! | `store_name` | `CONTACTS_STORE_NAME` | `contacts` | File stem of the contacts file |
//! | `file_ext` | `CONTACTS_FILE_EXT` | `.csv` | File extension |
//! | `seed_defaults` | `CONTACTS_SEED_DEFAULTS` | `true` | Seed a fresh book with sample contacts |

use crate::error::{ContactsError, Result};
use crate::store::FsBackend;
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "contacts.toml";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io.github", "sitiom", "contacts")
}

/// Configuration for contacts, stored in `contacts.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ContactsConfig {
    /// Directory holding the contacts file.
    /// When absent, the platform data directory is used.
    #[config(env = "CONTACTS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Logical name of the contacts file (without extension).
    #[config(env = "CONTACTS_STORE_NAME", default = "contacts")]
    pub store_name: String,

    /// Extension of the contacts file (e.g. ".csv", ".txt")
    #[config(env = "CONTACTS_FILE_EXT", default = ".csv")]
    pub file_ext: String,

    /// Seed a missing contacts file with the built-in sample contacts.
    #[config(env = "CONTACTS_SEED_DEFAULTS", default = true)]
    pub seed_defaults: bool,
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            store_name: "contacts".to_string(),
            file_ext: ".csv".to_string(),
            seed_defaults: true,
        }
    }
}

impl ContactsConfig {
    /// Load from the environment and an optional TOML file. A file that does
    /// not exist is skipped.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = ContactsConfig::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }

    /// Load from the environment and the default config file location.
    pub fn load_default() -> Result<Self> {
        Self::load(Self::default_config_file().as_deref())
    }

    pub fn default_config_file() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Get the file extension, normalized to start with a dot.
    pub fn file_ext(&self) -> String {
        if self.file_ext.starts_with('.') {
            self.file_ext.clone()
        } else {
            format!(".{}", self.file_ext)
        }
    }

    /// Resolve the data directory, falling back to the platform default.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                ContactsError::Store("Could not determine a data directory".to_string())
            })
    }

    /// The filesystem backend this configuration describes.
    pub fn fs_backend(&self) -> Result<FsBackend> {
        Ok(FsBackend::new(self.data_dir()?).with_file_ext(&self.file_ext()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = ContactsConfig::default();
        assert_eq!(config.store_name, "contacts");
        assert_eq!(config.file_ext(), ".csv");
        assert!(config.seed_defaults);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_file_ext_normalization_without_dot() {
        let config = ContactsConfig {
            file_ext: "txt".to_string(),
            ..Default::default()
        };
        assert_eq!(config.file_ext(), ".txt");
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let config = ContactsConfig {
            data_dir: Some(PathBuf::from("/tmp/book")),
            ..Default::default()
        };
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/book"));

        let backend = config.fs_backend().unwrap();
        assert_eq!(
            backend.path_for("contacts"),
            PathBuf::from("/tmp/book/contacts.csv")
        );
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "store_name = \"work\"\nseed_defaults = false\nfile_ext = \"txt\"\n",
        )
        .unwrap();

        let config = ContactsConfig::load(Some(&path)).unwrap();
        assert_eq!(config.store_name, "work");
        assert!(!config.seed_defaults);
        assert_eq!(config.file_ext(), ".txt");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ContactsConfig::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config.store_name, "contacts");
    }
}
