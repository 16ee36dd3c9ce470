//! # Storage Layer
//!
//! This module defines how contacts reach the disk. It is split in two so the
//! file format and the medium can vary independently:
//!
//! 1. **Backend** ([`backend::StorageBackend`]): async get/set/remove of a
//!    named blob of text. Knows nothing about contacts.
//! 2. **Adapter** ([`csv_storage::CsvStorage`]): runs the
//!    [`crate::codec`] over a backend so callers load and save typed
//!    `Vec<Contact>` values.
//!
//! ## Absent vs. Broken
//!
//! The layer keeps three outcomes apart, because the store reacts to each
//! differently:
//!
//! - **Absent**: `Ok(None)`. Nothing has been saved yet. First run.
//! - **Corrupt**: `Err(MalformedRecord | MalformedHeader)`. The blob exists but
//!   does not parse.
//! - **I/O failure**: `Err(Io)`. The medium itself failed.
//!
//! Deleting an absent blob is a success.
//!
//! ## Snapshot Writes
//!
//! Every save replaces the whole blob. [`fs_backend::FsBackend`] writes to a
//! temp file in the same directory and renames it over the target, so a crash
//! mid-write leaves either the old file or the new one.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: production, one file per name.
//! - [`mem_backend::MemBackend`]: for testing logic without filesystem I/O,
//!   with switchable failures and write delays.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//! ├── contacts.csv            # The address book
//! └── .contacts-{uuid}.tmp    # Transient, only during a write
//! ```

pub mod backend;
pub mod csv_storage;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::StorageBackend;
pub use csv_storage::CsvStorage;
pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;
