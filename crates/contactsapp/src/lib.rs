//! # Contacts
//!
//! A small, offline-first personal address book. Contacts live in memory and
//! are written to a single CSV file after every change, so the book survives
//! restarts on a device with no network.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  UI (crates/contacts CLI, or any other client)               │
//! └──────────────────────────────────────────────────────────────┘
//!          │ add / remove / update / snapshot / hydration
//!          ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ContactStore (contact_store.rs)                             │
//! │  - in-memory collection, mutation API                        │
//! │  - hydration lifecycle, snapshot save after every mutation   │
//! └──────────────────────────────────────────────────────────────┘
//!          │ load / save / drop of Vec<Contact>
//!          ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  CsvStorage (store/csv_storage.rs)  ── codec.rs (CSV text)   │
//! └──────────────────────────────────────────────────────────────┘
//!          │ get / set / remove of a named text blob
//!          ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StorageBackend: FsBackend (disk) | MemBackend (tests)       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is UI agnostic: functions take normal Rust values, return
//! `Result`, and never print. Diagnostics go through `tracing`; installing a
//! subscriber is the client's job.
//!
//! ## Quick Start
//!
//! ```no_run
//! use contactsapp::{Contact, ContactStore, ContactsConfig, StoreOptions};
//!
//! # async fn run() -> contactsapp::error::Result<()> {
//! let config = ContactsConfig::load_default()?;
//! let store = ContactStore::open(config.fs_backend()?, StoreOptions::from(&config)).await?;
//!
//! let ada = Contact::new("Ada", "Lovelace", "ada@example.com", "09123456789", None);
//! store.add(ada.clone()).await?;
//! assert!(store.get(&ada.id).is_some());
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod contact_store;
pub mod defaults;
pub mod error;
pub mod hydration;
pub mod model;
pub mod store;

#[cfg(test)]
pub mod test_utils;

pub use config::ContactsConfig;
pub use contact_store::{ContactStore, PendingSave, StoreOptions};
pub use error::{ContactsError, Result};
pub use hydration::{HydrationState, HydrationSubscription};
pub use model::Contact;
