//! # Contact Store
//!
//! The authoritative in-memory address book plus the persistence that keeps it
//! on disk. A [`ContactStore`] is an explicitly constructed value owned by the
//! application's composition root and cloned (cheaply, it is an `Arc`) into
//! whoever needs it. Tests build as many isolated instances as they like.
//!
//! ## Lifecycle
//!
//! 1. **Construct**: [`ContactStore::with_backend`]. The collection holds the
//!    built-in defaults and hydration is `NotHydrated`.
//! 2. **Hydrate**: [`ContactStore::hydrate`] loads the persisted file.
//!    - File present and parses: it *replaces* the defaults wholesale.
//!    - File absent: the defaults stay and are written out immediately, so the
//!      next run finds a file.
//!    - File corrupt or unreadable: the error is returned, hydration falls
//!      back to `NotHydrated`, and nothing is written. Corruption is never
//!      papered over with defaults.
//! 3. **Mutate**: [`add`](ContactStore::add), [`remove`](ContactStore::remove),
//!    [`update`](ContactStore::update).
//!
//! ## Mutations
//!
//! Each mutation is applied to memory before the call returns, then a
//! snapshot of the whole collection is handed to a background task that saves
//! it. The call returns a [`PendingSave`] that reports when that save settles
//! and what it returned. The memory change stands whether or not the save
//! succeeds; a failed save leaves disk behind memory until the next
//! successful one.
//!
//! - `add` appends. Duplicate ids are logged, not rejected.
//! - `remove` drops the record whose `id` matches. Other fields are ignored.
//! - `update` replaces the record whose `id` matches, in place (its position
//!   is preserved). No match is a no-op, never an insert.
//!
//! Mutations made before hydration completes stay in memory only and their
//! `PendingSave` resolves to [`ContactsError::NotHydrated`]; writing them would
//! clobber a file that has not been read yet.
//!
//! ## Write Ordering
//!
//! Saves are serialized, and each snapshot carries the sequence number of the
//! mutation that produced it. A snapshot older than one already on disk is
//! skipped, so the file always ends at the most recently *issued* mutation
//! even if save tasks get scheduled out of order.

use crate::config::ContactsConfig;
use crate::defaults::default_contacts;
use crate::error::{ContactsError, Result};
use crate::hydration::{Hydration, HydrationState, HydrationSubscription};
use crate::model::Contact;
use crate::store::{CsvStorage, StorageBackend};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const DEFAULT_STORE_NAME: &str = "contacts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Logical name of the persisted blob (`contacts` → `contacts.csv`).
    pub name: String,
    /// Seed a missing file with the built-in contacts. When false, a first
    /// run starts empty.
    pub seed_defaults: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_STORE_NAME.to_string(),
            seed_defaults: true,
        }
    }
}

impl From<&ContactsConfig> for StoreOptions {
    fn from(config: &ContactsConfig) -> Self {
        Self {
            name: config.store_name.clone(),
            seed_defaults: config.seed_defaults,
        }
    }
}

struct Collection {
    contacts: Vec<Contact>,
    /// Bumped on every change; identifies the snapshot a save carries.
    seq: u64,
}

struct Inner<B: StorageBackend> {
    options: StoreOptions,
    storage: CsvStorage<B>,
    seed: Vec<Contact>,
    collection: Mutex<Collection>,
    hydration: Hydration,
    /// Sequence number of the snapshot currently on disk. Held for the whole
    /// duration of a write.
    last_written: tokio::sync::Mutex<u64>,
}

pub struct ContactStore<B: StorageBackend + 'static> {
    inner: Arc<Inner<B>>,
}

impl<B: StorageBackend + 'static> Clone for ContactStore<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: StorageBackend + 'static> ContactStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self::with_options(backend, StoreOptions::default())
    }

    pub fn with_options(backend: B, options: StoreOptions) -> Self {
        let seed = if options.seed_defaults {
            default_contacts()
        } else {
            Vec::new()
        };
        Self {
            inner: Arc::new(Inner {
                options,
                storage: CsvStorage::new(backend),
                collection: Mutex::new(Collection {
                    contacts: seed.clone(),
                    seq: 0,
                }),
                seed,
                hydration: Hydration::new(),
                last_written: tokio::sync::Mutex::new(0),
            }),
        }
    }

    /// Construct and hydrate in one step.
    pub async fn open(backend: B, options: StoreOptions) -> Result<Self> {
        let store = Self::with_options(backend, options);
        store.hydrate().await?;
        Ok(store)
    }

    pub fn name(&self) -> &str {
        &self.inner.options.name
    }

    /// Where the persisted file lives, as reported by the backend.
    pub fn location(&self) -> String {
        self.inner.storage.backend().location(&self.inner.options.name)
    }

    pub fn backend(&self) -> &B {
        self.inner.storage.backend()
    }

    // --- Hydration ---

    /// Load persisted contacts, or seed the defaults on first run.
    ///
    /// Calling this again re-reads storage and replaces the collection.
    pub async fn hydrate(&self) -> Result<()> {
        let inner = &self.inner;
        if !inner.hydration.begin() {
            return Err(ContactsError::Store(
                "Hydration already in progress".to_string(),
            ));
        }
        debug!(location = %self.location(), "hydrating contacts");

        let loaded = match inner.storage.load(&inner.options.name).await {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(error = %e, "failed to load contacts");
                inner.hydration.transition(HydrationState::NotHydrated);
                return Err(e);
            }
        };

        match loaded {
            Some(contacts) => {
                info!(count = contacts.len(), "loaded persisted contacts");
                self.replace(contacts);
                inner.hydration.transition(HydrationState::Hydrated);
                Ok(())
            }
            None => {
                info!(
                    count = inner.seed.len(),
                    "no persisted contacts, seeding defaults"
                );
                let (seq, snapshot) = self.replace(inner.seed.clone());
                let saved = write_snapshot(Arc::clone(inner), seq, snapshot).await;
                // The collection is usable even if the seed could not be written.
                inner.hydration.transition(HydrationState::Hydrated);
                saved
            }
        }
    }

    pub fn hydration_state(&self) -> HydrationState {
        self.inner.hydration.state()
    }

    pub fn has_hydrated(&self) -> bool {
        self.inner.hydration.has_hydrated()
    }

    pub async fn wait_hydrated(&self) {
        self.inner.hydration.wait_hydrated().await
    }

    pub fn subscribe_hydration<H, D>(&self, on_hydrating: H, on_hydrated: D) -> HydrationSubscription
    where
        H: Fn() + Send + Sync + 'static,
        D: Fn() + Send + Sync + 'static,
    {
        self.inner.hydration.subscribe(on_hydrating, on_hydrated)
    }

    // --- Reads ---

    /// Copy of the current collection. Only meaningful once hydrated.
    pub fn snapshot(&self) -> Vec<Contact> {
        self.lock().contacts.clone()
    }

    pub fn get(&self, id: &Uuid) -> Option<Contact> {
        self.lock().contacts.iter().find(|c| c.id == *id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().contacts.is_empty()
    }

    // --- Mutations ---

    pub fn add(&self, contact: Contact) -> PendingSave {
        self.mutate(|contacts| {
            if contacts.iter().any(|c| c.id == contact.id) {
                warn!(id = %contact.id, "adding contact with an id already in the store");
            }
            debug!(id = %contact.id, "add");
            contacts.push(contact);
        })
    }

    pub fn remove(&self, contact: &Contact) -> PendingSave {
        let id = contact.id;
        self.mutate(|contacts| {
            if let Some(pos) = contacts.iter().position(|c| c.id == id) {
                debug!(%id, "remove");
                contacts.remove(pos);
            } else {
                debug!(%id, "remove: no such contact");
            }
        })
    }

    pub fn update(&self, contact: Contact) -> PendingSave {
        self.mutate(|contacts| {
            if let Some(slot) = contacts.iter_mut().find(|c| c.id == contact.id) {
                debug!(id = %contact.id, "update");
                *slot = contact;
            } else {
                debug!(id = %contact.id, "update: no such contact");
            }
        })
    }

    /// Delete the persisted file. Memory is left as is; the next mutation
    /// writes it again.
    ///
    /// Saves issued before the call and still queued are treated as stale
    /// and skipped, so they cannot bring the file back.
    pub async fn clear_storage(&self) -> Result<()> {
        let inner = &self.inner;
        let mut last = inner.last_written.lock().await;
        inner.storage.drop_entry(&inner.options.name).await?;
        *last = (*last).max(self.lock().seq);
        info!(location = %self.location(), "cleared persisted contacts");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Collection> {
        self.inner
            .collection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn replace(&self, contacts: Vec<Contact>) -> (u64, Vec<Contact>) {
        let mut collection = self.lock();
        collection.contacts = contacts;
        collection.seq += 1;
        (collection.seq, collection.contacts.clone())
    }

    fn mutate(&self, apply: impl FnOnce(&mut Vec<Contact>)) -> PendingSave {
        let (seq, snapshot) = {
            let mut collection = self.lock();
            apply(&mut collection.contacts);
            collection.seq += 1;
            (collection.seq, collection.contacts.clone())
        };

        if !self.inner.hydration.has_hydrated() {
            warn!(seq, "store not hydrated, change kept in memory only");
            return PendingSave::ready(Err(ContactsError::NotHydrated));
        }

        let Ok(runtime) = Handle::try_current() else {
            return PendingSave::ready(Err(ContactsError::Store(
                "No async runtime to run the save on".to_string(),
            )));
        };
        let inner = Arc::clone(&self.inner);
        PendingSave::spawned(runtime.spawn(write_snapshot(inner, seq, snapshot)))
    }
}

async fn write_snapshot<B: StorageBackend>(
    inner: Arc<Inner<B>>,
    seq: u64,
    snapshot: Vec<Contact>,
) -> Result<()> {
    let mut last = inner.last_written.lock().await;
    if seq <= *last {
        warn!(seq, last = *last, "skipping stale snapshot");
        return Ok(());
    }
    inner.storage.save(&inner.options.name, &snapshot).await?;
    *last = seq;
    debug!(seq, count = snapshot.len(), "snapshot saved");
    Ok(())
}

/// The in-flight save triggered by a mutation.
///
/// Await it for the save's result, or poll [`PendingSave::is_settled`] to
/// drive a busy indicator. Dropping it does not cancel the save.
pub struct PendingSave {
    state: PendingState,
}

enum PendingState {
    Spawned(JoinHandle<Result<()>>),
    Ready(Option<Result<()>>),
}

impl PendingSave {
    fn spawned(handle: JoinHandle<Result<()>>) -> Self {
        Self {
            state: PendingState::Spawned(handle),
        }
    }

    fn ready(result: Result<()>) -> Self {
        Self {
            state: PendingState::Ready(Some(result)),
        }
    }

    pub fn is_settled(&self) -> bool {
        match &self.state {
            PendingState::Spawned(handle) => handle.is_finished(),
            PendingState::Ready(_) => true,
        }
    }
}

impl Future for PendingSave {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.state {
            PendingState::Spawned(handle) => Pin::new(handle).poll(cx).map(|joined| {
                joined.unwrap_or_else(|e| {
                    Err(ContactsError::Store(format!("Save task failed: {}", e)))
                })
            }),
            PendingState::Ready(result) => Poll::Ready(result.take().unwrap_or(Ok(()))),
        }
    }
}
