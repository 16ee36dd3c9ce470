use super::backend::StorageBackend;
use crate::error::{ContactsError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::io::{Error as IoError, ErrorKind};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// In-memory storage backend for testing.
///
/// Locks are only held for the duration of a map access, never across an
/// await point, so a delayed write does not block readers.
#[derive(Default)]
pub struct MemBackend {
    blobs: Mutex<HashMap<String, String>>,
    simulate_read_error: AtomicBool,
    simulate_write_error: AtomicBool,
    read_delays: Mutex<VecDeque<Duration>>,
    write_delays: Mutex<VecDeque<Duration>>,
    writes: AtomicUsize,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable read error simulation for testing error handling.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.store(simulate, Ordering::SeqCst);
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Make the next `set` call sleep before storing. Queued delays are
    /// consumed one per write, in call order.
    pub fn delay_next_write(&self, delay: Duration) {
        lock(&self.write_delays).push_back(delay);
    }

    /// Same as [`MemBackend::delay_next_write`], for `get`.
    pub fn delay_next_read(&self, delay: Duration) {
        lock(&self.read_delays).push_back(delay);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Synchronous peek at a blob, for assertions.
    pub fn raw(&self, name: &str) -> Option<String> {
        lock(&self.blobs).get(name).cloned()
    }

    /// Synchronous seeding of a blob, bypassing error simulation.
    pub fn insert_raw(&self, name: &str, text: &str) {
        lock(&self.blobs).insert(name.to_string(), text.to_string());
    }
}

#[async_trait]
impl StorageBackend for MemBackend {
    async fn get(&self, name: &str) -> Result<Option<String>> {
        let delay = lock(&self.read_delays).pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.simulate_read_error.load(Ordering::SeqCst) {
            return Err(ContactsError::Io(IoError::new(
                ErrorKind::PermissionDenied,
                "Simulated read error",
            )));
        }
        Ok(self.raw(name))
    }

    async fn set(&self, name: &str, text: &str) -> Result<()> {
        let delay = lock(&self.write_delays).pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(ContactsError::Io(IoError::new(
                ErrorKind::Other,
                "Simulated write error",
            )));
        }
        self.insert_raw(name, text);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(ContactsError::Io(IoError::new(
                ErrorKind::PermissionDenied,
                "Simulated write error",
            )));
        }
        lock(&self.blobs).remove(name);
        Ok(())
    }

    fn location(&self, name: &str) -> String {
        format!("memory://{}", name)
    }
}
