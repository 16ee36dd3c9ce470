//! # Hydration Signal
//!
//! Tracks whether the in-memory contact list reflects persisted state yet.
//!
//! ```text
//! NotHydrated ──hydrate()──▶ Hydrating ──load ok──▶ Hydrated
//!      ▲                         │
//!      └──────load failed────────┘
//! ```
//!
//! Two ways to observe it:
//!
//! - **Callbacks**: [`Hydration::subscribe`] registers a pair of callbacks, one
//!   fired on entering `Hydrating`, one on entering `Hydrated`. Each fires once
//!   per transition. The returned [`HydrationSubscription`] revokes both.
//! - **Async wait**: [`Hydration::wait_hydrated`] resolves once the state is
//!   `Hydrated` (immediately if it already is).
//!
//! Callbacks run synchronously on the task that performs the transition, after
//! the internal lock is released, so a callback may unsubscribe itself.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationState {
    NotHydrated,
    Hydrating,
    Hydrated,
}

type Callback = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    on_hydrating: Vec<(u64, Callback)>,
    on_hydrated: Vec<(u64, Callback)>,
}

fn lock(listeners: &Mutex<Listeners>) -> MutexGuard<'_, Listeners> {
    listeners.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Hydration {
    state: watch::Sender<HydrationState>,
    listeners: Arc<Mutex<Listeners>>,
}

impl Default for Hydration {
    fn default() -> Self {
        Self::new()
    }
}

impl Hydration {
    pub fn new() -> Self {
        let (state, _) = watch::channel(HydrationState::NotHydrated);
        Self {
            state,
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    pub fn state(&self) -> HydrationState {
        *self.state.borrow()
    }

    pub fn has_hydrated(&self) -> bool {
        self.state() == HydrationState::Hydrated
    }

    pub fn subscribe<H, D>(&self, on_hydrating: H, on_hydrated: D) -> HydrationSubscription
    where
        H: Fn() + Send + Sync + 'static,
        D: Fn() + Send + Sync + 'static,
    {
        let mut listeners = lock(&self.listeners);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.on_hydrating.push((id, Arc::new(on_hydrating)));
        listeners.on_hydrated.push((id, Arc::new(on_hydrated)));

        HydrationSubscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Resolve once the state is `Hydrated`.
    pub async fn wait_hydrated(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|s| *s == HydrationState::Hydrated).await;
    }

    /// Enter `Hydrating` unless a load is already running. The check and the
    /// switch happen under the channel lock.
    pub(crate) fn begin(&self) -> bool {
        let started = self.state.send_if_modified(|state| {
            if *state == HydrationState::Hydrating {
                return false;
            }
            *state = HydrationState::Hydrating;
            true
        });
        if started {
            self.notify(HydrationState::Hydrating);
        }
        started
    }

    pub(crate) fn transition(&self, next: HydrationState) {
        self.state.send_replace(next);
        self.notify(next);
    }

    fn notify(&self, next: HydrationState) {
        let callbacks: Vec<Callback> = {
            let listeners = lock(&self.listeners);
            let registered = match next {
                HydrationState::Hydrating => &listeners.on_hydrating,
                HydrationState::Hydrated => &listeners.on_hydrated,
                HydrationState::NotHydrated => return,
            };
            registered.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };

        for callback in callbacks {
            callback();
        }
    }
}

/// Handle returned by [`Hydration::subscribe`].
///
/// Dropping the handle keeps the callbacks registered; call
/// [`HydrationSubscription::unsubscribe`] to revoke them.
pub struct HydrationSubscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl HydrationSubscription {
    pub fn unsubscribe(self) {
        let Some(listeners) = self.listeners.upgrade() else {
            return;
        };
        let mut listeners = lock(&listeners);
        listeners.on_hydrating.retain(|(id, _)| *id != self.id);
        listeners.on_hydrated.retain(|(id, _)| *id != self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        (count, move || {
            c.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_starts_not_hydrated() {
        let h = Hydration::new();
        assert_eq!(h.state(), HydrationState::NotHydrated);
        assert!(!h.has_hydrated());
    }

    #[test]
    fn test_one_notification_per_transition() {
        let h = Hydration::new();
        let (hydrating, on_hydrating) = counter();
        let (hydrated, on_hydrated) = counter();
        let _sub = h.subscribe(on_hydrating, on_hydrated);

        h.transition(HydrationState::Hydrating);
        assert_eq!(hydrating.load(Ordering::SeqCst), 1);
        assert_eq!(hydrated.load(Ordering::SeqCst), 0);

        h.transition(HydrationState::Hydrated);
        assert_eq!(hydrating.load(Ordering::SeqCst), 1);
        assert_eq!(hydrated.load(Ordering::SeqCst), 1);
        assert!(h.has_hydrated());
    }

    #[test]
    fn test_unsubscribe_is_individual() {
        let h = Hydration::new();
        let (a_hydrated, on_a) = counter();
        let (b_hydrated, on_b) = counter();
        let sub_a = h.subscribe(|| {}, on_a);
        let _sub_b = h.subscribe(|| {}, on_b);

        sub_a.unsubscribe();
        h.transition(HydrationState::Hydrating);
        h.transition(HydrationState::Hydrated);

        assert_eq!(a_hydrated.load(Ordering::SeqCst), 0);
        assert_eq!(b_hydrated.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_begin_is_exclusive() {
        let h = Hydration::new();
        let (hydrating, on_hydrating) = counter();
        let _sub = h.subscribe(on_hydrating, || {});

        assert!(h.begin());
        assert!(!h.begin());
        assert_eq!(hydrating.load(Ordering::SeqCst), 1);
        assert_eq!(h.state(), HydrationState::Hydrating);

        h.transition(HydrationState::Hydrated);
        assert!(h.begin());
        assert_eq!(hydrating.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failed_load_notifies_nobody() {
        let h = Hydration::new();
        let (hydrated, on_hydrated) = counter();
        let _sub = h.subscribe(|| {}, on_hydrated);

        h.transition(HydrationState::Hydrating);
        h.transition(HydrationState::NotHydrated);
        assert_eq!(hydrated.load(Ordering::SeqCst), 0);
        assert_eq!(h.state(), HydrationState::NotHydrated);
    }

    #[test]
    fn test_unsubscribe_after_drop_of_signal() {
        let h = Hydration::new();
        let sub = h.subscribe(|| {}, || {});
        drop(h);
        sub.unsubscribe();
    }

    #[tokio::test]
    async fn test_wait_hydrated_returns_when_ready() {
        let h = Arc::new(Hydration::new());
        let waiter = {
            let h = Arc::clone(&h);
            tokio::spawn(async move { h.wait_hydrated().await })
        };
        h.transition(HydrationState::Hydrating);
        h.transition(HydrationState::Hydrated);
        waiter.await.unwrap();

        // Already hydrated: immediate
        h.wait_hydrated().await;
    }
}
