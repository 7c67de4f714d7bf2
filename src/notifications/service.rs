// SPDX-License-Identifier: MPL-2.0
//! Shared toast store with automatic removal.
//!
//! `ToastService` wraps a [`ToastStore`] behind a mutex so it can be shared
//! across tasks. Each added toast gets its own timer task that removes it once
//! its lifetime elapses; dismissing a toast early aborts that task. Removal is
//! idempotent, so a timer firing after a dismissal (or the other way round)
//! leaves the same final state.
//!
//! Every mutation publishes the new active list on a `watch` channel for
//! presentational collaborators.

use super::store::ToastStore;
use super::toast::{Toast, ToastId, ToastKind};
use crate::domain::newtypes::ToastLifetime;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug)]
struct Inner {
    store: ToastStore,
    timers: HashMap<ToastId, JoinHandle<()>>,
    feed: watch::Sender<Vec<Toast>>,
}

impl Inner {
    fn publish(&self) {
        self.feed.send_replace(self.store.active().to_vec());
    }
}

/// Cloneable handle to the process-wide toast list.
///
/// [`ToastService::add`] spawns a timer task and must be called from within a
/// Tokio runtime.
#[derive(Debug, Clone)]
pub struct ToastService {
    inner: Arc<Mutex<Inner>>,
}

impl ToastService {
    #[must_use]
    pub fn new(lifetime: ToastLifetime) -> Self {
        let (feed, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Mutex::new(Inner {
                store: ToastStore::with_lifetime(lifetime),
                timers: HashMap::new(),
                feed,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a toast and schedules its removal after the configured lifetime.
    pub fn add(&self, message: impl Into<String>, kind: ToastKind) -> ToastId {
        let mut inner = self.lock();
        let id = inner.store.add(message, kind);
        let delay = inner.store.lifetime().as_duration();

        let weak = Arc::downgrade(&self.inner);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            expire(&weak, id);
        });
        inner.timers.insert(id, timer);
        inner.publish();
        id
    }

    /// Adds a success toast.
    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.add(message, ToastKind::Success)
    }

    /// Adds an error toast.
    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.add(message, ToastKind::Error)
    }

    /// Dismisses a toast and cancels its pending timer.
    ///
    /// Returns `true` if the toast was still active. Unknown ids are a no-op.
    pub fn remove(&self, id: ToastId) -> bool {
        let mut inner = self.lock();
        if let Some(timer) = inner.timers.remove(&id) {
            timer.abort();
        }
        let removed = inner.store.remove(id);
        if removed {
            inner.publish();
        }
        removed
    }

    /// Dismisses every toast and cancels all pending timers.
    pub fn clear(&self) {
        let mut inner = self.lock();
        for (_, timer) in inner.timers.drain() {
            timer.abort();
        }
        if !inner.store.clear().is_empty() {
            inner.publish();
        }
    }

    /// Snapshot of the active toasts, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<Toast> {
        self.lock().store.active().to_vec()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().store.is_empty()
    }

    /// Number of timers still armed.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.lock().timers.len()
    }

    /// Subscribes to the active list. The receiver starts with the current list.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.lock().feed.subscribe()
    }
}

impl Default for ToastService {
    fn default() -> Self {
        Self::new(ToastLifetime::default())
    }
}

/// Timer callback. The service may already be gone, or the toast dismissed.
fn expire(inner: &Weak<Mutex<Inner>>, id: ToastId) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
    inner.timers.remove(&id);
    if inner.store.remove(id) {
        tracing::debug!(%id, "toast expired");
        inner.publish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn toast_lifecycle_saved_scenario() {
        let service = ToastService::default();
        let id = service.add("Saved", ToastKind::Success);

        let active = service.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id(), id);
        assert_eq!(active[0].message(), "Saved");

        advance(3_001).await;
        assert!(service.is_empty());
        assert_eq!(service.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn toast_survives_until_lifetime() {
        let service = ToastService::default();
        service.success("Cita reservada");

        advance(2_900).await;
        assert_eq!(service.len(), 1);

        advance(200).await;
        assert!(service.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_cancels_timer() {
        let service = ToastService::default();
        let id = service.add("Saved", ToastKind::Success);
        assert_eq!(service.pending_timers(), 1);

        assert!(service.remove(id));
        assert_eq!(service.pending_timers(), 0);
        assert!(service.is_empty());

        advance(3_500).await;
        assert!(service.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn remove_twice_is_noop() {
        let service = ToastService::default();
        let keep = service.add("keep", ToastKind::Info);
        let id = service.add("drop", ToastKind::Info);

        assert!(service.remove(id));
        assert!(!service.remove(id));
        let remaining: Vec<_> = service.active().iter().map(Toast::id).collect();
        assert_eq!(remaining, vec![keep]);
    }

    #[tokio::test(start_paused = true)]
    async fn remove_after_expiry_is_noop() {
        let service = ToastService::default();
        let id = service.add("Saved", ToastKind::Success);

        advance(3_001).await;
        assert!(!service.remove(id));
        assert!(service.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn toasts_expire_independently() {
        let service = ToastService::new(ToastLifetime::from_millis(1_000));
        let first = service.add("first", ToastKind::Success);
        advance(600).await;
        let second = service.add("second", ToastKind::Error);

        advance(500).await;
        let ids: Vec<_> = service.active().iter().map(Toast::id).collect();
        assert_eq!(ids, vec![second]);
        assert_ne!(first, second);

        advance(600).await;
        assert!(service.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_additions_and_expiry() {
        let service = ToastService::default();
        let mut feed = service.subscribe();
        assert!(feed.borrow().is_empty());

        service.error("Credenciales inválidas");
        feed.changed().await.expect("service alive");
        assert_eq!(feed.borrow_and_update().len(), 1);

        advance(3_001).await;
        feed.changed().await.expect("service alive");
        assert!(feed.borrow_and_update().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_cancels_everything() {
        let service = ToastService::default();
        service.success("a");
        service.success("b");

        service.clear();
        assert!(service.is_empty());
        assert_eq!(service.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_after_service_drop_is_harmless() {
        let service = ToastService::default();
        service.success("orphan");
        drop(service);
        advance(3_001).await;
    }
}
