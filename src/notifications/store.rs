// SPDX-License-Identifier: MPL-2.0
//! Toast lifecycle bookkeeping.
//!
//! `ToastStore` owns the ordered list of active toasts and knows when each
//! one expires. It does not schedule anything itself: callers either drive it
//! with [`ToastStore::expire`] from a periodic tick, or use
//! [`ToastService`](super::ToastService) which arms one timer per toast.

use super::toast::{Toast, ToastId, ToastKind};
use crate::domain::newtypes::ToastLifetime;
use std::time::Instant;

/// Ordered collection of active toasts (oldest first).
#[derive(Debug, Default)]
pub struct ToastStore {
    active: Vec<Toast>,
    lifetime: ToastLifetime,
}

impl ToastStore {
    /// Creates an empty store with the default lifetime.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_lifetime(lifetime: ToastLifetime) -> Self {
        Self {
            active: Vec::new(),
            lifetime,
        }
    }

    #[must_use]
    pub fn lifetime(&self) -> ToastLifetime {
        self.lifetime
    }

    /// Appends a new toast and returns its id.
    pub fn add(&mut self, message: impl Into<String>, kind: ToastKind) -> ToastId {
        self.add_at(message, kind, Instant::now())
    }

    /// Appends a new toast created at `now`.
    pub fn add_at(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) -> ToastId {
        let toast = Toast::created_at(message, kind, now);
        let id = toast.id();
        tracing::debug!(%id, kind = %toast.kind(), "toast added");
        self.active.push(toast);
        id
    }

    /// Removes the toast with `id`.
    ///
    /// Returns `true` if a toast was removed. Removing an unknown or already
    /// removed id is a no-op.
    pub fn remove(&mut self, id: ToastId) -> bool {
        match self.active.iter().position(|t| t.id() == id) {
            Some(pos) => {
                self.active.remove(pos);
                tracing::debug!(%id, "toast removed");
                true
            }
            None => false,
        }
    }

    /// Removes every toast whose lifetime has elapsed at `now`.
    ///
    /// Returns the ids that were removed.
    pub fn expire(&mut self, now: Instant) -> Vec<ToastId> {
        let lifetime = self.lifetime.as_duration();
        let mut expired = Vec::new();
        self.active.retain(|toast| {
            let alive = now.saturating_duration_since(toast.creation_instant()) < lifetime;
            if !alive {
                expired.push(toast.id());
            }
            alive
        });
        expired
    }

    /// Active toasts in creation order.
    #[must_use]
    pub fn active(&self) -> &[Toast] {
        &self.active
    }

    #[must_use]
    pub fn get(&self, id: ToastId) -> Option<&Toast> {
        self.active.iter().find(|t| t.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Removes all toasts, returning their ids.
    pub fn clear(&mut self) -> Vec<ToastId> {
        self.active.drain(..).map(|t| t.id()).collect()
    }
}
