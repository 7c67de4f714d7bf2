// SPDX-License-Identifier: MPL-2.0
//! In-memory record of refused navigations.
//!
//! Guards log every refusal through `tracing` and, when a
//! [`DiagnosticsHandle`] is attached, also push an [`AccessEvent`] into a
//! bounded [`CircularBuffer`] so the most recent refusals can be inspected.

mod buffer;
mod events;

pub use buffer::{BufferCapacity, CircularBuffer};
pub use events::{AccessEvent, AccessEventKind};

use std::sync::{Arc, Mutex, PoisonError};

/// Cloneable handle to a shared access-event buffer.
#[derive(Debug, Clone)]
pub struct DiagnosticsHandle {
    events: Arc<Mutex<CircularBuffer<AccessEvent>>>,
}

impl DiagnosticsHandle {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        Self {
            events: Arc::new(Mutex::new(CircularBuffer::new(capacity))),
        }
    }

    /// Records an access event.
    pub fn record(&self, event: AccessEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Returns the recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<AccessEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for DiagnosticsHandle {
    fn default() -> Self {
        Self::new(BufferCapacity::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::Role;

    #[test]
    fn clones_share_the_same_buffer() {
        let handle = DiagnosticsHandle::default();
        let clone = handle.clone();

        clone.record(AccessEvent::new(
            AccessEventKind::Forbidden,
            Some(Role::Patient),
            "/admin",
            "/home",
        ));

        assert_eq!(handle.len(), 1);
        assert_eq!(handle.events()[0].role, Some(Role::Patient));
    }

    #[test]
    fn buffer_is_bounded() {
        let handle = DiagnosticsHandle::new(BufferCapacity::new(0));
        let capacity = BufferCapacity::new(0).value();
        for i in 0..capacity + 5 {
            handle.record(AccessEvent::new(
                AccessEventKind::Unauthenticated,
                None,
                format!("/view/{i}"),
                "/",
            ));
        }
        let events = handle.events();
        assert_eq!(events.len(), capacity);
        assert_eq!(events[0].attempted_path, "/view/5");
    }

    #[test]
    fn clear_empties_the_buffer() {
        let handle = DiagnosticsHandle::default();
        handle.record(AccessEvent::new(AccessEventKind::Unauthenticated, None, "/citas", "/"));
        handle.clear();
        assert!(handle.is_empty());
    }
}
