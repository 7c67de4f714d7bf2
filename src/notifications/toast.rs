// SPDX-License-Identifier: MPL-2.0
//! Core toast data structures.

use std::fmt;
use std::time::Instant;

/// Unique identifier for a toast.
///
/// Ids come from a process-wide counter, so two toasts created in the same
/// instant still get distinct, increasing ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

impl ToastId {
    /// Allocates the next id.
    pub fn next() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of toast. Open-ended: unknown names are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub enum ToastKind {
    #[default]
    Success,
    Error,
    Info,
    Warning,
    Other(String),
}

impl ToastKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
            ToastKind::Warning => "warning",
            ToastKind::Other(name) => name,
        }
    }
}

impl From<&str> for ToastKind {
    fn from(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "success" => ToastKind::Success,
            "error" => ToastKind::Error,
            "info" => ToastKind::Info,
            "warning" => ToastKind::Warning,
            _ => ToastKind::Other(name.to_string()),
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    id: ToastId,
    message: String,
    kind: ToastKind,
    created_at: Instant,
}

impl Toast {
    /// Creates a toast with an explicit creation instant.
    pub fn created_at(message: impl Into<String>, kind: ToastKind, created_at: Instant) -> Self {
        Self {
            id: ToastId::next(),
            message: message.into(),
            kind,
            created_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> ToastId {
        self.id
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn kind(&self) -> &ToastKind {
        &self.kind
    }

    #[must_use]
    pub fn creation_instant(&self) -> Instant {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn toast_ids_are_unique_and_increasing() {
        let ids: Vec<ToastId> = (0..1_000).map(|_| ToastId::next()).collect();
        let unique: HashSet<_> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn toasts_created_in_same_instant_get_distinct_ids() {
        let now = Instant::now();
        let a = Toast::created_at("a", ToastKind::Success, now);
        let b = Toast::created_at("b", ToastKind::Success, now);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn kind_defaults_to_success() {
        assert_eq!(ToastKind::default(), ToastKind::Success);
    }

    #[test]
    fn kind_from_name_keeps_unknown_values() {
        assert_eq!(ToastKind::from("error"), ToastKind::Error);
        assert_eq!(ToastKind::from("Info"), ToastKind::Info);
        assert_eq!(
            ToastKind::from("reminder"),
            ToastKind::Other("reminder".to_string())
        );
        assert_eq!(ToastKind::from("reminder").as_str(), "reminder");
    }
}
