// SPDX-License-Identifier: MPL-2.0
//! Outcome of a guard evaluation.

use crate::domain::session::Role;
use std::fmt;

/// Why a navigation was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No signed-in user.
    Unauthenticated,
    /// Signed-in user whose role is not allowed on the view.
    Forbidden { role: Option<Role> },
}

/// Result of [`RoleGuard::authorize`](super::RoleGuard::authorize).
///
/// Decisions are terminal values: a refusal is always a redirect, never an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Navigation proceeds.
    Allow,
    /// The session is still loading; hold the navigation until it resolves.
    Defer,
    /// Navigation is replaced by a redirect to `to`.
    Redirect { to: String, reason: Denial },
}

impl Decision {
    #[must_use]
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Redirect target, if any.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Decision::Redirect { to, .. } => Some(to),
            Decision::Allow | Decision::Defer => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => write!(f, "allow"),
            Decision::Defer => write!(f, "defer"),
            Decision::Redirect {
                to,
                reason: Denial::Unauthenticated,
            } => write!(f, "redirect {to} (unauthenticated)"),
            Decision::Redirect {
                to,
                reason: Denial::Forbidden { role: Some(role) },
            } => write!(f, "redirect {to} (forbidden for {role})"),
            Decision::Redirect {
                to,
                reason: Denial::Forbidden { role: None },
            } => write!(f, "redirect {to} (forbidden, no role)"),
        }
    }
}
