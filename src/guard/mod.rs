// SPDX-License-Identifier: MPL-2.0
//! Role-based navigation guards.
//!
//! A guard is evaluated before entering a view. It reads the current
//! [`Session`](crate::domain::session::Session), passed in by the caller, and
//! returns a [`Decision`]. Two configurations are provided by one type:
//!
//! - [`RoleGuard::per_route`] reads each view's allowed roles from a
//!   [`RouteAccessTable`](crate::domain::access::RouteAccessTable), sends
//!   anonymous users to the sign-in view and refused users to the home view.
//! - [`RoleGuard::specialist_only`] admits only specialists, sends everybody
//!   else to `/`, and leaves anonymous users to the session provider.

mod decision;
mod role_guard;

pub use decision::{Decision, Denial};
pub use role_guard::{RoleGuard, RoleSource, UnauthenticatedPolicy};
