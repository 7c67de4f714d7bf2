// SPDX-License-Identifier: MPL-2.0
//! `clinic_portal` holds the client-side core of a clinic portal: transient
//! toast notifications and role-based navigation guards.
//!
//! Guards read the current [`domain::session::Session`] published by the
//! [`auth::SessionManager`] and answer with a [`guard::Decision`]. Refused
//! navigations are logged with `tracing` and kept in a bounded
//! [`diagnostics::DiagnosticsHandle`] buffer.

#![doc(html_root_url = "https://docs.rs/clinic_portal/0.1.0")]

pub mod auth;
pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod guard;
pub mod notifications;
