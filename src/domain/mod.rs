// SPDX-License-Identifier: MPL-2.0
//! Domain layer - session, access and notification value types.
//!
//! Nothing in here depends on external crates. Parsing from configuration
//! and wire formats happens at the edges (`config`, `auth`).
//!
//! # Modules
//!
//! - [`session`]: [`Session`](session::Session), [`Role`](session::Role),
//!   [`SessionStatus`](session::SessionStatus), [`SessionData`](session::SessionData)
//! - [`access`]: [`AllowedRoles`](access::AllowedRoles),
//!   [`RouteAccessTable`](access::RouteAccessTable)
//! - [`newtypes`]: [`ToastLifetime`](newtypes::ToastLifetime),
//!   [`TokenMaxAge`](newtypes::TokenMaxAge),
//!   [`BufferCapacity`](newtypes::BufferCapacity)

pub mod access;
pub mod newtypes;
pub mod session;
