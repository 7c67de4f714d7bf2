// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Notifications**: Toast lifetime
//! - **Navigation**: Sign-in and fallback views
//! - **Auth**: Backend endpoints, token lifetimes and JSON pointers
//! - **Diagnostics**: Access event buffer

use crate::domain::newtypes::{buffer_capacity_bounds, toast_lifetime_bounds};

// ==========================================================================
// Notification Defaults
// ==========================================================================

/// Default toast lifetime (in milliseconds).
pub const DEFAULT_TOAST_LIFETIME_MS: u64 = toast_lifetime_bounds::DEFAULT_MS;

/// Minimum toast lifetime (in milliseconds).
pub const MIN_TOAST_LIFETIME_MS: u64 = toast_lifetime_bounds::MIN_MS;

/// Maximum toast lifetime (in milliseconds).
pub const MAX_TOAST_LIFETIME_MS: u64 = toast_lifetime_bounds::MAX_MS;

// ==========================================================================
// Navigation Defaults
// ==========================================================================

/// View holding the sign-in form.
pub const DEFAULT_SIGN_IN_PATH: &str = "/";

/// Safe view for authenticated users refused by a role guard.
pub const DEFAULT_HOME_PATH: &str = "/home";

// ==========================================================================
// Auth Defaults
// ==========================================================================

/// Backend base URL used when neither the config nor the environment sets one.
pub const DEFAULT_API_BASE: &str = "http://localhost:3000";

/// Path prefix of the authentication routes on the backend.
pub const DEFAULT_AUTH_BASE_PATH: &str = "/autenticacionRoutes";

pub const DEFAULT_SIGN_IN_ENDPOINT: &str = "/login";
pub const DEFAULT_SIGN_OUT_ENDPOINT: &str = "/logout";
pub const DEFAULT_SESSION_ENDPOINT: &str = "/user/profile";
pub const DEFAULT_REFRESH_ENDPOINT: &str = "/user/refreshtoken";

/// Header carrying the access token.
pub const DEFAULT_TOKEN_HEADER: &str = "Authorization";

/// Scheme prefixed to the access token in the header.
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Access token lifetime (one hour).
pub const DEFAULT_ACCESS_TOKEN_MAX_AGE_SECS: u64 = 60 * 60;

/// Refresh token lifetime (seven days).
pub const DEFAULT_REFRESH_TOKEN_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 7;

/// JSON pointer to the access token in sign-in and refresh responses.
pub const DEFAULT_TOKEN_POINTER: &str = "/token";

/// JSON pointer to the refresh token in sign-in responses and refresh requests.
pub const DEFAULT_REFRESH_TOKEN_POINTER: &str = "/refreshToken";

// ==========================================================================
// Logging / Diagnostics Defaults
// ==========================================================================

/// Default `tracing` filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default number of access events kept in memory.
pub const DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY: usize = buffer_capacity_bounds::DEFAULT;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_TOAST_LIFETIME_MS > 0);
    assert!(MAX_TOAST_LIFETIME_MS >= MIN_TOAST_LIFETIME_MS);
    assert!(DEFAULT_TOAST_LIFETIME_MS >= MIN_TOAST_LIFETIME_MS);
    assert!(DEFAULT_TOAST_LIFETIME_MS <= MAX_TOAST_LIFETIME_MS);

    assert!(DEFAULT_ACCESS_TOKEN_MAX_AGE_SECS > 0);
    assert!(DEFAULT_REFRESH_TOKEN_MAX_AGE_SECS > DEFAULT_ACCESS_TOKEN_MAX_AGE_SECS);

    assert!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY >= buffer_capacity_bounds::MIN);
    assert!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY <= buffer_capacity_bounds::MAX);
};
