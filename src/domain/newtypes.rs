// SPDX-License-Identifier: MPL-2.0
//! Clamped value types.
//!
//! These wrappers keep configuration-driven values within valid ranges so
//! call sites never need to clamp manually.

use std::time::Duration;

// =============================================================================
// Toast Lifetime
// =============================================================================

/// Toast lifetime bounds in milliseconds (0.5 s to 60 s).
pub mod toast_lifetime_bounds {
    /// Minimum lifetime.
    pub const MIN_MS: u64 = 500;
    /// Maximum lifetime.
    pub const MAX_MS: u64 = 60_000;
    /// Default lifetime.
    pub const DEFAULT_MS: u64 = 3_000;
}

/// How long a toast stays visible before it is removed automatically.
///
/// # Example
///
/// ```
/// use clinic_portal::domain::newtypes::ToastLifetime;
///
/// assert_eq!(ToastLifetime::default().as_millis(), 3_000);
///
/// // Values outside range are clamped
/// assert_eq!(ToastLifetime::from_millis(10).as_millis(), 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ToastLifetime(u64);

impl ToastLifetime {
    /// Creates a lifetime, clamping to the valid range.
    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self(ms.clamp(
            toast_lifetime_bounds::MIN_MS,
            toast_lifetime_bounds::MAX_MS,
        ))
    }

    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for ToastLifetime {
    fn default() -> Self {
        Self(toast_lifetime_bounds::DEFAULT_MS)
    }
}

// =============================================================================
// Buffer Capacity
// =============================================================================

/// Access-event buffer capacity bounds.
pub mod buffer_capacity_bounds {
    /// Minimum buffer capacity.
    pub const MIN: usize = 16;
    /// Maximum buffer capacity.
    pub const MAX: usize = 4096;
    /// Default buffer capacity.
    pub const DEFAULT: usize = 256;
}

/// Capacity of the access diagnostics buffer, in events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCapacity(usize);

impl BufferCapacity {
    /// Creates a new buffer capacity, clamping to valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(buffer_capacity_bounds::MIN, buffer_capacity_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for BufferCapacity {
    fn default() -> Self {
        Self(buffer_capacity_bounds::DEFAULT)
    }
}

// =============================================================================
// Token Max Age
// =============================================================================

/// Token lifetime bounds in seconds (1 s to 365 days).
pub mod token_max_age_bounds {
    /// Minimum lifetime.
    pub const MIN_SECS: u64 = 1;
    /// Maximum lifetime.
    pub const MAX_SECS: u64 = 365 * 24 * 60 * 60;
}

/// Lifetime of an issued access or refresh token.
///
/// # Example
///
/// ```
/// use clinic_portal::domain::newtypes::TokenMaxAge;
///
/// assert_eq!(TokenMaxAge::from_secs(3_600).as_secs(), 3_600);
/// assert_eq!(TokenMaxAge::from_secs(0).as_secs(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TokenMaxAge(u64);

impl TokenMaxAge {
    /// Creates a lifetime, clamping to the valid range.
    #[must_use]
    pub fn from_secs(secs: u64) -> Self {
        Self(secs.clamp(
            token_max_age_bounds::MIN_SECS,
            token_max_age_bounds::MAX_SECS,
        ))
    }

    #[must_use]
    pub fn as_secs(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(self.0)
    }
}
