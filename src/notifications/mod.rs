// SPDX-License-Identifier: MPL-2.0
//! Toast notifications for user feedback.
//!
//! Toasts are short messages ("Cita guardada", "Credenciales inválidas")
//! that disappear on their own after a fixed lifetime, 3 s by default.
//!
//! # Components
//!
//! - [`Toast`], [`ToastId`], [`ToastKind`] - the toast itself
//! - [`ToastStore`] - ordered list of active toasts with expiry bookkeeping
//! - [`ToastService`] - shared, mutex-guarded store that arms one cancellable
//!   timer per toast
//!
//! # Usage
//!
//! ```no_run
//! use clinic_portal::notifications::{ToastKind, ToastService};
//!
//! # async fn demo() {
//! let toasts = ToastService::default();
//! let id = toasts.add("Cita guardada", ToastKind::Success);
//!
//! // User clicked the close button before the timer fired.
//! toasts.remove(id);
//! # }
//! ```

mod service;
mod store;
mod toast;

pub use service::ToastService;
pub use store::ToastStore;
pub use toast::{Toast, ToastId, ToastKind};
