//! In-process event primitives for Rootline.
//!
//! Front ends subscribe to the [`bus::EventBus`] to show toasts, redirect
//! on session expiry, and refresh views after mutations.

pub mod bus;

pub use bus::{AppEvent, EventBus};
