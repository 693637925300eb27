//! Core internal logic.
//!
//! This module contains the binding of the native runtime over D-Bus and the
//! queue that delivers its no-reply calls in order.

pub(crate) mod dbus_backend;
pub(crate) mod dispatch;
