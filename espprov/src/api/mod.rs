//! Public API module.
//!
//! This module contains the high-level user-facing API for the `espprov` crate.

pub mod backend;
pub mod client;
pub mod config;
pub mod device;
pub mod manager;
pub mod models;
