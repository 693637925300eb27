//! Utility functions.

pub(crate) mod payload;
