//! Client configuration.

use crate::types::constants::dbus;

/// Which message bus the provisioning runtime lives on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BusKind {
    /// The system bus (default for provisioning daemons).
    #[default]
    System,
    /// The per-user session bus.
    Session,
}

/// How concurrent [`search_devices`](crate::manager::search_devices) calls
/// made through the same client are handled.
///
/// Whether the native runtime copes with overlapping scans is up to the
/// runtime, so this is left to the caller to decide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchConcurrency {
    /// Forward every call to the runtime immediately.
    #[default]
    Native,
    /// Let at most one search per client reach the runtime at a time;
    /// later calls wait for the running one to finish.
    Serialized,
}

/// Configuration for a [`ProvisioningClient`](crate::ProvisioningClient).
///
/// # Examples
///
/// ```rust
/// use espprov::{BusKind, ClientConfig, SearchConcurrency};
///
/// let config = ClientConfig::new()
///     .with_bus(BusKind::Session)
///     .with_search_concurrency(SearchConcurrency::Serialized);
///
/// assert_eq!(config.bus, BusKind::Session);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub bus: BusKind,
    /// Well-known bus name of the runtime
    pub service_name: String,
    /// Object path of the runtime
    pub object_path: String,
    pub search_concurrency: SearchConcurrency,
}

impl Default for ClientConfig {
    /// Defaults:
    /// - `bus`: [`BusKind::System`]
    /// - `service_name`: `com.espressif.Provisioning`
    /// - `object_path`: `/com/espressif/Provisioning`
    /// - `search_concurrency`: [`SearchConcurrency::Native`]
    fn default() -> Self {
        Self {
            bus: BusKind::default(),
            service_name: dbus::SERVICE.to_string(),
            object_path: dbus::PATH.to_string(),
            search_concurrency: SearchConcurrency::default(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bus(mut self, bus: BusKind) -> Self {
        self.bus = bus;
        self
    }

    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    pub fn with_object_path(mut self, path: impl Into<String>) -> Self {
        self.object_path = path.into();
        self
    }

    pub fn with_search_concurrency(mut self, policy: SearchConcurrency) -> Self {
        self.search_concurrency = policy;
        self
    }
}
