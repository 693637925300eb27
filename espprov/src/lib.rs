//! A Rust library for provisioning ESP-IDF devices onto Wi-Fi.
//!
//! The BLE/SoftAP transports, the session security handshakes, and the
//! device-side Wi-Fi scan all live in a native provisioning runtime. This
//! crate is the typed, async layer in front of it:
//!
//! - Discovering devices by name prefix
//! - Connecting a session with optional proof of possession, SoftAP password
//!   and username
//! - Exchanging payloads with protocomm endpoints
//! - Listing the Wi-Fi networks a device sees and provisioning credentials
//!
//! # Example
//!
//! ```no_run
//! use espprov::{Credentials, ProvisioningClient, Security, Transport, manager};
//!
//! # async fn example() -> espprov::Result<()> {
//! let client = ProvisioningClient::new().await?;
//!
//! let devices = manager::search_devices(&client, "PROV_", Transport::Ble, Security::Secure2)
//!     .await?;
//!
//! if let Some(device) = devices.first() {
//!     device.connect(Credentials::with_pop("abcd1234")).await?;
//!     for net in device.scan_wifi_list().await? {
//!         println!("{} ({} dBm)", net.ssid, net.rssi);
//!     }
//!     device.provision("MyNetwork", "password123").await?;
//!     device.disconnect();
//! }
//! client.flush().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # The Native Runtime
//!
//! By default [`ProvisioningClient::new`] binds to a provisioning daemon on the
//! system D-Bus and fails right away with [`ProvisionError::NotLinked`] when
//! the daemon is not registered. Any other runtime can be plugged in by
//! implementing [`ProvisioningBackend`] and passing it to
//! [`ProvisioningClient::with_backend`].
//!
//! # Error Handling
//!
//! All operations return `Result<T, ProvisionError>`. Runtime failures are
//! surfaced verbatim as [`ProvisionError::Native`]; nothing is retried.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade for logging. To see
//! log output, add a logging implementation like `env_logger`.

// Internal implementation modules
mod core;
mod dbus;
mod types;
mod util;

// Public API modules
pub mod api;

// Re-exported public API
pub use api::backend::ProvisioningBackend;
pub use api::client::ProvisioningClient;
pub use api::config::{BusKind, ClientConfig, SearchConcurrency};
pub use api::device::EspDevice;
pub use api::manager;
pub use api::models::{
    Credentials, DeviceCapabilities, DeviceRecord, ProvisionError, Security, StatusResponse,
    Transport, VersionInfo, WifiAuthMode, WifiNetwork,
};

/// A specialized `Result` type for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisionError>;
