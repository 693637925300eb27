//! Device discovery.
//!
//! Discovery does not belong to any single device, so it is exposed as free
//! functions over a [`ProvisioningClient`] rather than as methods on a type.
//!
//! # Example
//!
//! ```no_run
//! use espprov::{ProvisioningClient, Security, Transport, manager};
//!
//! # async fn example() -> espprov::Result<()> {
//! let client = ProvisioningClient::new().await?;
//!
//! let devices = manager::search_devices(&client, "PROV_", Transport::Ble, Security::Secure2)
//!     .await?;
//! for device in &devices {
//!     println!("found {}", device.name());
//! }
//! # Ok(())
//! # }
//! ```

use log::debug;

use crate::Result;
use crate::api::client::ProvisioningClient;
use crate::api::device::EspDevice;
use crate::api::models::{Security, Transport};

/// Scans for devices whose advertised name starts with `prefix`.
///
/// Each result becomes an [`EspDevice`] in the order the runtime reported it.
/// If the runtime finds nothing, or returns no result at all, the list is
/// empty.
///
/// Overlapping searches on one client are forwarded to the runtime as they
/// come unless the client was configured with
/// [`SearchConcurrency::Serialized`](crate::SearchConcurrency::Serialized).
pub async fn search_devices(
    client: &ProvisioningClient,
    prefix: &str,
    transport: Transport,
    security: Security,
) -> Result<Vec<EspDevice>> {
    let records = client
        .guard_search(client.backend().search_devices(prefix, transport, security))
        .await?
        .unwrap_or_default();

    debug!("Search for {prefix:?} found {} device(s)", records.len());

    Ok(records
        .into_iter()
        .map(|record| EspDevice::from_record(client, record))
        .collect())
}

/// Cancels an in-flight search.
///
/// The cancellation is dispatched and not waited for; use
/// [`ProvisioningClient::flush`] to wait for delivery. Calling this with no
/// search running is harmless.
pub fn stop_search(client: &ProvisioningClient) {
    client.backend().stop_search();
}
