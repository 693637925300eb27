//! The call surface of the native provisioning runtime.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::Result;
use crate::api::models::{
    Credentials, DeviceRecord, Security, StatusResponse, Transport, VersionInfo, WifiNetwork,
};

/// A native provisioning runtime.
///
/// This is the fixed collaborator behind [`ProvisioningClient`](crate::ProvisioningClient).
/// Implementations perform the actual BLE/SoftAP communication and session
/// handshakes; everything in this crate only forwards calls to it.
///
/// Calls reach the runtime in the order they were made, including the
/// non-async [`disconnect`](Self::disconnect) and [`stop_search`](Self::stop_search).
///
/// Per-device methods are keyed by `name`, which must match the identifier the
/// runtime used during discovery or [`create_device`](Self::create_device).
/// Failures are returned as-is to the caller.
///
/// The default implementation speaks to a provisioning daemon over D-Bus.
/// Implement this trait to bind another runtime, or to drive the crate from
/// tests.
#[async_trait]
pub trait ProvisioningBackend: Send + Sync + Debug {
    async fn create_device(
        &self,
        name: &str,
        transport: Transport,
        security: Security,
        credentials: &Credentials,
    ) -> Result<()>;

    async fn connect(&self, name: &str) -> Result<()>;

    /// `data` is base64 encoded, and so is the returned reply.
    async fn send_data(&self, name: &str, path: &str, data: &str) -> Result<String>;

    async fn scan_wifi_list(&self, name: &str) -> Result<Vec<WifiNetwork>>;

    /// Dispatches a session teardown without waiting for it.
    ///
    /// Must not block and must not panic, whether or not a session exists.
    fn disconnect(&self, name: &str);

    async fn provision(&self, name: &str, ssid: &str, passphrase: &str)
    -> Result<StatusResponse>;

    async fn get_proof_of_possession(&self, name: &str) -> Result<Option<String>>;

    async fn set_proof_of_possession(&self, name: &str, pop: &str) -> Result<()>;

    async fn get_username(&self, name: &str) -> Result<Option<String>>;

    async fn set_username(&self, name: &str, username: &str) -> Result<()>;

    async fn get_device_name(&self, name: &str) -> Result<Option<String>>;

    /// Not every runtime can rename a device; such runtimes accept and ignore the call.
    async fn set_device_name(&self, name: &str, device_name: &str) -> Result<()>;

    async fn get_primary_service_uuid(&self, name: &str) -> Result<Option<String>>;

    /// Not every runtime has a primary service UUID; such runtimes accept and ignore the call.
    async fn set_primary_service_uuid(&self, name: &str, uuid: &str) -> Result<()>;

    async fn get_security_type(&self, name: &str) -> Result<Option<Security>>;

    async fn set_security_type(&self, name: &str, security: Security) -> Result<()>;

    async fn get_transport_type(&self, name: &str) -> Result<Option<Transport>>;

    async fn get_version_info(&self, name: &str) -> Result<Option<VersionInfo>>;

    async fn get_device_capabilities(&self, name: &str) -> Result<Option<Vec<String>>>;

    /// Scans for devices whose advertised name starts with `prefix`.
    ///
    /// `None` means the runtime produced no result at all.
    async fn search_devices(
        &self,
        prefix: &str,
        transport: Transport,
        security: Security,
    ) -> Result<Option<Vec<DeviceRecord>>>;

    /// Dispatches cancellation of an in-flight search without waiting for it.
    ///
    /// Must be a no-op when no search is running.
    fn stop_search(&self);

    /// Waits until every call dispatched by [`disconnect`](Self::disconnect)
    /// or [`stop_search`](Self::stop_search) has been handed to the runtime.
    ///
    /// Backends that deliver those calls before returning need not override this.
    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}
