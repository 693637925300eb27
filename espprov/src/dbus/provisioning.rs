//! Native provisioning runtime proxy.

use std::collections::HashMap;
use zbus::{Result, proxy};

/// Proxy for the provisioning runtime interface.
///
/// Every per-device method is keyed by the device name the runtime used
/// during discovery or creation. Optional strings are sent and returned as
/// empty strings.
#[proxy(
    interface = "com.espressif.Provisioning1",
    default_service = "com.espressif.Provisioning",
    default_path = "/com/espressif/Provisioning"
)]
pub trait EspProvisioning {
    /// Creates the native session object for a device.
    ///
    /// `credentials` may carry `pop`, `softap_password` and `username`;
    /// absent credentials are omitted from the dictionary.
    fn create_device(
        &self,
        name: &str,
        transport: &str,
        security: u32,
        credentials: HashMap<&str, zvariant::Value<'_>>,
    ) -> Result<()>;

    /// Opens the transport and runs the session handshake.
    fn connect(&self, name: &str) -> Result<()>;

    /// Sends a base64 payload to a protocomm endpoint and returns the base64 reply.
    fn send_data(&self, name: &str, path: &str, data: &str) -> Result<String>;

    /// Asks the device to scan for Wi-Fi networks.
    ///
    /// Each entry is `(ssid, rssi, auth_mode, bssid)`.
    fn scan_wifi_list(&self, name: &str) -> Result<Vec<(String, i32, u32, String)>>;

    /// Tears down the native session. No reply is sent.
    #[zbus(no_reply)]
    fn disconnect(&self, name: &str) -> Result<()>;

    /// Sends Wi-Fi credentials and returns `(success, failure_reason)`.
    fn provision(&self, name: &str, ssid: &str, passphrase: &str) -> Result<(bool, String)>;

    fn get_proof_of_possession(&self, name: &str) -> Result<String>;

    fn set_proof_of_possession(&self, name: &str, pop: &str) -> Result<()>;

    fn get_username(&self, name: &str) -> Result<String>;

    fn set_username(&self, name: &str, username: &str) -> Result<()>;

    fn get_device_name(&self, name: &str) -> Result<String>;

    fn set_device_name(&self, name: &str, device_name: &str) -> Result<()>;

    fn get_primary_service_uuid(&self, name: &str) -> Result<String>;

    fn set_primary_service_uuid(&self, name: &str, uuid: &str) -> Result<()>;

    fn get_security_type(&self, name: &str) -> Result<u32>;

    fn set_security_type(&self, name: &str, security: u32) -> Result<()>;

    /// Transport identifier, `"ble"` or `"softap"`. Empty when unknown.
    fn get_transport_type(&self, name: &str) -> Result<String>;

    /// Version info as a JSON document. Empty when unknown.
    fn get_version_info(&self, name: &str) -> Result<String>;

    fn get_device_capabilities(&self, name: &str) -> Result<Vec<String>>;

    /// Scans for devices whose advertised name starts with `prefix`.
    ///
    /// Each entry is `(name, transport, security)`.
    fn search_devices(
        &self,
        prefix: &str,
        transport: &str,
        security: u32,
    ) -> Result<Vec<(String, String, u32)>>;

    /// Cancels an in-flight device search. No reply is sent.
    #[zbus(no_reply)]
    fn stop_search(&self) -> Result<()>;
}
