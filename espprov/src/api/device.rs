use log::debug;

use crate::Result;
use crate::api::client::ProvisioningClient;
use crate::api::models::{
    Credentials, DeviceRecord, Security, StatusResponse, Transport, VersionInfo, WifiNetwork,
};
use crate::util::payload::{decode_payload, encode_payload};

/// One physical ESP device and the way to reach it.
///
/// An `EspDevice` is only an identity: its name, transport, and security
/// scheme. Every operation is forwarded to the native runtime keyed by
/// [`name`](Self::name); session and connection state live in the runtime.
///
/// Constructing a device allocates nothing natively. [`connect`](Self::connect)
/// creates the native session object and connects it, and
/// [`disconnect`](Self::disconnect) tears it down again. Dropping the handle
/// does not disconnect.
///
/// # Examples
///
/// ```no_run
/// use espprov::{Credentials, EspDevice, ProvisioningClient, Security, Transport};
///
/// # async fn example() -> espprov::Result<()> {
/// let client = ProvisioningClient::new().await?;
///
/// let device = EspDevice::new(&client, "PROV_ABCD")
///     .with_transport(Transport::Ble)
///     .with_security(Security::Secure2);
///
/// device
///     .connect(Credentials {
///         proof_of_possession: Some("abcd1234".into()),
///         username: Some("wifiprov".into()),
///         ..Credentials::default()
///     })
///     .await?;
///
/// let status = device.provision("HomeWiFi", "correct horse").await?;
/// println!("provisioned: {}", status.success);
///
/// device.disconnect();
/// client.flush().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EspDevice {
    client: ProvisioningClient,
    name: String,
    transport: Transport,
    security: Security,
}

impl EspDevice {
    /// Creates a handle for the device called `name`.
    ///
    /// Uses [`Transport::Ble`] and [`Security::Secure2`] unless overridden with
    /// [`with_transport`](Self::with_transport) and [`with_security`](Self::with_security).
    /// The name must match the one the runtime reports during discovery.
    pub fn new(client: &ProvisioningClient, name: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            name: name.into(),
            transport: Transport::default(),
            security: Security::default(),
        }
    }

    /// Wraps a record produced by a native discovery scan.
    pub fn from_record(client: &ProvisioningClient, record: DeviceRecord) -> Self {
        Self {
            client: client.clone(),
            name: record.name,
            transport: record.transport,
            security: record.security,
        }
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_security(mut self, security: Security) -> Self {
        self.security = security;
        self
    }

    /// The name every native call is keyed by.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn security(&self) -> Security {
        self.security
    }

    /// Creates the native session object and connects to the device.
    ///
    /// All credentials are optional. Transport-level retries, if any, happen
    /// inside the runtime.
    ///
    /// # Errors
    ///
    /// Returns the runtime's error when the device is unreachable, the
    /// credentials are rejected, or the security scheme does not match.
    pub async fn connect(&self, credentials: Credentials) -> Result<()> {
        let backend = self.client.backend();
        backend
            .create_device(&self.name, self.transport, self.security, &credentials)
            .await?;
        backend.connect(&self.name).await?;
        debug!("Connected to {}", self.name);
        Ok(())
    }

    /// Sends a text payload to a protocomm endpoint and returns the text reply.
    ///
    /// The payload is base64 encoded on the way out and the reply base64
    /// decoded on the way back; the runtime only ever sees base64.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Encoding`](crate::ProvisionError::Encoding) if the
    /// runtime replies with malformed base64.
    pub async fn send_data(&self, path: &str, data: &str) -> Result<String> {
        let reply = self
            .client
            .backend()
            .send_data(&self.name, path, &encode_payload(data))
            .await?;
        decode_payload(&reply)
    }

    /// Lists the Wi-Fi networks the device can see. Requires an active connection.
    pub async fn scan_wifi_list(&self) -> Result<Vec<WifiNetwork>> {
        self.client.backend().scan_wifi_list(&self.name).await
    }

    /// Tears down the native session.
    ///
    /// The teardown is dispatched and not waited for. This never fails, even
    /// when no session exists. It still reaches the runtime ahead of any call
    /// made after it; use [`ProvisioningClient::flush`] to wait for delivery.
    pub fn disconnect(&self) {
        self.client.backend().disconnect(&self.name);
    }

    /// Sends Wi-Fi credentials to the connected device.
    ///
    /// Passphrase and SSID are not validated here; the runtime and the device
    /// reject what they cannot use.
    pub async fn provision(&self, ssid: &str, passphrase: &str) -> Result<StatusResponse> {
        self.client
            .backend()
            .provision(&self.name, ssid, passphrase)
            .await
    }

    pub async fn get_proof_of_possession(&self) -> Result<Option<String>> {
        self.client
            .backend()
            .get_proof_of_possession(&self.name)
            .await
    }

    pub async fn set_proof_of_possession(&self, pop: &str) -> Result<&Self> {
        self.client
            .backend()
            .set_proof_of_possession(&self.name, pop)
            .await?;
        Ok(self)
    }

    pub async fn get_username(&self) -> Result<Option<String>> {
        self.client.backend().get_username(&self.name).await
    }

    pub async fn set_username(&self, username: &str) -> Result<&Self> {
        self.client
            .backend()
            .set_username(&self.name, username)
            .await?;
        Ok(self)
    }

    /// Returns the name the runtime currently holds for this device.
    pub async fn get_device_name(&self) -> Result<Option<String>> {
        self.client.backend().get_device_name(&self.name).await
    }

    /// Asks the runtime to rename the device.
    ///
    /// Not portable: some runtimes (the iOS one, for instance) cannot rename a
    /// device and accept the call without effect. The handle keeps addressing
    /// the device by its original [`name`](Self::name) either way.
    pub async fn set_device_name(&self, device_name: &str) -> Result<&Self> {
        self.client
            .backend()
            .set_device_name(&self.name, device_name)
            .await?;
        Ok(self)
    }

    /// Returns the primary BLE service UUID. Runtimes without one return `None`.
    pub async fn get_primary_service_uuid(&self) -> Result<Option<String>> {
        self.client
            .backend()
            .get_primary_service_uuid(&self.name)
            .await
    }

    /// Sets the primary BLE service UUID.
    ///
    /// Not portable: runtimes without a primary service UUID accept the call
    /// without effect.
    pub async fn set_primary_service_uuid(&self, uuid: &str) -> Result<&Self> {
        self.client
            .backend()
            .set_primary_service_uuid(&self.name, uuid)
            .await?;
        Ok(self)
    }

    pub async fn get_security_type(&self) -> Result<Option<Security>> {
        self.client.backend().get_security_type(&self.name).await
    }

    /// Changes the security scheme of the native session object.
    ///
    /// This does not change [`security`](Self::security), which is what the
    /// next [`connect`](Self::connect) creates the session with.
    pub async fn set_security_type(&self, security: Security) -> Result<&Self> {
        self.client
            .backend()
            .set_security_type(&self.name, security)
            .await?;
        Ok(self)
    }

    pub async fn get_transport_type(&self) -> Result<Option<Transport>> {
        self.client.backend().get_transport_type(&self.name).await
    }

    pub async fn get_version_info(&self) -> Result<Option<VersionInfo>> {
        self.client.backend().get_version_info(&self.name).await
    }

    /// Returns the raw capability strings. See
    /// [`DeviceCapabilities::from_names`](crate::DeviceCapabilities::from_names)
    /// for a decoded view.
    pub async fn get_device_capabilities(&self) -> Result<Option<Vec<String>>> {
        self.client
            .backend()
            .get_device_capabilities(&self.name)
            .await
    }
}
