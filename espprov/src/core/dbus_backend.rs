//! D-Bus binding of the native provisioning runtime.
//!
//! Forwards every [`ProvisioningBackend`] call to the provisioning daemon
//! through [`EspProvisioningProxy`] and converts the bus representation back
//! into the crate's types.

use async_trait::async_trait;
use log::{debug, warn};
use std::collections::HashMap;
use zbus::Connection;
use zbus::fdo::DBusProxy;
use zbus::names::BusName;
use zvariant::Value;

use crate::Result;
use crate::api::backend::ProvisioningBackend;
use crate::api::config::{BusKind, ClientConfig};
use crate::api::models::{
    Credentials, DeviceRecord, ProvisionError, Security, StatusResponse, Transport, VersionInfo,
    WifiAuthMode, WifiNetwork,
};
use crate::core::dispatch::DispatchQueue;
use crate::dbus::EspProvisioningProxy;
use crate::types::constants::{LINKING_HINT, credential_keys};

/// [`ProvisioningBackend`] backed by a provisioning daemon on D-Bus.
#[derive(Debug, Clone)]
pub(crate) struct DbusBackend {
    proxy: EspProvisioningProxy<'static>,
    queue: DispatchQueue,
}

impl DbusBackend {
    /// Connects to the configured bus and verifies the runtime is registered.
    ///
    /// Fails with [`ProvisionError::NotLinked`] when nobody owns the service name.
    pub(crate) async fn connect(config: &ClientConfig) -> Result<Self> {
        let conn = match config.bus {
            BusKind::System => Connection::system().await?,
            BusKind::Session => Connection::session().await?,
        };

        ensure_registered(&conn, &config.service_name).await?;

        let proxy = EspProvisioningProxy::builder(&conn)
            .destination(config.service_name.clone())?
            .path(config.object_path.clone())?
            .build()
            .await?;

        debug!(
            "Bound to provisioning runtime {} at {}",
            config.service_name, config.object_path
        );

        let queue = DispatchQueue::start(&conn, proxy.clone());
        Ok(Self { proxy, queue })
    }

    /// Returns the proxy once every queued no-reply call has gone out.
    async fn ready(&self) -> &EspProvisioningProxy<'static> {
        self.queue.flush().await;
        &self.proxy
    }
}

/// Checks that `service` has an owner on the bus.
async fn ensure_registered(conn: &Connection, service: &str) -> Result<()> {
    let name = BusName::try_from(service).map_err(|e| {
        ProvisionError::NotLinked(format!("invalid service name '{service}': {e}"))
    })?;

    let dbus = DBusProxy::new(conn).await?;
    let owned = dbus
        .name_has_owner(name)
        .await
        .map_err(zbus::Error::from)?;

    if !owned {
        return Err(ProvisionError::NotLinked(format!(
            "'{service}' is not registered on the bus.\n{LINKING_HINT}"
        )));
    }
    Ok(())
}

/// Maps a bus error, passing native method errors through verbatim.
fn native(e: zbus::Error) -> ProvisionError {
    match e {
        zbus::Error::MethodError(_, Some(msg), _) => ProvisionError::Native(msg),
        zbus::Error::MethodError(name, None, _) => ProvisionError::Native(name.to_string()),
        other => ProvisionError::Dbus(other),
    }
}

/// The runtime returns unset strings as empty strings.
fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

fn credentials_dict(credentials: &Credentials) -> HashMap<&'static str, Value<'_>> {
    let mut dict = HashMap::new();
    if let Some(pop) = &credentials.proof_of_possession {
        dict.insert(credential_keys::POP, Value::from(pop.as_str()));
    }
    if let Some(pwd) = &credentials.softap_password {
        dict.insert(credential_keys::SOFTAP_PASSWORD, Value::from(pwd.as_str()));
    }
    if let Some(user) = &credentials.username {
        dict.insert(credential_keys::USERNAME, Value::from(user.as_str()));
    }
    dict
}

/// Parses the version document, which is either one JSON object or an array of them.
pub(crate) fn parse_version_info(raw: &str) -> Result<VersionInfo> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| ProvisionError::InvalidResponse(format!("version info: {e}")))?;

    match value {
        serde_json::Value::Object(map) => Ok(vec![map]),
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::Object(map) => Ok(map),
                other => Err(ProvisionError::InvalidResponse(format!(
                    "version info entry is not an object: {other}"
                ))),
            })
            .collect(),
        other => Err(ProvisionError::InvalidResponse(format!(
            "version info is not an object: {other}"
        ))),
    }
}

/// Converts scan entries, dropping networks with an auth mode this crate does not model.
fn wifi_networks(raw: Vec<(String, i32, u32, String)>) -> Vec<WifiNetwork> {
    raw.into_iter()
        .filter_map(|(ssid, rssi, auth, bssid)| match WifiAuthMode::try_from(auth) {
            Ok(auth) => Some(WifiNetwork {
                ssid,
                rssi,
                auth,
                bssid,
            }),
            Err(e) => {
                warn!("Skipping network '{ssid}': {e}");
                None
            }
        })
        .collect()
}

/// Converts discovery entries one for one.
///
/// A transport or security value this crate does not model falls back to the
/// one the search was made with, so no discovered device is dropped.
fn device_records(
    raw: Vec<(String, String, u32)>,
    transport: Transport,
    security: Security,
) -> Vec<DeviceRecord> {
    raw.into_iter()
        .map(|(name, raw_transport, raw_security)| {
            let transport = raw_transport.parse().unwrap_or_else(|e| {
                warn!("Device '{name}': {e}, assuming {transport}");
                transport
            });
            let security = Security::try_from(raw_security).unwrap_or_else(|e| {
                warn!("Device '{name}': {e}, assuming {security}");
                security
            });
            DeviceRecord {
                name,
                transport,
                security,
            }
        })
        .collect()
}

#[async_trait]
impl ProvisioningBackend for DbusBackend {
    async fn create_device(
        &self,
        name: &str,
        transport: Transport,
        security: Security,
        credentials: &Credentials,
    ) -> Result<()> {
        debug!("CreateDevice {name} ({transport}, {security})");
        self.ready()
            .await
            .create_device(
                name,
                transport.as_str(),
                security.code(),
                credentials_dict(credentials),
            )
            .await
            .map_err(native)
    }

    async fn connect(&self, name: &str) -> Result<()> {
        debug!("Connect {name}");
        self.ready().await.connect(name).await.map_err(native)
    }

    async fn send_data(&self, name: &str, path: &str, data: &str) -> Result<String> {
        debug!("SendData {name} {path}");
        let proxy = self.ready().await;
        proxy.send_data(name, path, data).await.map_err(native)
    }

    async fn scan_wifi_list(&self, name: &str) -> Result<Vec<WifiNetwork>> {
        debug!("ScanWifiList {name}");
        let raw = self.ready().await.scan_wifi_list(name).await.map_err(native)?;
        Ok(wifi_networks(raw))
    }

    fn disconnect(&self, name: &str) {
        debug!("Disconnect {name}");
        self.queue.disconnect(name);
    }

    async fn provision(
        &self,
        name: &str,
        ssid: &str,
        passphrase: &str,
    ) -> Result<StatusResponse> {
        debug!("Provision {name} with network {ssid}");
        let (success, reason) = self
            .ready()
            .await
            .provision(name, ssid, passphrase)
            .await
            .map_err(native)?;
        Ok(StatusResponse {
            success,
            failure_reason: non_empty(reason),
        })
    }

    async fn get_proof_of_possession(&self, name: &str) -> Result<Option<String>> {
        let proxy = self.ready().await;
        let pop = proxy.get_proof_of_possession(name).await.map_err(native)?;
        Ok(non_empty(pop))
    }

    async fn set_proof_of_possession(&self, name: &str, pop: &str) -> Result<()> {
        let proxy = self.ready().await;
        proxy.set_proof_of_possession(name, pop).await.map_err(native)
    }

    async fn get_username(&self, name: &str) -> Result<Option<String>> {
        let user = self.ready().await.get_username(name).await.map_err(native)?;
        Ok(non_empty(user))
    }

    async fn set_username(&self, name: &str, username: &str) -> Result<()> {
        let proxy = self.ready().await;
        proxy.set_username(name, username).await.map_err(native)
    }

    async fn get_device_name(&self, name: &str) -> Result<Option<String>> {
        let proxy = self.ready().await;
        let device_name = proxy.get_device_name(name).await.map_err(native)?;
        Ok(non_empty(device_name))
    }

    async fn set_device_name(&self, name: &str, device_name: &str) -> Result<()> {
        let proxy = self.ready().await;
        proxy.set_device_name(name, device_name).await.map_err(native)
    }

    async fn get_primary_service_uuid(&self, name: &str) -> Result<Option<String>> {
        let proxy = self.ready().await;
        let uuid = proxy.get_primary_service_uuid(name).await.map_err(native)?;
        Ok(non_empty(uuid))
    }

    async fn set_primary_service_uuid(&self, name: &str, uuid: &str) -> Result<()> {
        let proxy = self.ready().await;
        proxy.set_primary_service_uuid(name, uuid).await.map_err(native)
    }

    async fn get_security_type(&self, name: &str) -> Result<Option<Security>> {
        let proxy = self.ready().await;
        let code = proxy.get_security_type(name).await.map_err(native)?;
        Security::try_from(code).map(Some)
    }

    async fn set_security_type(&self, name: &str, security: Security) -> Result<()> {
        let proxy = self.ready().await;
        proxy
            .set_security_type(name, security.code())
            .await
            .map_err(native)
    }

    async fn get_transport_type(&self, name: &str) -> Result<Option<Transport>> {
        let proxy = self.ready().await;
        let raw = proxy.get_transport_type(name).await.map_err(native)?;
        non_empty(raw).map(|t| t.parse()).transpose()
    }

    async fn get_version_info(&self, name: &str) -> Result<Option<VersionInfo>> {
        let proxy = self.ready().await;
        let raw = proxy.get_version_info(name).await.map_err(native)?;
        non_empty(raw).map(|r| parse_version_info(&r)).transpose()
    }

    async fn get_device_capabilities(&self, name: &str) -> Result<Option<Vec<String>>> {
        let proxy = self.ready().await;
        let caps = proxy.get_device_capabilities(name).await.map_err(native)?;
        Ok(Some(caps))
    }

    async fn search_devices(
        &self,
        prefix: &str,
        transport: Transport,
        security: Security,
    ) -> Result<Option<Vec<DeviceRecord>>> {
        debug!("SearchDevices prefix={prefix:?} ({transport}, {security})");
        let raw = self
            .ready()
            .await
            .search_devices(prefix, transport.as_str(), security.code())
            .await
            .map_err(native)?;

        Ok(Some(device_records(raw, transport, security)))
    }

    fn stop_search(&self) {
        debug!("StopSearch");
        self.queue.stop_search();
    }

    async fn flush(&self) -> Result<()> {
        self.queue.flush().await;
        Ok(())
    }
}
