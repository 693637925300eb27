use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Physical channel used to reach a device during provisioning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Bluetooth Low Energy GATT transport.
    #[default]
    Ble,
    /// Device-hosted Wi-Fi access point, reached over HTTP.
    Softap,
}

impl Transport {
    /// Returns the identifier the native runtime uses for this transport.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ble => "ble",
            Self::Softap => "softap",
        }
    }
}

impl Display for Transport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = ProvisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ble" => Ok(Self::Ble),
            "softap" => Ok(Self::Softap),
            other => Err(ProvisionError::InvalidTransport(other.to_string())),
        }
    }
}

/// Session security scheme negotiated with the device.
///
/// The numeric codes are the ones the native runtime expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Security {
    /// Plaintext session (security 0).
    Unsecure,
    /// Curve25519 key exchange with proof of possession (security 1).
    Secure,
    /// SRP6a based session with username and proof of possession (security 2).
    #[default]
    Secure2,
}

impl Security {
    /// Returns the native code for this security scheme.
    pub fn code(&self) -> u32 {
        match self {
            Self::Unsecure => 0,
            Self::Secure => 1,
            Self::Secure2 => 2,
        }
    }
}

impl TryFrom<u32> for Security {
    type Error = ProvisionError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Unsecure),
            1 => Ok(Self::Secure),
            2 => Ok(Self::Secure2),
            v => Err(ProvisionError::InvalidSecurity(v)),
        }
    }
}

impl Display for Security {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsecure => write!(f, "unsecure"),
            Self::Secure => write!(f, "secure"),
            Self::Secure2 => write!(f, "secure2"),
        }
    }
}

/// Authentication mode of a Wi-Fi network seen by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WifiAuthMode {
    Open,
    Wep,
    Wpa2Enterprise,
    Wpa2Psk,
    WpaPsk,
    WpaWpa2Psk,
    Wpa3Psk,
    Wpa2Wpa3Psk,
}

impl WifiAuthMode {
    /// Returns the native code for this auth mode.
    pub fn code(&self) -> u32 {
        match self {
            Self::Open => 0,
            Self::Wep => 1,
            Self::Wpa2Enterprise => 2,
            Self::Wpa2Psk => 3,
            Self::WpaPsk => 4,
            Self::WpaWpa2Psk => 5,
            Self::Wpa3Psk => 6,
            Self::Wpa2Wpa3Psk => 7,
        }
    }

    /// Returns `true` if joining the network needs no passphrase.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl TryFrom<u32> for WifiAuthMode {
    type Error = ProvisionError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Open),
            1 => Ok(Self::Wep),
            2 => Ok(Self::Wpa2Enterprise),
            3 => Ok(Self::Wpa2Psk),
            4 => Ok(Self::WpaPsk),
            5 => Ok(Self::WpaWpa2Psk),
            6 => Ok(Self::Wpa3Psk),
            7 => Ok(Self::Wpa2Wpa3Psk),
            v => Err(ProvisionError::InvalidAuthMode(v)),
        }
    }
}

impl Display for WifiAuthMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::Wep => write!(f, "WEP"),
            Self::Wpa2Enterprise => write!(f, "WPA2 Enterprise"),
            Self::Wpa2Psk => write!(f, "WPA2 PSK"),
            Self::WpaPsk => write!(f, "WPA PSK"),
            Self::WpaWpa2Psk => write!(f, "WPA/WPA2 PSK"),
            Self::Wpa3Psk => write!(f, "WPA3 PSK"),
            Self::Wpa2Wpa3Psk => write!(f, "WPA2/WPA3 PSK"),
        }
    }
}

/// A Wi-Fi network as seen by the device being provisioned.
///
/// Produced by [`EspDevice::scan_wifi_list`](crate::EspDevice::scan_wifi_list).
///
/// # Examples
///
/// ```no_run
/// use espprov::{Credentials, EspDevice, ProvisioningClient};
///
/// # async fn example() -> espprov::Result<()> {
/// let client = ProvisioningClient::new().await?;
/// let device = EspDevice::new(&client, "PROV_ABCD");
/// device.connect(Credentials::default()).await?;
///
/// for net in device.scan_wifi_list().await? {
///     println!("{} ({} dBm, {})", net.ssid, net.rssi, net.auth);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiNetwork {
    /// Network SSID
    pub ssid: String,
    /// Received signal strength in dBm
    pub rssi: i32,
    /// Authentication mode advertised by the access point
    pub auth: WifiAuthMode,
    /// Access point MAC address
    pub bssid: String,
}

/// Outcome of a provisioning attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Whether the device accepted the credentials and joined the network
    pub success: bool,
    /// Failure reason reported by the device, if any
    pub failure_reason: Option<String>,
}

/// Raw device record returned by a native discovery scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub name: String,
    pub transport: Transport,
    pub security: Security,
}

/// Credentials handed to the native runtime when a session is created.
///
/// Every field is optional; absent values are passed through as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Shared secret proving the caller may provision the device
    pub proof_of_possession: Option<String>,
    /// Password of the device access point (SoftAP transport only)
    pub softap_password: Option<String>,
    /// Username for `Security::Secure2` sessions
    pub username: Option<String>,
}

impl Credentials {
    /// Credentials carrying only a proof of possession.
    pub fn with_pop(pop: impl Into<String>) -> Self {
        Self {
            proof_of_possession: Some(pop.into()),
            ..Self::default()
        }
    }
}

/// Protocol version information reported by the device.
///
/// Each entry is one JSON object from the device's version endpoint,
/// e.g. `{"prov": {"ver": "v1.1", "cap": ["wifi_scan"]}}`.
pub type VersionInfo = Vec<serde_json::Map<String, serde_json::Value>>;

bitflags! {
    /// Capabilities advertised by ESP provisioning firmware.
    ///
    /// Decoded from the capability strings returned by
    /// [`EspDevice::get_device_capabilities`](crate::EspDevice::get_device_capabilities).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeviceCapabilities: u32 {
        /// The device can scan for Wi-Fi networks on request.
        const WIFI_SCAN = 0x1;
        /// The device does not require a proof of possession.
        const NO_POP = 0x2;
        /// The device only supports an unsecured session.
        const NO_SEC = 0x4;
        /// The device exposes the local control endpoint.
        const LOCAL_CTRL = 0x8;
    }
}

impl DeviceCapabilities {
    /// Decodes capability names, ignoring any this crate does not know.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        names
            .iter()
            .filter_map(|n| match n.as_ref() {
                "wifi_scan" => Some(Self::WIFI_SCAN),
                "no_pop" => Some(Self::NO_POP),
                "no_sec" => Some(Self::NO_SEC),
                "local_ctrl" => Some(Self::LOCAL_CTRL),
                _ => None,
            })
            .fold(Self::empty(), |acc, c| acc | c)
    }
}

/// Errors that can occur while talking to the native provisioning runtime.
///
/// Nothing here is recovered locally: every failure is surfaced to the caller
/// as-is and no operation is retried.
///
/// # Examples
///
/// ```no_run
/// use espprov::{ProvisionError, ProvisioningClient};
///
/// # async fn example() {
/// match ProvisioningClient::new().await {
///     Ok(_) => println!("runtime available"),
///     Err(ProvisionError::NotLinked(hint)) => eprintln!("{hint}"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// # }
/// ```
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The native provisioning runtime is not registered on the bus.
    #[error("native provisioning runtime is not available: {0}")]
    NotLinked(String),

    /// The native runtime reported a failure. The message is passed through verbatim.
    #[error("{0}")]
    Native(String),

    /// A D-Bus communication error occurred.
    #[error("D-Bus error: {0}")]
    Dbus(#[from] zbus::Error),

    /// The native runtime returned a payload that is not valid base64.
    #[error("malformed base64 response: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// The native runtime returned a structurally invalid response.
    #[error("invalid response from native runtime: {0}")]
    InvalidResponse(String),

    /// Unknown transport identifier.
    #[error("unknown transport: {0}")]
    InvalidTransport(String),

    /// Unknown security code.
    #[error("unknown security code: {0}")]
    InvalidSecurity(u32),

    /// Unknown Wi-Fi auth mode code.
    #[error("unknown Wi-Fi auth mode: {0}")]
    InvalidAuthMode(u32),
}
