//! CLI argument parsing

use clap::{Args, Parser, Subcommand, ValueEnum};
use espprov::{BusKind, ClientConfig, Credentials, Security, Transport};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "espprov")]
#[command(author, version, about = "Provision ESP-IDF devices onto Wi-Fi", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Talk to the provisioning runtime on the session bus instead of the system bus
    #[arg(long, global = true)]
    pub session_bus: bool,

    /// Bus name of the provisioning runtime
    #[arg(long, global = true)]
    pub service: Option<String>,

    /// Object path of the provisioning runtime
    #[arg(long, global = true)]
    pub path: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        if self.session_bus {
            config = config.with_bus(BusKind::Session);
        }
        if let Some(service) = &self.service {
            config = config.with_service_name(service.clone());
        }
        if let Some(path) = &self.path {
            config = config.with_object_path(path.clone());
        }
        config
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum TransportArg {
    Ble,
    Softap,
}

impl From<TransportArg> for Transport {
    fn from(t: TransportArg) -> Self {
        match t {
            TransportArg::Ble => Transport::Ble,
            TransportArg::Softap => Transport::Softap,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SecurityArg {
    #[value(name = "0", alias = "unsecure")]
    Unsecure,
    #[value(name = "1", alias = "secure")]
    Secure,
    #[value(name = "2", alias = "secure2")]
    Secure2,
}

impl From<SecurityArg> for Security {
    fn from(s: SecurityArg) -> Self {
        match s {
            SecurityArg::Unsecure => Security::Unsecure,
            SecurityArg::Secure => Security::Secure,
            SecurityArg::Secure2 => Security::Secure2,
        }
    }
}

/// Options shared by every command that talks to one device
#[derive(Args, Debug, Clone)]
pub struct DeviceArgs {
    /// Device name as advertised during discovery
    #[arg(short, long)]
    pub device: String,

    #[arg(short, long, value_enum, default_value = "ble")]
    pub transport: TransportArg,

    #[arg(short, long, value_enum, default_value = "2")]
    pub security: SecurityArg,

    /// Proof of possession
    #[arg(long)]
    pub pop: Option<String>,

    /// Password of the device access point (SoftAP transport)
    #[arg(long)]
    pub softap_password: Option<String>,

    /// Username for security 2 sessions
    #[arg(long)]
    pub username: Option<String>,

    /// Primary BLE service UUID to set before connecting
    #[arg(long)]
    pub service_uuid: Option<Uuid>,
}

impl DeviceArgs {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            proof_of_possession: self.pop.clone(),
            softap_password: self.softap_password.clone(),
            username: self.username.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for devices by name prefix
    Search {
        /// Advertised name prefix to match
        #[arg(default_value = "PROV_")]
        prefix: String,

        #[arg(short, long, value_enum, default_value = "ble")]
        transport: TransportArg,

        #[arg(short, long, value_enum, default_value = "2")]
        security: SecurityArg,

        /// Stop the search after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// List the Wi-Fi networks a device can see
    ScanWifi {
        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Send Wi-Fi credentials to a device
    Provision {
        #[command(flatten)]
        device: DeviceArgs,

        /// Network SSID
        #[arg(long)]
        ssid: String,

        /// Network passphrase (empty for open networks)
        #[arg(long, default_value = "")]
        passphrase: String,
    },

    /// Send a text payload to a protocomm endpoint
    Send {
        #[command(flatten)]
        device: DeviceArgs,

        /// Endpoint path, e.g. custom-data
        #[arg(long)]
        endpoint: String,

        /// Payload text
        data: String,
    },

    /// Show version information and capabilities of a device
    Info {
        #[command(flatten)]
        device: DeviceArgs,
    },
}
