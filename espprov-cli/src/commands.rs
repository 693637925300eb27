//! Command implementations

use std::time::Duration;

use anyhow::{Context, Result};
use espprov::{DeviceCapabilities, EspDevice, ProvisioningClient, Security, Transport, manager};
use log::{info, warn};
use serde::Serialize;

use crate::cli::DeviceArgs;

#[derive(Serialize)]
struct FoundDevice<'a> {
    name: &'a str,
    transport: Transport,
    security: Security,
}

pub async fn search(
    client: &ProvisioningClient,
    prefix: &str,
    transport: Transport,
    security: Security,
    timeout: Option<u64>,
    json: bool,
) -> Result<()> {
    info!("Searching for {prefix}* over {transport}");
    let search = manager::search_devices(client, prefix, transport, security);

    let devices = match timeout {
        Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), search).await {
            Ok(found) => found?,
            Err(_) => {
                warn!("Search timed out after {secs}s");
                manager::stop_search(client);
                Vec::new()
            }
        },
        None => search.await?,
    };

    if json {
        let found: Vec<_> = devices
            .iter()
            .map(|d| FoundDevice {
                name: d.name(),
                transport: d.transport(),
                security: d.security(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&found)?);
    } else if devices.is_empty() {
        println!("No devices found");
    } else {
        for d in &devices {
            println!("{:32} {:8} {}", d.name(), d.transport(), d.security());
        }
    }
    Ok(())
}

/// Connects to the device, runs `op`, and always disconnects afterwards.
///
/// Nothing is left to disconnect when setup fails before the session opens.
async fn with_device<F, Fut, T>(client: &ProvisioningClient, args: &DeviceArgs, op: F) -> Result<T>
where
    F: FnOnce(EspDevice) -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let device = EspDevice::new(client, args.device.clone())
        .with_transport(args.transport.into())
        .with_security(args.security.into());

    if let Some(uuid) = args.service_uuid {
        device
            .set_primary_service_uuid(&uuid.to_string())
            .await
            .context("failed to set the primary service UUID")?;
    }

    device
        .connect(args.credentials())
        .await
        .with_context(|| format!("failed to connect to {}", args.device))?;
    info!("Connected to {}", device.name());

    let handle = device.clone();
    let result = op(device).await;
    handle.disconnect();
    result
}

pub async fn scan_wifi(client: &ProvisioningClient, args: &DeviceArgs, json: bool) -> Result<()> {
    let networks = with_device(client, args, |device| async move {
        device.scan_wifi_list().await.map_err(anyhow::Error::from)
    })
    .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&networks)?);
        return Ok(());
    }

    for net in networks {
        println!("{:32} {:>4} dBm  {:17}  {}", net.ssid, net.rssi, net.bssid, net.auth);
    }
    Ok(())
}

pub async fn provision(
    client: &ProvisioningClient,
    args: &DeviceArgs,
    ssid: &str,
    passphrase: &str,
    json: bool,
) -> Result<()> {
    let status = with_device(client, args, |device| async move {
        device
            .provision(ssid, passphrase)
            .await
            .map_err(anyhow::Error::from)
    })
    .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else if status.success {
        println!("{} joined {ssid}", args.device);
    } else {
        anyhow::bail!(
            "provisioning failed: {}",
            status.failure_reason.as_deref().unwrap_or("unknown reason")
        );
    }
    Ok(())
}

pub async fn send(
    client: &ProvisioningClient,
    args: &DeviceArgs,
    endpoint: &str,
    data: &str,
) -> Result<()> {
    let reply = with_device(client, args, |device| async move {
        device
            .send_data(endpoint, data)
            .await
            .map_err(anyhow::Error::from)
    })
    .await?;
    println!("{reply}");
    Ok(())
}

#[derive(Serialize)]
struct DeviceInfo {
    device_name: Option<String>,
    transport: Option<Transport>,
    security: Option<Security>,
    version: Option<espprov::VersionInfo>,
    capabilities: Option<Vec<String>>,
}

pub async fn info(client: &ProvisioningClient, args: &DeviceArgs, json: bool) -> Result<()> {
    let info = with_device(client, args, |device| async move {
        Ok::<_, anyhow::Error>(DeviceInfo {
            device_name: device.get_device_name().await?,
            transport: device.get_transport_type().await?,
            security: device.get_security_type().await?,
            version: device.get_version_info().await?,
            capabilities: device.get_device_capabilities().await?,
        })
    })
    .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let unknown = || "unknown".to_string();
    println!("Device:       {}", info.device_name.unwrap_or_else(unknown));
    println!(
        "Transport:    {}",
        info.transport.map(|t| t.to_string()).unwrap_or_else(unknown)
    );
    println!(
        "Security:     {}",
        info.security.map(|s| s.to_string()).unwrap_or_else(unknown)
    );
    if let Some(version) = info.version {
        for entry in version {
            println!("Version:      {}", serde_json::Value::Object(entry));
        }
    }
    if let Some(caps) = info.capabilities {
        let flags = DeviceCapabilities::from_names(&caps);
        println!("Capabilities: {}", caps.join(", "));
        if flags.contains(DeviceCapabilities::NO_POP) {
            println!("              (no proof of possession required)");
        }
    }
    Ok(())
}
