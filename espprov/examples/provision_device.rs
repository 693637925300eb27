//! Connects to one device over BLE, lists what it can see, and provisions it.

use espprov::{Credentials, EspDevice, ProvisioningClient, Security, Transport};

#[tokio::main]
async fn main() -> espprov::Result<()> {
    let client = ProvisioningClient::new().await?;

    let device = EspDevice::new(&client, "PROV_ABCD")
        .with_transport(Transport::Ble)
        .with_security(Security::Secure2);

    device
        .connect(Credentials {
            proof_of_possession: Some("abcd1234".into()),
            username: Some("wifiprov".into()),
            ..Credentials::default()
        })
        .await?;

    for net in device.scan_wifi_list().await? {
        println!("{:32} {:>4} dBm  {}", net.ssid, net.rssi, net.auth);
    }

    let status = device
        .provision(
            "MyNetwork",
            &std::env::var("WIFI_PASSWORD").unwrap_or_else(|_| "password".to_string()),
        )
        .await?;

    match status.failure_reason {
        None if status.success => println!("Provisioned"),
        reason => println!("Provisioning failed: {}", reason.unwrap_or_default()),
    }

    device.disconnect();
    client.flush().await?;
    Ok(())
}
