//! Searches for `PROV_` devices over BLE for up to ten seconds.

use std::time::Duration;

use espprov::{ProvisioningClient, Security, Transport, manager};

#[tokio::main]
async fn main() -> espprov::Result<()> {
    let client = ProvisioningClient::new().await?;

    println!("Searching for PROV_ devices over BLE...");
    let search = manager::search_devices(&client, "PROV_", Transport::Ble, Security::Secure2);

    let devices = match tokio::time::timeout(Duration::from_secs(10), search).await {
        Ok(result) => result?,
        Err(_) => {
            manager::stop_search(&client);
            client.flush().await?;
            Vec::new()
        }
    };

    for device in devices {
        println!("{:30} {} {}", device.name(), device.transport(), device.security());
    }

    Ok(())
}
