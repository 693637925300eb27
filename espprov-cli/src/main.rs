//! espprov - provision ESP-IDF devices onto Wi-Fi from the command line.
//!
//! Talks to the native provisioning runtime through the `espprov` library:
//! search for devices, look at what they see, and hand them credentials.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use espprov::ProvisioningClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let client = ProvisioningClient::with_config(cli.client_config()).await?;

    let result = match &cli.command {
        Commands::Search {
            prefix,
            transport,
            security,
            timeout,
        } => {
            commands::search(
                &client,
                prefix,
                (*transport).into(),
                (*security).into(),
                *timeout,
                cli.json,
            )
            .await
        }
        Commands::ScanWifi { device } => commands::scan_wifi(&client, device, cli.json).await,
        Commands::Provision {
            device,
            ssid,
            passphrase,
        } => commands::provision(&client, device, ssid, passphrase, cli.json).await,
        Commands::Send {
            device,
            endpoint,
            data,
        } => commands::send(&client, device, endpoint, data).await,
        Commands::Info { device } => commands::info(&client, device, cli.json).await,
    };

    // disconnect and stop_search only queue their calls
    client.flush().await?;
    result
}
