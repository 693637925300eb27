//! Tests for device discovery.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{Call, MockBackend, client_with, record};
use espprov::{
    ClientConfig, ProvisionError, ProvisioningClient, SearchConcurrency, Security, Transport,
    manager,
};

#[tokio::test]
async fn search_preserves_order_and_fields() {
    let records = vec![
        record("PROV_C3", Transport::Ble, Security::Secure2),
        record("PROV_A1", Transport::Softap, Security::Unsecure),
        record("PROV_B2", Transport::Ble, Security::Secure),
    ];
    let (client, backend) = client_with(MockBackend::new());
    *backend.search_result.lock().unwrap() = Some(records.clone());

    let devices = manager::search_devices(&client, "PROV_", Transport::Ble, Security::Secure2)
        .await
        .unwrap();

    assert_eq!(devices.len(), records.len());
    for (device, rec) in devices.iter().zip(&records) {
        assert_eq!(device.name(), rec.name);
        assert_eq!(device.transport(), rec.transport);
        assert_eq!(device.security(), rec.security);
    }
    assert_eq!(
        backend.calls(),
        vec![Call::SearchDevices {
            prefix: "PROV_".into(),
            transport: Transport::Ble,
            security: Security::Secure2,
        }]
    );
}

#[tokio::test]
async fn search_with_no_matches_is_empty() {
    let (client, _backend) = client_with(MockBackend::new());

    let devices = manager::search_devices(&client, "NOPE_", Transport::Ble, Security::Secure2)
        .await
        .unwrap();

    assert!(devices.is_empty());
}

#[tokio::test]
async fn search_with_absent_result_is_empty() {
    let (client, backend) = client_with(MockBackend::new());
    *backend.search_result.lock().unwrap() = None;

    let devices = manager::search_devices(&client, "PROV_", Transport::Softap, Security::Secure)
        .await
        .unwrap();

    assert!(devices.is_empty());
}

#[tokio::test]
async fn search_failure_is_surfaced() {
    let (client, backend) = client_with(MockBackend::new());
    backend.fail_next("Bluetooth is powered off");

    let err = manager::search_devices(&client, "PROV_", Transport::Ble, Security::Secure2)
        .await
        .unwrap_err();

    assert!(matches!(err, ProvisionError::Native(ref m) if m == "Bluetooth is powered off"));
}

#[tokio::test]
async fn discovered_devices_use_the_same_client() {
    let (client, backend) = client_with(MockBackend::new());
    *backend.search_result.lock().unwrap() =
        Some(vec![record("PROV_ABCD", Transport::Ble, Security::Secure2)]);

    let devices = manager::search_devices(&client, "PROV_", Transport::Ble, Security::Secure2)
        .await
        .unwrap();
    devices[0].disconnect();

    assert_eq!(
        backend.calls().last(),
        Some(&Call::Disconnect("PROV_ABCD".into()))
    );
}

#[test]
fn stop_search_without_search_is_harmless() {
    let (client, backend) = client_with(MockBackend::new());

    manager::stop_search(&client);
    manager::stop_search(&client);

    assert_eq!(backend.calls(), vec![Call::StopSearch, Call::StopSearch]);
}

async fn overlapping_searches(policy: SearchConcurrency) -> usize {
    let backend = Arc::new(MockBackend {
        search_delay: Duration::from_millis(50),
        ..MockBackend::default()
    });
    let client = ProvisioningClient::from_parts(
        backend.clone(),
        ClientConfig::new().with_search_concurrency(policy),
    );

    let a = manager::search_devices(&client, "PROV_", Transport::Ble, Security::Secure2);
    let b = manager::search_devices(&client, "PROV_", Transport::Ble, Security::Secure2);
    let (ra, rb) = tokio::join!(a, b);
    ra.unwrap();
    rb.unwrap();

    let max = *backend.max_concurrent_searches.lock().unwrap();
    max
}

#[tokio::test]
async fn native_policy_forwards_overlapping_searches() {
    assert_eq!(overlapping_searches(SearchConcurrency::Native).await, 2);
}

#[tokio::test]
async fn serialized_policy_runs_one_search_at_a_time() {
    assert_eq!(overlapping_searches(SearchConcurrency::Serialized).await, 1);
}
