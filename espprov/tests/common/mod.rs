//! Recording in-memory backend shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use espprov::{
    Credentials, DeviceRecord, ProvisionError, ProvisioningBackend, ProvisioningClient, Result,
    Security, StatusResponse, Transport, VersionInfo, WifiNetwork,
};

/// One call as seen by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateDevice {
        name: String,
        transport: Transport,
        security: Security,
        credentials: Credentials,
    },
    Connect(String),
    SendData {
        name: String,
        path: String,
        data: String,
    },
    ScanWifiList(String),
    Disconnect(String),
    Provision {
        name: String,
        ssid: String,
        passphrase: String,
    },
    Set {
        name: String,
        key: &'static str,
        value: String,
    },
    Get {
        name: String,
        key: &'static str,
    },
    SearchDevices {
        prefix: String,
        transport: Transport,
        security: Security,
    },
    StopSearch,
    Flush,
}

/// How `send_data` replies.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Decode the request and reply with its text unchanged.
    Echo,
    /// Reply with this raw (already encoded) string.
    Raw(String),
}

#[derive(Debug)]
pub struct MockBackend {
    pub calls: Mutex<Vec<Call>>,
    pub reply: Mutex<Reply>,
    pub search_result: Mutex<Option<Vec<DeviceRecord>>>,
    pub search_delay: Duration,
    pub in_flight_searches: Mutex<usize>,
    pub max_concurrent_searches: Mutex<usize>,
    pub fail_with: Mutex<Option<String>>,
    pub wifi: Vec<WifiNetwork>,
    /// Per-device string state, keyed by (device, key).
    pub state: Mutex<HashMap<(String, &'static str), String>>,
    /// Keys whose setter is accepted but ignored, as some runtimes do.
    pub ignored_setters: Vec<&'static str>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Mutex::new(Reply::Echo),
            search_result: Mutex::new(Some(Vec::new())),
            search_delay: Duration::ZERO,
            in_flight_searches: Mutex::new(0),
            max_concurrent_searches: Mutex::new(0),
            fail_with: Mutex::new(None),
            wifi: Vec::new(),
            state: Mutex::new(HashMap::new()),
            ignored_setters: Vec::new(),
        }
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_next(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self) -> Result<()> {
        match self.fail_with.lock().unwrap().take() {
            Some(msg) => Err(ProvisionError::Native(msg)),
            None => Ok(()),
        }
    }

    fn set(&self, name: &str, key: &'static str, value: &str) -> Result<()> {
        self.record(Call::Set {
            name: name.to_string(),
            key,
            value: value.to_string(),
        });
        self.check()?;
        if !self.ignored_setters.contains(&key) {
            self.state
                .lock()
                .unwrap()
                .insert((name.to_string(), key), value.to_string());
        }
        Ok(())
    }

    fn get(&self, name: &str, key: &'static str) -> Result<Option<String>> {
        self.record(Call::Get {
            name: name.to_string(),
            key,
        });
        self.check()?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .get(&(name.to_string(), key))
            .cloned())
    }
}

#[async_trait]
impl ProvisioningBackend for MockBackend {
    async fn create_device(
        &self,
        name: &str,
        transport: Transport,
        security: Security,
        credentials: &Credentials,
    ) -> Result<()> {
        self.record(Call::CreateDevice {
            name: name.to_string(),
            transport,
            security,
            credentials: credentials.clone(),
        });
        self.check()
    }

    async fn connect(&self, name: &str) -> Result<()> {
        self.record(Call::Connect(name.to_string()));
        self.check()
    }

    async fn send_data(&self, name: &str, path: &str, data: &str) -> Result<String> {
        self.record(Call::SendData {
            name: name.to_string(),
            path: path.to_string(),
            data: data.to_string(),
        });
        self.check()?;
        match self.reply.lock().unwrap().clone() {
            Reply::Echo => {
                let bytes = STANDARD
                    .decode(data)
                    .map_err(|e| ProvisionError::Native(e.to_string()))?;
                Ok(STANDARD.encode(bytes))
            }
            Reply::Raw(raw) => Ok(raw),
        }
    }

    async fn scan_wifi_list(&self, name: &str) -> Result<Vec<WifiNetwork>> {
        self.record(Call::ScanWifiList(name.to_string()));
        self.check()?;
        Ok(self.wifi.clone())
    }

    fn disconnect(&self, name: &str) {
        self.record(Call::Disconnect(name.to_string()));
    }

    async fn provision(
        &self,
        name: &str,
        ssid: &str,
        passphrase: &str,
    ) -> Result<StatusResponse> {
        self.record(Call::Provision {
            name: name.to_string(),
            ssid: ssid.to_string(),
            passphrase: passphrase.to_string(),
        });
        self.check()?;
        if passphrase.len() < 8 {
            return Ok(StatusResponse {
                success: false,
                failure_reason: Some("Wi-Fi authentication failed".into()),
            });
        }
        Ok(StatusResponse {
            success: true,
            failure_reason: None,
        })
    }

    async fn get_proof_of_possession(&self, name: &str) -> Result<Option<String>> {
        self.get(name, "pop")
    }

    async fn set_proof_of_possession(&self, name: &str, pop: &str) -> Result<()> {
        self.set(name, "pop", pop)
    }

    async fn get_username(&self, name: &str) -> Result<Option<String>> {
        self.get(name, "username")
    }

    async fn set_username(&self, name: &str, username: &str) -> Result<()> {
        self.set(name, "username", username)
    }

    async fn get_device_name(&self, name: &str) -> Result<Option<String>> {
        self.get(name, "device_name")
    }

    async fn set_device_name(&self, name: &str, device_name: &str) -> Result<()> {
        self.set(name, "device_name", device_name)
    }

    async fn get_primary_service_uuid(&self, name: &str) -> Result<Option<String>> {
        self.get(name, "primary_service_uuid")
    }

    async fn set_primary_service_uuid(&self, name: &str, uuid: &str) -> Result<()> {
        self.set(name, "primary_service_uuid", uuid)
    }

    async fn get_security_type(&self, name: &str) -> Result<Option<Security>> {
        match self.get(name, "security")? {
            Some(code) => {
                let code: u32 = code
                    .parse()
                    .map_err(|_| ProvisionError::InvalidResponse(code.clone()))?;
                Security::try_from(code).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn set_security_type(&self, name: &str, security: Security) -> Result<()> {
        self.set(name, "security", &security.code().to_string())
    }

    async fn get_transport_type(&self, name: &str) -> Result<Option<Transport>> {
        self.get(name, "transport")?.map(|t| t.parse()).transpose()
    }

    async fn get_version_info(&self, name: &str) -> Result<Option<VersionInfo>> {
        self.record(Call::Get {
            name: name.to_string(),
            key: "version_info",
        });
        self.check()?;
        let mut prov = serde_json::Map::new();
        prov.insert("ver".into(), serde_json::Value::from("v1.1"));
        let mut entry = serde_json::Map::new();
        entry.insert("prov".into(), serde_json::Value::Object(prov));
        Ok(Some(vec![entry]))
    }

    async fn get_device_capabilities(&self, name: &str) -> Result<Option<Vec<String>>> {
        self.record(Call::Get {
            name: name.to_string(),
            key: "capabilities",
        });
        self.check()?;
        Ok(Some(vec!["wifi_scan".into(), "no_pop".into()]))
    }

    async fn search_devices(
        &self,
        prefix: &str,
        transport: Transport,
        security: Security,
    ) -> Result<Option<Vec<DeviceRecord>>> {
        self.record(Call::SearchDevices {
            prefix: prefix.to_string(),
            transport,
            security,
        });
        self.check()?;

        {
            let mut in_flight = self.in_flight_searches.lock().unwrap();
            *in_flight += 1;
            let mut max = self.max_concurrent_searches.lock().unwrap();
            *max = (*max).max(*in_flight);
        }
        if !self.search_delay.is_zero() {
            tokio::time::sleep(self.search_delay).await;
        }
        *self.in_flight_searches.lock().unwrap() -= 1;

        Ok(self.search_result.lock().unwrap().clone())
    }

    fn stop_search(&self) {
        self.record(Call::StopSearch);
    }

    async fn flush(&self) -> Result<()> {
        self.record(Call::Flush);
        Ok(())
    }
}

/// Builds a client around a fresh mock, returning both.
pub fn client_with(backend: MockBackend) -> (ProvisioningClient, Arc<MockBackend>) {
    let backend = Arc::new(backend);
    let client = ProvisioningClient::with_backend(backend.clone());
    (client, backend)
}

pub fn record(name: &str, transport: Transport, security: Security) -> DeviceRecord {
    DeviceRecord {
        name: name.to_string(),
        transport,
        security,
    }
}
