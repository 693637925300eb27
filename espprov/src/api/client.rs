use std::sync::Arc;
use tokio::sync::Mutex;

use crate::Result;
use crate::api::backend::ProvisioningBackend;
use crate::api::config::{ClientConfig, SearchConcurrency};
use crate::core::dbus_backend::DbusBackend;

/// Handle to the native provisioning runtime.
///
/// This is the main entry point of the crate. Every [`EspDevice`](crate::EspDevice)
/// and every [`manager`](crate::manager) function goes through a client; there is
/// no global runtime reference.
///
/// # Creating an Instance
///
/// ```no_run
/// use espprov::ProvisioningClient;
///
/// # async fn example() -> espprov::Result<()> {
/// let client = ProvisioningClient::new().await?;
/// # Ok(())
/// # }
/// ```
///
/// Construction fails with [`ProvisionError::NotLinked`](crate::ProvisionError::NotLinked)
/// when the runtime is not registered on the bus, so a client that exists is
/// always bound to a runtime.
///
/// # Thread Safety
///
/// `ProvisioningClient` is `Clone` and can be shared across async tasks.
/// Each clone talks to the same backend.
#[derive(Debug, Clone)]
pub struct ProvisioningClient {
    backend: Arc<dyn ProvisioningBackend>,
    config: ClientConfig,
    search_lock: Arc<Mutex<()>>,
}

impl ProvisioningClient {
    /// Binds to the provisioning daemon on the system bus.
    pub async fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default()).await
    }

    /// Binds to the provisioning daemon described by `config`.
    pub async fn with_config(config: ClientConfig) -> Result<Self> {
        let backend = DbusBackend::connect(&config).await?;
        Ok(Self::from_parts(Arc::new(backend), config))
    }

    /// Uses an already constructed backend with the default configuration.
    pub fn with_backend(backend: Arc<dyn ProvisioningBackend>) -> Self {
        Self::from_parts(backend, ClientConfig::default())
    }

    /// Uses an already constructed backend.
    ///
    /// Only the non-bus parts of `config` (such as
    /// [`search_concurrency`](ClientConfig::search_concurrency)) apply.
    pub fn from_parts(backend: Arc<dyn ProvisioningBackend>, config: ClientConfig) -> Self {
        Self {
            backend,
            config,
            search_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Waits until every pending [`EspDevice::disconnect`](crate::EspDevice::disconnect)
    /// and [`manager::stop_search`](crate::manager::stop_search) has been handed
    /// to the runtime.
    ///
    /// Those calls return before anything is sent. Call this before the
    /// process exits so the teardown is not lost.
    ///
    /// ```no_run
    /// use espprov::{EspDevice, ProvisioningClient};
    ///
    /// # async fn example() -> espprov::Result<()> {
    /// let client = ProvisioningClient::new().await?;
    /// EspDevice::new(&client, "PROV_ABCD").disconnect();
    /// client.flush().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn flush(&self) -> Result<()> {
        self.backend.flush().await
    }

    /// Returns the configuration of this client.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn backend(&self) -> &dyn ProvisioningBackend {
        self.backend.as_ref()
    }

    /// Runs a search under the configured concurrency policy.
    pub(crate) async fn guard_search<F, T>(&self, search: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        match self.config.search_concurrency {
            SearchConcurrency::Native => search.await,
            SearchConcurrency::Serialized => {
                let _guard = self.search_lock.lock().await;
                search.await
            }
        }
    }
}
