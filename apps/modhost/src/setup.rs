//! System setup and component initialization

use crate::error::CliError;
use modhost_config::Config;
use modhost_events::EventSender;
use modhost_host::{DockerHost, HostControl};
use modhost_net::{ModrinthClient, NetClient, NetConfig};
use modhost_store::LocalBlobStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Long-lived components shared by every command
pub struct SystemSetup {
    config: Config,
    store: Arc<LocalBlobStore>,
    registry: Arc<ModrinthClient>,
    downloads: Arc<NetClient>,
}

impl SystemSetup {
    /// Create directories and build the store and network clients
    pub async fn initialize(config: Config) -> Result<Self, CliError> {
        info!("Initializing modhost components");

        let data_dir = config.data_path();
        if !data_dir.exists() {
            debug!("Creating directory: {}", data_dir.display());
            tokio::fs::create_dir_all(&data_dir).await.map_err(|e| {
                CliError::Setup(format!("Failed to create {}: {e}", data_dir.display()))
            })?;
        }

        let store = LocalBlobStore::new(
            data_dir,
            config.artifacts_path(),
            config.backups_path(),
        )
        .with_extension(config.install.artifact_extension.clone());
        debug!(
            artifacts = %store.artifacts_dir().display(),
            backups = %store.backups_dir().display(),
            "Blob store ready"
        );

        let registry = ModrinthClient::from_config(&config)
            .map_err(|e| CliError::Setup(format!("Failed to initialize registry client: {e}")))?;

        // Artifact downloads get their own client so a slow jar is bounded by
        // the download timeout rather than the per-request one.
        let download_config = NetConfig {
            timeout: config.download_timeout(),
            ..NetConfig::from_config(&config)
        };
        let downloads = NetClient::new(download_config)
            .map_err(|e| CliError::Setup(format!("Failed to initialize download client: {e}")))?;

        info!("Component initialization completed");
        Ok(Self {
            config,
            store: Arc::new(store),
            registry: Arc::new(registry),
            downloads: Arc::new(downloads),
        })
    }

    pub fn store(&self) -> Arc<LocalBlobStore> {
        Arc::clone(&self.store)
    }

    pub fn registry(&self) -> Arc<ModrinthClient> {
        Arc::clone(&self.registry)
    }

    pub fn downloads(&self) -> Arc<NetClient> {
        Arc::clone(&self.downloads)
    }

    /// Container control bound to the configured container
    pub fn host(&self, tx: EventSender) -> Arc<dyn HostControl> {
        Arc::new(DockerHost::from_config(&self.config).with_events(tx))
    }
}
