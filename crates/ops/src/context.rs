//! Operations context for dependency injection

use modhost_config::Config;
use modhost_errors::{Error, OpsError};
use modhost_events::{EventEmitter, EventSender};
use modhost_host::HostControl;
use modhost_install::{Installer, Uninstaller};
use modhost_net::{ArtifactFetcher, Registry};
use modhost_resolver::Resolver;
use modhost_state::{CommandLog, PackageState};
use modhost_store::BlobStore;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinSet;

/// Operations context providing access to all system components
pub struct OpsCtx {
    /// Documents, artifacts and backups
    pub store: Arc<dyn BlobStore>,
    /// Ready and installed lists
    pub state: PackageState,
    /// Console command audit trail
    pub commands: CommandLog,
    pub registry: Arc<dyn Registry>,
    pub fetcher: Arc<dyn ArtifactFetcher>,
    /// Container running the managed server
    pub host: Arc<dyn HostControl>,
    /// Event sender for progress reporting
    pub tx: EventSender,
    pub config: Config,
    /// Follow-up work that must not delay the reply, such as the restart
    /// after a removal
    background: Mutex<JoinSet<()>>,
}

impl std::fmt::Debug for OpsCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpsCtx")
            .field("container", &self.host.container())
            .finish_non_exhaustive()
    }
}

impl EventEmitter for OpsCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

impl OpsCtx {
    /// Game version every registry query is filtered by
    #[must_use]
    pub fn game_version(&self) -> &str {
        &self.config.registry.game_version
    }

    #[must_use]
    pub fn resolver(&self) -> Resolver {
        Resolver::new(Arc::clone(&self.registry), self.game_version())
            .with_timeout(self.config.resolve_timeout())
            .with_events(self.tx.clone())
    }

    #[must_use]
    pub fn installer(&self) -> Installer {
        Installer::new(self.state.clone(), Arc::clone(&self.fetcher))
            .with_download_timeout(self.config.download_timeout())
            .with_events(self.tx.clone())
    }

    #[must_use]
    pub fn uninstaller(&self) -> Uninstaller {
        Uninstaller::new(self.state.clone()).with_events(self.tx.clone())
    }

    /// Run `task` without making the current operation wait for it
    ///
    /// The task is owned by this context; callers that are about to exit
    /// must call [`OpsCtx::wait_background`] or the task is cancelled with
    /// the runtime.
    pub fn spawn_background<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.background
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .spawn(task);
    }

    /// Wait for every task started with [`OpsCtx::spawn_background`]
    pub async fn wait_background(&self) {
        let mut tasks = std::mem::take(
            &mut *self
                .background
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                self.emit_warning_with_context("background task did not finish", e.to_string());
            }
        }
    }
}

/// Builder for the operations context
#[derive(Default)]
pub struct OpsContextBuilder {
    store: Option<Arc<dyn BlobStore>>,
    registry: Option<Arc<dyn Registry>>,
    fetcher: Option<Arc<dyn ArtifactFetcher>>,
    host: Option<Arc<dyn HostControl>>,
    tx: Option<EventSender>,
    config: Option<Config>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn BlobStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn with_registry(mut self, registry: Arc<dyn Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub fn with_fetcher(mut self, fetcher: Arc<dyn ArtifactFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: Arc<dyn HostControl>) -> Self {
        self.host = Some(host);
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if any required component is missing.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let store = self.store.ok_or_else(|| missing("store"))?;
        let registry = self.registry.ok_or_else(|| missing("registry"))?;
        let fetcher = self.fetcher.ok_or_else(|| missing("fetcher"))?;
        let host = self.host.ok_or_else(|| missing("host"))?;
        let tx = self.tx.ok_or_else(|| missing("event_sender"))?;
        let config = self.config.ok_or_else(|| missing("config"))?;

        let state = PackageState::new(Arc::clone(&store)).with_events(tx.clone());
        let commands = CommandLog::new(Arc::clone(&store)).with_events(tx.clone());

        Ok(OpsCtx {
            store,
            state,
            commands,
            registry,
            fetcher,
            host,
            tx,
            config,
            background: Mutex::new(JoinSet::new()),
        })
    }
}

fn missing(component: &str) -> Error {
    OpsError::MissingComponent {
        component: component.to_string(),
    }
    .into()
}
