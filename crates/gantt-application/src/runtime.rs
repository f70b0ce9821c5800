//! Application runtime bootstrap.
//!
//! Builds the store, use case, and autosave scheduler once at startup and
//! owns their lifecycle: `init` restores durable state and starts the
//! scheduler, `shutdown` stops it. The UI shell holds the runtime and
//! reaches everything through it instead of ambient globals.

use std::sync::{Arc, Mutex, OnceLock};

use anyhow::{Context, Result};
use tracing::info;

use gantt_core::config::AppConfig;
use gantt_core::document::repository::DocumentStore;
use gantt_core::store::ChartStore;
use gantt_infrastructure::{ConfigService, FileDocumentStore, FileExchange};

use crate::autosave::{self, AutosaveHandle};
use crate::usecase::ChartUseCase;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Initializes the global tracing subscriber once.
///
/// `RUST_LOG` wins when set; otherwise everything at `info` and above is
/// emitted.
pub fn init_tracing() {
    TRACING_INIT.get_or_init(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();
    });
}

/// The application runtime: configuration, store, use case, and the
/// autosave scheduler, with an explicit init/shutdown lifecycle.
pub struct Runtime {
    config: AppConfig,
    store: Arc<ChartStore>,
    usecase: Arc<ChartUseCase>,
    autosave: Mutex<Option<AutosaveHandle>>,
}

impl Runtime {
    /// Assembles a runtime from explicit collaborators.
    pub fn new(
        storage: Arc<dyn DocumentStore>,
        exchange: Arc<FileExchange>,
        config: AppConfig,
    ) -> Self {
        let store = Arc::new(ChartStore::new(storage));
        let usecase = Arc::new(ChartUseCase::new(
            store.clone(),
            exchange,
            config.draft.clone(),
        ));
        Self {
            config,
            store,
            usecase,
            autosave: Mutex::new(None),
        }
    }

    /// Assembles a runtime from the platform default locations.
    pub fn from_default_locations() -> Result<Self> {
        let config = ConfigService::from_default_location()
            .context("resolve configuration file location")?
            .get_config();
        let storage =
            FileDocumentStore::from_default_location().context("resolve data directory")?;
        let exchange = FileExchange::from_default_location().context("resolve export directory")?;
        Ok(Self::new(Arc::new(storage), Arc::new(exchange), config))
    }

    /// Restores durable state and starts the autosave scheduler.
    pub async fn init(&self) -> Result<()> {
        let restored = self.store.init().await.context("restore durable state")?;
        info!(
            "runtime initialized (restored from storage: {restored}, autosave every {}s)",
            self.config.autosave_interval_secs
        );

        let mut autosave = self.autosave.lock().unwrap();
        if autosave.is_none() {
            *autosave = Some(autosave::start(
                self.store.clone(),
                self.config.autosave_interval_secs,
            ));
        }
        Ok(())
    }

    /// Stops the autosave scheduler. Idempotent.
    pub fn shutdown(&self) {
        if let Some(handle) = self.autosave.lock().unwrap().take() {
            handle.stop();
        }
        info!("runtime shut down");
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<ChartStore> {
        self.store.clone()
    }

    pub fn usecase(&self) -> Arc<ChartUseCase> {
        self.usecase.clone()
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.shutdown();
    }
}
