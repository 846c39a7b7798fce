use crate::api::{router, start_http_server};
use crate::clock::SystemClock;
use crate::config::{Config, StorageBackend};
use crate::state::StateManager;
use crate::store::{JsonFileStore, MemoryStore, PlayerStore};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

pub struct ClickerDaemon {
    config: Config,
    state_manager: Arc<StateManager>,
}

impl ClickerDaemon {
    pub async fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn PlayerStore> = match config.storage.backend {
            StorageBackend::File => Arc::new(
                JsonFileStore::open(&config.storage.data_dir)
                    .await
                    .with_context(|| {
                        format!("Failed to open player store at {:?}", config.storage.data_dir)
                    })?,
            ),
            StorageBackend::Memory => {
                warn!("⚠️  In-memory store: progress is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        let state_manager = Arc::new(StateManager::new(store, Arc::new(SystemClock)));

        Ok(Self {
            config,
            state_manager,
        })
    }

    pub async fn run(self) -> Result<()> {
        let addr = self.config.bind_addr()?;
        let app = router(
            self.state_manager.clone(),
            self.config.server.cors_allow_any_origin,
        );

        start_http_server(addr, app, shutdown_signal())
            .await
            .context("HTTP server failed")?;

        info!("👋 Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("🛑 Shutdown requested");
}
