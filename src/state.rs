use crate::config::{AppConfig, StoreBackend};
use crate::store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let store = match config.store_backend {
            StoreBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL is not set")?;
                let pg = PgDocumentStore::connect(url, config.db_max_connections).await?;
                pg.migrate().await?;
                Arc::new(pg) as Arc<dyn DocumentStore>
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory store; data is lost on restart");
                Arc::new(MemoryDocumentStore::new()) as Arc<dyn DocumentStore>
            }
        };

        Ok(Self::from_parts(store, config))
    }

    pub fn from_parts(store: Arc<dyn DocumentStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// Empty in-memory store with default settings.
    #[cfg(test)]
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            store_backend: StoreBackend::Memory,
            database_url: None,
            db_max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
            api_prefix: "/api".into(),
            seed_on_startup: true,
        });
        Self::from_parts(Arc::new(MemoryDocumentStore::new()), config)
    }
}
