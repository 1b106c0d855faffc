use std::sync::Arc;

use crate::config::{AppConfig, StoreConfig};
use crate::crafts::{
    memory::MemoryCraftStore,
    postgres::PgCraftStore,
    store::CraftStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn CraftStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match &config.store {
            StoreConfig::Postgres {
                database_url,
                max_connections,
            } => Arc::new(PgCraftStore::connect(database_url, *max_connections).await?)
                as Arc<dyn CraftStore>,
            StoreConfig::Memory => {
                tracing::warn!("using in-memory craft store; data is lost on exit");
                Arc::new(MemoryCraftStore::default()) as Arc<dyn CraftStore>
            }
        };

        Ok(Self { config, store })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::{CookieConfig, JwtConfig};

        let config = Arc::new(AppConfig {
            store: StoreConfig::Memory,
            jwt: JwtConfig {
                secret: "test".into(),
                ttl_minutes: 60,
            },
            cookie: CookieConfig {
                name: "token".into(),
                secure: true,
            },
            cors_origin: "http://localhost:5173".into(),
            host: "127.0.0.1".into(),
            port: 0,
        });

        Self {
            config,
            store: Arc::new(MemoryCraftStore::default()),
        }
    }
}
