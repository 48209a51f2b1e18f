use crate::activity::{ActivityStore, Dialect, PgActivityStore, SqliteActivityStore};
use crate::config::AppConfig;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ActivityStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        // Run migrations if present
        let store = match Dialect::from_url(&config.database_url) {
            Dialect::Postgres => {
                let store = PgActivityStore::connect(&config.database_url).await?;
                if let Err(e) = store.migrate().await {
                    warn!(error = %e, "postgres migration failed; continuing");
                }
                Arc::new(store) as Arc<dyn ActivityStore>
            }
            Dialect::Sqlite => {
                let store = SqliteActivityStore::connect(&config.database_url).await?;
                if let Err(e) = store.migrate().await {
                    warn!(error = %e, "sqlite migration failed; continuing");
                }
                Arc::new(store) as Arc<dyn ActivityStore>
            }
        };
        info!(dialect = %store.dialect(), "activity store ready");

        Ok(Self::from_parts(store, config))
    }

    pub fn from_parts(store: Arc<dyn ActivityStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    #[cfg(test)]
    pub fn fake(store: Arc<dyn ActivityStore>) -> Self {
        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
            },
            analytics: crate::config::AnalyticsConfig::default(),
        });
        Self::from_parts(store, config)
    }
}
