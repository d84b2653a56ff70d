use std::sync::Arc;

use anyhow::Result;

use super::{
    config::{Config, ReviewBackend},
    database::Catalog,
    reviews::{MemoryReviewStore, RedisReviewStore, ReviewStore},
};

pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
    pub reviews: Arc<dyn ReviewStore>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Arc<Self>> {
        let catalog = Catalog::open(&config.books_db_path)?;

        let reviews: Arc<dyn ReviewStore> = match config.review_backend {
            ReviewBackend::Redis => {
                Arc::new(RedisReviewStore::connect(&config.redis_url, &config.reviews_key).await?)
            }
            ReviewBackend::Memory => Arc::new(MemoryReviewStore::new()),
        };

        Ok(Self::with_stores(config, catalog, reviews))
    }

    pub fn with_stores(
        config: Config,
        catalog: Catalog,
        reviews: Arc<dyn ReviewStore>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            catalog,
            reviews,
        })
    }

    /// In-memory catalog and review store.
    pub fn ephemeral() -> Result<Arc<Self>> {
        Ok(Self::with_stores(
            Config::ephemeral(),
            Catalog::open_in_memory()?,
            Arc::new(MemoryReviewStore::new()),
        ))
    }
}
