use crate::models::Broker;
use crate::services::{AppwriteClient, AppwriteError, CacheManager, CacheStats};
use std::sync::Arc;

/// Loads the broker catalog, preferring the cache over Appwrite
#[derive(Clone)]
pub struct CatalogLoader {
    appwrite: Arc<AppwriteClient>,
    cache: Arc<CacheManager>,
}

impl CatalogLoader {
    pub fn new(appwrite: Arc<AppwriteClient>, cache: Arc<CacheManager>) -> Self {
        Self { appwrite, cache }
    }

    /// Return the catalog. `refresh` bypasses and repopulates the cache.
    ///
    /// Cache failures only degrade to an Appwrite fetch; they never fail the load.
    pub async fn load(&self, refresh: bool) -> Result<Vec<Broker>, AppwriteError> {
        if refresh {
            if let Err(e) = self.cache.invalidate_catalog().await {
                tracing::warn!("Failed to invalidate catalog cache: {}", e);
            }
        } else {
            match self.cache.get_catalog().await {
                Ok(brokers) => {
                    tracing::debug!("Catalog served from cache ({} brokers)", brokers.len());
                    return Ok(brokers);
                }
                Err(e) => tracing::debug!("Catalog cache unavailable: {}", e),
            }
        }

        let brokers = self.appwrite.list_brokers().await?;

        if let Err(e) = self.cache.set_catalog(&brokers).await {
            tracing::warn!("Failed to cache broker catalog: {}", e);
        }

        Ok(brokers)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
