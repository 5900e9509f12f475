use crate::core::{
    debounce::{Debouncer, DEFAULT_QUIET_PERIOD},
    error::FilterError,
    ranker::{Ranker, DEFAULT_RECOMMENDATION_LIMIT, INTERACTIVE_LIMIT},
};
use crate::models::{Broker, BrokerRecommendation, UserPreferences};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

type Catalog = Arc<RwLock<Arc<Vec<Broker>>>>;

/// Runtime knobs for the filter service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSettings {
    pub quiet_period: Duration,
    pub interactive_limit: usize,
    pub recommendation_limit: usize,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            quiet_period: DEFAULT_QUIET_PERIOD,
            interactive_limit: INTERACTIVE_LIMIT,
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
        }
    }
}

/// Broker filtering engine owned by the composition root
///
/// Holds the broker catalog, ranks it against user preferences and
/// coalesces bursts of interactive requests through a [`Debouncer`].
#[derive(Debug)]
pub struct BrokerFilterService {
    catalog: Catalog,
    ranker: Ranker,
    debouncer: Debouncer,
    settings: FilterSettings,
}

impl BrokerFilterService {
    /// `interactive_limit` is capped at [`INTERACTIVE_LIMIT`]
    pub fn new(settings: FilterSettings) -> Self {
        if settings.interactive_limit > INTERACTIVE_LIMIT {
            tracing::warn!(
                "Interactive limit {} exceeds {}, capping",
                settings.interactive_limit,
                INTERACTIVE_LIMIT
            );
        }
        let settings = FilterSettings {
            interactive_limit: settings.interactive_limit.min(INTERACTIVE_LIMIT),
            ..settings
        };

        Self {
            catalog: Arc::new(RwLock::new(Arc::new(Vec::new()))),
            ranker: Ranker::new(),
            debouncer: Debouncer::new(settings.quiet_period),
            settings,
        }
    }

    pub fn settings(&self) -> FilterSettings {
        self.settings
    }

    /// Replace the broker catalog used by every later pass
    pub fn set_brokers(&self, brokers: Vec<Broker>) {
        tracing::info!("Broker catalog set ({} brokers)", brokers.len());
        let mut catalog = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        *catalog = Arc::new(brokers);
    }

    /// Snapshot of the current catalog
    pub fn brokers(&self) -> Arc<Vec<Broker>> {
        snapshot(&self.catalog)
    }

    /// Debounced filtering for live preview.
    ///
    /// Only the latest call inside a quiet period reaches `callback`.
    /// Failures are logged and reported as an empty list. Outside a tokio
    /// runtime nothing is scheduled and `callback` receives an empty list
    /// straight away.
    pub fn filter_brokers<F>(&self, preferences: UserPreferences, callback: F)
    where
        F: FnOnce(Vec<Broker>) + Send + 'static,
    {
        if let Err(e) = tokio::runtime::Handle::try_current() {
            tracing::error!("Debounced broker filtering needs a tokio runtime: {}", e);
            callback(Vec::new());
            return;
        }

        let catalog = Arc::clone(&self.catalog);
        let ranker = self.ranker;
        let limit = self.settings.interactive_limit;

        self.debouncer.schedule(move || {
            let brokers = snapshot(&catalog);
            let results = match ranker.rank(&brokers, &preferences, limit) {
                Ok(scored) => scored.into_iter().map(|s| s.broker).collect(),
                Err(e) => {
                    tracing::error!("Debounced broker filtering failed: {}", e);
                    Vec::new()
                }
            };
            callback(results);
        });
    }

    /// Synchronous filtering for the final submit step
    pub fn filter_brokers_immediate(
        &self,
        preferences: &UserPreferences,
    ) -> Result<Vec<Broker>, FilterError> {
        let brokers = self.brokers();
        let scored = self
            .ranker
            .rank(&brokers, preferences, self.settings.interactive_limit)?;
        Ok(scored.into_iter().map(|s| s.broker).collect())
    }

    /// Top brokers with the reasons each one matched
    pub fn get_broker_recommendations(
        &self,
        preferences: &UserPreferences,
        limit: Option<usize>,
    ) -> Result<Vec<BrokerRecommendation>, FilterError> {
        let limit = limit.unwrap_or(self.settings.recommendation_limit);
        let brokers = self.brokers();
        let scored = self.ranker.rank(&brokers, preferences, limit)?;
        Ok(scored.into_iter().map(BrokerRecommendation::from).collect())
    }

    /// Discard any pending debounced request
    pub fn cancel(&self) {
        self.debouncer.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

impl Default for BrokerFilterService {
    fn default() -> Self {
        Self::new(FilterSettings::default())
    }
}

impl Drop for BrokerFilterService {
    fn drop(&mut self) {
        self.debouncer.cancel();
    }
}

fn snapshot(catalog: &Catalog) -> Arc<Vec<Broker>> {
    Arc::clone(&catalog.read().unwrap_or_else(PoisonError::into_inner))
}
