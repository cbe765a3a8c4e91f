use crate::catalog::TemplateCatalog;
use crate::config::Config;
use crate::error::Result;
use crate::models::{Category, Constraints, GenerateResult, PlanResult, Template};
use crate::services::{InMemoryRecencyStore, PlanComposer, RecencyStore, RedisRecencyStore, Selector};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;
use tracing::info;

/// Caller-facing entry point of the recommendation engine.
pub struct PlanEngine<R: Rng = StdRng> {
    composer: PlanComposer<R>,
}

impl PlanEngine<StdRng> {
    /// Loads the catalog and wires the recency backend described by `config`.
    ///
    /// An unreadable or invalid catalog is fatal here; individual calls never fail.
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = Arc::new(TemplateCatalog::from_path(&config.catalog_path)?);

        let recency: Arc<dyn RecencyStore> = match &config.redis_url {
            Some(url) => {
                info!(key_prefix = %config.recency_key_prefix, "Using Redis recency store");
                Arc::new(
                    RedisRecencyStore::open(url)?
                        .with_key_prefix(&config.recency_key_prefix)
                        .with_ttl(config.recency_ttl_secs),
                )
            }
            None => Arc::new(InMemoryRecencyStore::new()),
        };

        let selector = match config.rng_seed {
            Some(seed) => Selector::seeded(seed),
            None => Selector::from_entropy(),
        };

        Ok(Self::new(catalog, recency, selector).with_supplementary_limit(config.supplementary_limit))
    }
}

impl<R: Rng> PlanEngine<R> {
    pub fn new(
        catalog: Arc<TemplateCatalog>,
        recency: Arc<dyn RecencyStore>,
        selector: Selector<R>,
    ) -> Self {
        Self {
            composer: PlanComposer::new(catalog, recency, selector),
        }
    }

    pub fn with_supplementary_limit(mut self, limit: usize) -> Self {
        self.composer = self.composer.with_supplementary_limit(limit);
        self
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        self.composer.catalog()
    }

    pub fn generate_plans(&mut self, constraints: &Constraints) -> GenerateResult {
        self.composer.generate(constraints)
    }

    pub fn refresh_category(
        &mut self,
        constraints: &Constraints,
        category: Category,
        current_ids: &[u64],
    ) -> Option<PlanResult> {
        self.composer.refresh_category(constraints, category, current_ids)
    }

    pub fn refresh_supplementary(
        &mut self,
        constraints: &Constraints,
        current_ids: &[u64],
    ) -> Vec<Arc<Template>> {
        self.composer.refresh_supplementary(constraints, current_ids)
    }

    pub fn recent_ids(&self, category: Category) -> Vec<u64> {
        self.composer.recency().get(category)
    }

    pub fn clear_recency(&self) {
        self.composer.clear_recency();
    }
}
