use std::sync::Arc;

use crate::{
    config::LabConfig,
    item_store::{InMemoryItemStore, ItemStore},
    prediction::PredictionService,
    training::{ModelSource, SyntheticTrainer},
};

/// Shared state handed to every handler.
pub struct AppState {
    pub items: Arc<dyn ItemStore>,
    pub predictor: Arc<PredictionService>,
}

impl AppState {
    pub fn new(items: Arc<dyn ItemStore>, predictor: Arc<PredictionService>) -> Self {
        Self { items, predictor }
    }

    /// Seeded (or empty) store and a prediction service backed by the
    /// synthetic trainer. The model is not loaded yet.
    pub fn from_config(config: &LabConfig) -> Self {
        let items: Arc<dyn ItemStore> = if config.seed_items {
            Arc::new(InMemoryItemStore::seeded())
        } else {
            Arc::new(InMemoryItemStore::new())
        };
        let source: Arc<dyn ModelSource> = Arc::new(SyntheticTrainer::new(config.training.clone()));

        Self::new(items, Arc::new(PredictionService::new(source)))
    }
}
