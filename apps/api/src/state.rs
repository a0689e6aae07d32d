use std::sync::Arc;

use crate::config::Config;
use crate::progress::saved::SavedRoadmapRegistry;
use crate::progress::tracker::ProgressTracker;
use crate::roadmap::catalog::{CatalogRules, ResourceCatalog};
use crate::roadmap::inference::{InferenceRules, SkillInferenceEngine};
use crate::roadmap::store::RoadmapStore;
use crate::storage::Storage;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub roadmaps: RoadmapStore,
    pub progress: ProgressTracker,
    pub saved: SavedRoadmapRegistry,
}

impl AppState {
    /// Wires services over a storage backend. Rule tables are injected so tests
    /// can swap in fixtures.
    pub fn new(
        config: Config,
        storage: Storage,
        inference_rules: Arc<InferenceRules>,
        catalog_rules: Arc<CatalogRules>,
    ) -> Self {
        let roadmaps = RoadmapStore::new(
            storage.roadmaps.clone(),
            storage.companies.clone(),
            SkillInferenceEngine::new(inference_rules),
            ResourceCatalog::new(catalog_rules),
        );
        let saved = SavedRoadmapRegistry::new(storage.saved.clone(), storage.roadmaps.clone());
        let progress = ProgressTracker::new(storage.roadmaps, storage.progress, saved.clone());

        AppState {
            config,
            roadmaps,
            progress,
            saved,
        }
    }
}
