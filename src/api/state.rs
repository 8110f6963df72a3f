use std::sync::Arc;

use crate::services::{CatalogClient, EmotionAnalyzer, FaceDetector, RecommendationEngine};

/// Shared application state. Everything in here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<EmotionAnalyzer>,
    pub engine: Arc<RecommendationEngine>,
    pub recommendation_limit: usize,
    pub search_limit: usize,
}

impl AppState {
    /// Wires the pipeline with default thresholds and mood table
    pub fn new(catalog: Arc<dyn CatalogClient>, detector: Arc<dyn FaceDetector>) -> Self {
        Self {
            analyzer: Arc::new(EmotionAnalyzer::with_detector(detector)),
            engine: Arc::new(RecommendationEngine::new(catalog)),
            recommendation_limit: 8,
            search_limit: 10,
        }
    }

    pub fn with_engine(mut self, engine: RecommendationEngine) -> Self {
        self.engine = Arc::new(engine);
        self
    }

    pub fn with_limits(mut self, recommendation_limit: usize, search_limit: usize) -> Self {
        self.recommendation_limit = recommendation_limit;
        self.search_limit = search_limit;
        self
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogClient> {
        self.engine.catalog()
    }
}
