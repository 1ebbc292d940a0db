use std::sync::Arc;

use crate::config::Config;
use crate::scoring::scorer::RecommendationScorer;
use crate::store::KnowledgeBaseStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<KnowledgeBaseStore>,
    pub config: Config,
    /// Pluggable recommendation scorer. Default: WeightedRuleScorer with the
    /// configured ANSWER_POLICY.
    pub scorer: Arc<dyn RecommendationScorer>,
}
