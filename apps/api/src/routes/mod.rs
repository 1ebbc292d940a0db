pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::catalog::handlers as catalog;
use crate::knowledge_base::handlers as knowledge_base;
use crate::scoring::handlers as scoring;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Quiz
        .route("/api/analyze", post(scoring::handle_analyze))
        // Catalog
        .route(
            "/api/questions",
            get(catalog::handle_list_questions).post(catalog::handle_create_question),
        )
        .route(
            "/api/questions/:id",
            get(catalog::handle_get_question)
                .put(catalog::handle_update_question)
                .delete(catalog::handle_delete_question),
        )
        .route(
            "/api/professions",
            get(catalog::handle_list_professions).post(catalog::handle_create_profession),
        )
        .route(
            "/api/professions/:id",
            get(catalog::handle_get_profession)
                .put(catalog::handle_update_profession)
                .delete(catalog::handle_delete_profession),
        )
        .route(
            "/api/rules",
            get(catalog::handle_list_rules).post(catalog::handle_create_rule),
        )
        .route(
            "/api/rules/:question_id",
            get(catalog::handle_get_rule)
                .put(catalog::handle_update_rule)
                .delete(catalog::handle_delete_rule),
        )
        // Knowledge base document
        .route(
            "/api/knowledge-base",
            get(knowledge_base::handle_get_knowledge_base),
        )
        .route("/api/knowledge-base/stats", get(knowledge_base::handle_stats))
        .route(
            "/api/knowledge-base/create-new",
            post(knowledge_base::handle_create_new),
        )
        .route(
            "/api/knowledge-base/upload",
            post(knowledge_base::handle_upload),
        )
        .route(
            "/api/knowledge-base/download",
            get(knowledge_base::handle_download),
        )
        .with_state(state)
}
