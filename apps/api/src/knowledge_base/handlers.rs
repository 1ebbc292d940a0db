use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::knowledge_base::{KnowledgeBase, KnowledgeBaseStats};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
    pub knowledge_base: KnowledgeBase,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub stats: KnowledgeBaseStats,
}

/// GET /api/knowledge-base
pub async fn handle_get_knowledge_base(State(state): State<AppState>) -> Json<KnowledgeBase> {
    Json(KnowledgeBase::clone(&*state.store.snapshot().await))
}

/// GET /api/knowledge-base/stats
pub async fn handle_stats(State(state): State<AppState>) -> Json<KnowledgeBaseStats> {
    Json(state.store.snapshot().await.stats())
}

/// POST /api/knowledge-base/create-new
pub async fn handle_create_new(
    State(state): State<AppState>,
) -> Result<Json<ResetResponse>, AppError> {
    let kb = state.store.replace(KnowledgeBase::default()).await?;
    info!("Knowledge base reset to empty");
    Ok(Json(ResetResponse {
        success: true,
        message: "A new empty knowledge base was created".to_string(),
        knowledge_base: KnowledgeBase::clone(&*kb),
    }))
}

/// POST /api/knowledge-base/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let Json(doc) = payload?;
    let incoming = parse_document(doc).inspect_err(|e| warn!("Rejected upload: {e}"))?;

    let kb = state
        .store
        .replace(incoming)
        .await
        .inspect_err(|e| warn!("Rejected upload: {e}"))?;
    let stats = kb.stats();
    info!(
        "Imported knowledge base: {} questions, {} professions, {} rules",
        stats.questions, stats.professions, stats.rules
    );

    Ok(Json(UploadResponse {
        success: true,
        message: "Knowledge base uploaded successfully".to_string(),
        stats,
    }))
}

/// GET /api/knowledge-base/download
pub async fn handle_download(State(state): State<AppState>) -> impl IntoResponse {
    let kb = KnowledgeBase::clone(&*state.store.snapshot().await);
    let disposition = format!(
        "attachment; filename=\"knowledge_base_{}.json\"",
        Utc::now().format("%Y-%m-%d")
    );
    ([(header::CONTENT_DISPOSITION, disposition)], Json(kb))
}

/// Shape check with messages an operator can act on, then typed decoding.
fn parse_document(doc: Value) -> Result<KnowledgeBase, AppError> {
    let Some(obj) = doc.as_object() else {
        return Err(AppError::Validation(
            "Knowledge base must be a JSON object".to_string(),
        ));
    };

    let missing: Vec<&str> = ["questions", "professions", "rules"]
        .into_iter()
        .filter(|key| !obj.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }
    if !["questions", "professions", "rules"]
        .iter()
        .all(|key| obj[*key].is_array())
    {
        return Err(AppError::Validation(
            "Fields questions, professions and rules must be arrays".to_string(),
        ));
    }

    serde_json::from_value(doc)
        .map_err(|e| AppError::Validation(format!("Malformed knowledge base: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_document_accepts_valid_shape() {
        let kb = parse_document(json!({
            "questions": [{"id": "q1", "text": "Like maths?", "answers": ["No", "Yes"]}],
            "professions": [{"id": "eng", "name": "Engineer", "description": "Builds"}],
            "rules": [{"question_id": "q1", "professions": {"eng": 2}}]
        }))
        .unwrap();
        assert_eq!(kb.stats().rules, 1);
    }

    #[test]
    fn test_parse_document_rejects_non_object() {
        assert!(matches!(
            parse_document(json!([1, 2, 3])),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_document_lists_missing_fields() {
        let err = parse_document(json!({"questions": []})).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("professions, rules")));
    }

    #[test]
    fn test_parse_document_requires_arrays() {
        let err = parse_document(json!({"questions": {}, "professions": [], "rules": []}))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("arrays")));
    }

    #[test]
    fn test_parse_document_rejects_bad_entries() {
        let err = parse_document(json!({
            "questions": [{"id": "q1"}],
            "professions": [],
            "rules": []
        }))
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("Malformed")));
    }
}
