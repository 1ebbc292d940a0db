use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::catalog::models::{
    NewProfession, NewQuestion, NewRule, ProfessionUpdate, QuestionUpdate, RuleUpdate,
};
use crate::catalog::ops;
use crate::errors::AppError;
use crate::models::catalog::{Profession, Question, Rule};
use crate::state::AppState;

// ── Questions ───────────────────────────────────────────────────────────────

/// GET /api/questions
pub async fn handle_list_questions(State(state): State<AppState>) -> Json<Vec<Question>> {
    Json(state.store.snapshot().await.questions.clone())
}

/// GET /api/questions/:id
pub async fn handle_get_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Question>, AppError> {
    let kb = state.store.snapshot().await;
    kb.question(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Question '{id}' not found")))
}

/// POST /api/questions
pub async fn handle_create_question(
    State(state): State<AppState>,
    payload: Result<Json<NewQuestion>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let question = state
        .store
        .mutate(|kb| ops::create_question(kb, req))
        .await?;
    info!("Created question {}", question.id);
    Ok(Json(json!({ "success": true, "question": question })))
}

/// PUT /api/questions/:id
pub async fn handle_update_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<QuestionUpdate>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let question = state
        .store
        .mutate(|kb| ops::update_question(kb, &id, req))
        .await?;
    info!("Updated question {id}");
    Ok(Json(json!({ "success": true, "question": question })))
}

/// DELETE /api/questions/:id
pub async fn handle_delete_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state
        .store
        .mutate(|kb| ops::delete_question(kb, &id))
        .await?;
    info!("Deleted question {id} and its rule");
    Ok(Json(json!({ "success": true })))
}

// ── Professions ─────────────────────────────────────────────────────────────

/// GET /api/professions
pub async fn handle_list_professions(State(state): State<AppState>) -> Json<Vec<Profession>> {
    Json(state.store.snapshot().await.professions.clone())
}

/// GET /api/professions/:id
pub async fn handle_get_profession(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Profession>, AppError> {
    let kb = state.store.snapshot().await;
    kb.profession(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Profession '{id}' not found")))
}

/// POST /api/professions
pub async fn handle_create_profession(
    State(state): State<AppState>,
    payload: Result<Json<NewProfession>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let profession = state
        .store
        .mutate(|kb| ops::create_profession(kb, req))
        .await?;
    info!("Created profession {}", profession.id);
    Ok(Json(json!({ "success": true, "profession": profession })))
}

/// PUT /api/professions/:id
pub async fn handle_update_profession(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProfessionUpdate>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let profession = state
        .store
        .mutate(|kb| ops::update_profession(kb, &id, req))
        .await?;
    info!("Updated profession {id}");
    Ok(Json(json!({ "success": true, "profession": profession })))
}

/// DELETE /api/professions/:id
pub async fn handle_delete_profession(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state
        .store
        .mutate(|kb| ops::delete_profession(kb, &id))
        .await?;
    info!("Deleted profession {id}");
    Ok(Json(json!({ "success": true })))
}

// ── Rules ───────────────────────────────────────────────────────────────────

/// GET /api/rules
pub async fn handle_list_rules(State(state): State<AppState>) -> Json<Vec<Rule>> {
    Json(state.store.snapshot().await.rules.clone())
}

/// GET /api/rules/:question_id
pub async fn handle_get_rule(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> Result<Json<Rule>, AppError> {
    let kb = state.store.snapshot().await;
    kb.rule(&question_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Rule for question '{question_id}' not found")))
}

/// POST /api/rules
pub async fn handle_create_rule(
    State(state): State<AppState>,
    payload: Result<Json<NewRule>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let rule = state.store.mutate(|kb| ops::create_rule(kb, req)).await?;
    info!(
        "Created rule for question {} ({} professions)",
        rule.question_id,
        rule.professions.len()
    );
    Ok(Json(json!({ "success": true, "rule": rule })))
}

/// PUT /api/rules/:question_id
pub async fn handle_update_rule(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    payload: Result<Json<RuleUpdate>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let rule = state
        .store
        .mutate(|kb| ops::update_rule(kb, &question_id, req))
        .await?;
    info!("Updated rule for question {question_id}");
    Ok(Json(json!({ "success": true, "rule": rule })))
}

/// DELETE /api/rules/:question_id
pub async fn handle_delete_rule(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state
        .store
        .mutate(|kb| ops::delete_rule(kb, &question_id))
        .await?;
    info!("Deleted rule for question {question_id}");
    Ok(Json(json!({ "success": true })))
}
