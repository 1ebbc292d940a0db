use std::collections::HashMap;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::scoring::scorer::{AnswerSet, RawAnswer, Recommendation};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub answers: HashMap<String, RawAnswer>,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub recommendations: Vec<Recommendation>,
}

/// POST /api/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(req) = payload?;
    let answers = AnswerSet::from_raw(req.answers)?;

    let kb = state.store.snapshot().await;
    let mut recommendations = state.scorer.score(&kb, &answers).await?;
    recommendations.truncate(state.config.recommendation_limit);

    info!(
        "Scored {} answers with {}; top match: {}",
        answers.len(),
        state.scorer.backend(),
        recommendations
            .first()
            .map(|r| format!("{} ({}%)", r.id, r.percentage))
            .unwrap_or_else(|| "none".to_string())
    );

    Ok(Json(AnalyzeResponse {
        success: true,
        recommendations,
    }))
}
