use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Json, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use scored_common::{ScoreEntry, ScoreRequest, ScoreResponse};

use crate::errors::ApiError;
use crate::ledger;
use crate::AppState;

pub async fn add_score(
    State(state): State<AppState>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ScoreResponse>), ApiError> {
    let Json(request) = payload?;

    ledger::add_score(&state.db, request.user_id, request.score).await?;

    Ok((
        StatusCode::CREATED,
        Json(ScoreResponse {
            message: format!("score {} recorded for user {}", request.score, request.user_id),
            user_id: request.user_id,
            score: request.score,
        }),
    ))
}

#[derive(Deserialize)]
pub struct TopScoresQuery {
    limit: Option<i64>,
}

pub async fn get_top_scores(
    State(state): State<AppState>,
    query: Result<Query<TopScoresQuery>, QueryRejection>,
) -> Result<Json<Vec<ScoreEntry>>, ApiError> {
    let Query(params) = query?;
    let limit = params.limit.unwrap_or(state.config.top_scores_limit);
    let entries = ledger::top_scores(&state.db, limit).await?;
    Ok(Json(entries))
}
