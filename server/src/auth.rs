use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
};
use scored_common::*;

use crate::errors::ApiError;
use crate::registry;
use crate::AppState;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Json(request) = payload?;
    tracing::info!(username = %request.username, "API: registering user");

    let user_id = registry::register(&state.db, &state.hasher, &request.username, &request.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: format!("user {} registered successfully", request.username),
            user_id,
            username: request.username,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;
    tracing::info!(username = %request.username, "API: login attempt");

    let (user_id, username) = registry::login(&state.db, &state.hasher, &request.username, &request.password).await?;

    Ok(Json(LoginResponse {
        message: "login successful".to_string(),
        user_id,
        username,
    }))
}
