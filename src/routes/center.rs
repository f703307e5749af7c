//! Distribution center API endpoints.

use crate::auth::middleware::{AdminUser, AppState, AuthUser};
use crate::error::AppError;
use crate::models::{CreateCenterRequest, TrustScoreEntry, UpdateCenterRequest};
use crate::storage;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

const DEFAULT_TRUST_SCORE: u32 = 75;

/// GET /api/centers — All centers, sorted by name
pub async fn list_centers(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection().await?;
    let centers = storage::center::list_centers(&mut con).await?;
    Ok(Json(serde_json::json!({ "centers": centers })))
}

/// POST /api/centers — Create a center (admin only)
pub async fn create_center(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<CreateCenterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(name), Some(location)) = (req.name, req.location) else {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    };

    let mut con = state.redis_connection().await?;
    let center = storage::center::create_center(
        &mut con,
        name,
        location,
        req.trust_score.unwrap_or(DEFAULT_TRUST_SCORE),
    )
    .await?;

    tracing::info!(action = "center_created", center_id = %center.id, by = %admin.wallet_address, "Center created");

    Ok(Json(serde_json::json!({ "success": true, "center": center })))
}

/// GET /api/centers/{id}
pub async fn get_center(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection().await?;
    let center = storage::center::get_center(&mut con, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Center not found".to_string()))?;
    Ok(Json(serde_json::json!({ "center": center })))
}

/// PUT /api/centers/{id} — Partial update (admin only)
pub async fn update_center(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCenterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.is_empty() {
        return Err(AppError::BadRequest("No changes made".to_string()));
    }

    let mut con = state.redis_connection().await?;
    let mut center = storage::center::get_center(&mut con, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Center not found".to_string()))?;

    if let Some(name) = req.name {
        center.name = name;
    }
    if let Some(location) = req.location {
        center.location = location;
    }
    if let Some(trust_score) = req.trust_score {
        center.trust_score = trust_score;
    }

    storage::center::update_center(&mut con, &mut center).await?;

    tracing::info!(action = "center_updated", center_id = %center.id, by = %admin.wallet_address, "Center updated");

    Ok(Json(serde_json::json!({ "success": true, "center": center })))
}

/// GET /api/centers/trust-scores — Trust board, highest first
pub async fn trust_scores(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection().await?;
    let mut centers = storage::center::list_centers(&mut con).await?;
    centers.sort_by(|a, b| b.trust_score.cmp(&a.trust_score));

    let scores: Vec<TrustScoreEntry> = centers
        .into_iter()
        .map(|c| TrustScoreEntry {
            name: c.name,
            trust_score: c.trust_score,
        })
        .collect();

    Ok(Json(serde_json::json!({ "trustScores": scores })))
}
