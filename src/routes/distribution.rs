//! Distribution (ration delivery) API endpoints.

use crate::auth::middleware::{AdminUser, AppState, AuthUser};
use crate::error::AppError;
use crate::models::{
    CreateDistributionRequest, DistributionStatus, ListQuery, Pagination, StoredDistribution,
    UpdateDistributionRequest, VerifyDistributionRequest,
};
use crate::storage;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};

const DEFAULT_TIME: &str = "12:00 PM";

/// Clamp page/limit query values to configured bounds.
fn page_window(state: &AppState, query: &ListQuery) -> (u64, u64) {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(state.config.default_page_limit)
        .clamp(1, state.config.max_page_limit);
    (page, limit)
}

/// GET /api/distributions — Filtered, paginated listing, newest first
pub async fn list_distributions(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection().await?;
    let all = storage::distribution::list_distributions(
        &mut con,
        query.status.as_deref(),
        query.center_id.as_deref(),
    )
    .await?;

    let (page, limit) = page_window(&state, &query);
    let total = all.len() as u64;
    let distributions: Vec<StoredDistribution> = all
        .into_iter()
        .skip(super::page_offset(page, limit))
        .take(limit as usize)
        .collect();

    Ok(Json(serde_json::json!({
        "distributions": distributions,
        "pagination": Pagination::new(total, page, limit),
    })))
}

/// POST /api/distributions — Schedule a delivery
pub async fn create_distribution(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateDistributionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(center_id), Some(commodity), Some(quantity), Some(date)) =
        (req.center_id, req.commodity, req.quantity, req.date)
    else {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    };

    let mut con = state.redis_connection().await?;
    let center = storage::center::get_center(&mut con, &center_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Distribution center not found".to_string()))?;

    let distribution_id = storage::distribution::next_distribution_id(&mut con).await?;
    let now = storage::now_secs();
    let distribution = StoredDistribution {
        id: nanoid::nanoid!(12),
        distribution_id,
        center_id: center.id,
        center_name: center.name,
        commodity,
        quantity,
        date,
        time: req.time.unwrap_or_else(|| DEFAULT_TIME.to_string()),
        status: req.status.unwrap_or(DistributionStatus::Scheduled),
        tx_hash: None,
        verified_by: None,
        geo_verified: false,
        geo_location: None,
        created_at: now,
        updated_at: now,
    };
    storage::distribution::store_distribution(&mut con, &distribution).await?;

    tracing::info!(
        action = "distribution_created",
        distribution_id = %distribution.distribution_id,
        center_id = %distribution.center_id,
        by = %user.wallet_address,
        "Distribution scheduled"
    );

    Ok(Json(serde_json::json!({ "success": true, "distribution": distribution })))
}

/// GET /api/distributions/{id} — Dual-key lookup
pub async fn get_distribution(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection().await?;
    let distribution = storage::distribution::find_distribution(&mut con, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Distribution not found".to_string()))?;
    Ok(Json(serde_json::json!({ "distribution": distribution })))
}

/// PUT /api/distributions/{id} — Partial update
pub async fn update_distribution(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDistributionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.is_empty() {
        return Err(AppError::BadRequest("No changes made".to_string()));
    }

    let mut con = state.redis_connection().await?;
    let mut distribution = storage::distribution::find_distribution(&mut con, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Distribution not found".to_string()))?;

    if let Some(commodity) = req.commodity {
        distribution.commodity = commodity;
    }
    if let Some(quantity) = req.quantity {
        distribution.quantity = quantity;
    }
    if let Some(date) = req.date {
        distribution.date = date;
    }
    if let Some(time) = req.time {
        distribution.time = time;
    }
    if let Some(status) = req.status {
        distribution.status = status;
    }
    if let Some(tx_hash) = req.tx_hash {
        distribution.tx_hash = Some(tx_hash);
    }

    storage::distribution::update_distribution(&mut con, &mut distribution).await?;

    tracing::info!(
        action = "distribution_updated",
        distribution_id = %distribution.distribution_id,
        by = %user.wallet_address,
        "Distribution updated"
    );

    Ok(Json(serde_json::json!({ "success": true, "distribution": distribution })))
}

/// DELETE /api/distributions/{id} — Admin only
pub async fn delete_distribution(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection().await?;
    let deleted = storage::distribution::delete_distribution(&mut con, &id).await?;
    if !deleted {
        return Err(AppError::NotFound("Distribution not found".to_string()));
    }

    tracing::info!(action = "distribution_deleted", id = %id, by = %admin.wallet_address, "Distribution deleted");

    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/distributions/verify — Geo-verification of a delivery
///
/// Marks the delivery verified with the caller's wallet and the reported
/// coordinates. A transaction hash, when supplied, produces an audit record.
pub async fn verify_distribution(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<VerifyDistributionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(distribution_id), Some(geo_location)) = (req.distribution_id, req.geo_location)
    else {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    };

    let mut con = state.redis_connection().await?;
    let mut distribution = storage::distribution::find_distribution(&mut con, &distribution_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Distribution not found".to_string()))?;

    distribution.status = DistributionStatus::Verified;
    distribution.geo_verified = true;
    distribution.geo_location = Some(geo_location);
    distribution.verified_by = Some(user.wallet_address.clone());
    if let Some(tx_hash) = &req.tx_hash {
        distribution.tx_hash = Some(tx_hash.clone());
    }

    storage::distribution::update_distribution(&mut con, &mut distribution).await?;

    if let Some(tx_hash) = &req.tx_hash {
        storage::transaction::record_transaction(
            &mut con,
            tx_hash,
            "verification",
            &distribution.distribution_id,
            &user.wallet_address,
        )
        .await?;
    }

    tracing::info!(
        action = "distribution_verified",
        distribution_id = %distribution.distribution_id,
        by = %user.wallet_address,
        "Distribution verified"
    );

    Ok(Json(serde_json::json!({ "success": true, "distribution": distribution })))
}
