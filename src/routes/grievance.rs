//! Grievance API endpoints.
//!
//! Citizens only ever see and touch their own grievances; staff roles see
//! everything. The restriction is applied as an ownership filter on listing
//! and an ownership check on single-record access.

use crate::auth::middleware::{AppState, AuthUser};
use crate::error::AppError;
use crate::models::{
    CreateGrievanceRequest, GrievanceStatus, ListQuery, Pagination, Role, StoredGrievance,
    UpdateGrievanceRequest,
};
use crate::storage;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};

fn owner_filter(user: &crate::models::StoredUser) -> Option<&str> {
    if user.role == Role::Citizen {
        Some(user.wallet_address.as_str())
    } else {
        None
    }
}

/// Display name for grievance authorship: stored name, or a wallet-derived
/// placeholder.
fn author_name(user: &crate::models::StoredUser) -> String {
    match &user.name {
        Some(name) => name.clone(),
        None => {
            let prefix: String = user.wallet_address.chars().take(8).collect();
            format!("User-{}", prefix)
        }
    }
}

/// GET /api/grievances — Filtered, paginated listing, newest first
pub async fn list_grievances(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection().await?;
    let all = storage::grievance::list_grievances(
        &mut con,
        query.status.as_deref(),
        query.center_id.as_deref(),
        owner_filter(&user),
    )
    .await?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(state.config.default_page_limit)
        .clamp(1, state.config.max_page_limit);
    let total = all.len() as u64;
    let grievances: Vec<StoredGrievance> = all
        .into_iter()
        .skip(super::page_offset(page, limit))
        .take(limit as usize)
        .collect();

    Ok(Json(serde_json::json!({
        "grievances": grievances,
        "pagination": Pagination::new(total, page, limit),
    })))
}

/// POST /api/grievances — File a grievance as the caller
pub async fn create_grievance(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateGrievanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(title), Some(description), Some(center_id)) =
        (req.title, req.description, req.center_id)
    else {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    };

    let mut con = state.redis_connection().await?;
    let center = storage::center::get_center(&mut con, &center_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Distribution center not found".to_string()))?;

    let grievance_id = storage::grievance::next_grievance_id(&mut con).await?;
    let now = storage::now_secs();
    let grievance = StoredGrievance {
        id: nanoid::nanoid!(12),
        grievance_id,
        title,
        description,
        status: GrievanceStatus::Open,
        date: time::OffsetDateTime::now_utc().date().to_string(),
        user_id: user.wallet_address.clone(),
        user_name: author_name(&user),
        center_id: center.id,
        center_name: center.name,
        tx_hash: req.tx_hash,
        assigned_to: None,
        resolution: None,
        created_at: now,
        updated_at: now,
    };
    storage::grievance::store_grievance(&mut con, &grievance).await?;

    tracing::info!(
        action = "grievance_created",
        grievance_id = %grievance.grievance_id,
        by = %user.wallet_address,
        "Grievance filed"
    );

    Ok(Json(serde_json::json!({ "success": true, "grievance": grievance })))
}

/// GET /api/grievances/{id} — Dual-key lookup with ownership check
pub async fn get_grievance(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection().await?;
    let grievance = storage::grievance::find_grievance(&mut con, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Grievance not found".to_string()))?;

    if user.role == Role::Citizen && grievance.user_id != user.wallet_address {
        return Err(AppError::Forbidden("Unauthorized".to_string()));
    }

    Ok(Json(serde_json::json!({ "grievance": grievance })))
}

/// PUT /api/grievances/{id} — Partial update (status, assignment, resolution)
pub async fn update_grievance(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateGrievanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.is_empty() {
        return Err(AppError::BadRequest("No changes made".to_string()));
    }

    let mut con = state.redis_connection().await?;
    let mut grievance = storage::grievance::find_grievance(&mut con, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Grievance not found".to_string()))?;

    if user.role == Role::Citizen && grievance.user_id != user.wallet_address {
        return Err(AppError::Forbidden("Unauthorized".to_string()));
    }

    if let Some(status) = req.status {
        grievance.status = status;
    }
    if let Some(assigned_to) = req.assigned_to {
        grievance.assigned_to = Some(assigned_to);
    }
    if let Some(resolution) = req.resolution {
        grievance.resolution = Some(resolution);
    }

    storage::grievance::update_grievance(&mut con, &mut grievance).await?;

    tracing::info!(
        action = "grievance_updated",
        grievance_id = %grievance.grievance_id,
        by = %user.wallet_address,
        "Grievance updated"
    );

    Ok(Json(serde_json::json!({ "success": true, "grievance": grievance })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StoredUser;

    fn user(role: Role, name: Option<&str>) -> StoredUser {
        StoredUser {
            wallet_address: "0xabcdef0123456789abcdef0123456789abcdef01".to_string(),
            role,
            name: name.map(str::to_string),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_owner_filter_only_for_citizens() {
        assert!(owner_filter(&user(Role::Citizen, None)).is_some());
        assert!(owner_filter(&user(Role::Admin, None)).is_none());
        assert!(owner_filter(&user(Role::Ngo, None)).is_none());
        assert!(owner_filter(&user(Role::Volunteer, None)).is_none());
    }

    #[test]
    fn test_author_name_fallback() {
        assert_eq!(author_name(&user(Role::Citizen, Some("Asha"))), "Asha");
        assert_eq!(author_name(&user(Role::Citizen, None)), "User-0xabcdef");
    }
}
