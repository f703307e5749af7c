//! Dashboard statistics endpoint.

use crate::auth::middleware::{AppState, AuthUser};
use crate::error::AppError;
use crate::models::DistributionStatus;
use crate::storage;
use axum::{extract::State, response::IntoResponse, Json};

const RECENT_LIMIT: usize = 5;
// Rough headcount estimate per delivery, carried over from the reporting UI
const BENEFICIARIES_PER_DISTRIBUTION: u64 = 20;

/// GET /api/dashboard/stats — Aggregate counts and recent activity
pub async fn stats(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection().await?;

    let centers = storage::center::list_centers(&mut con).await?;
    let distributions = storage::distribution::list_distributions(&mut con, None, None).await?;
    let open_grievances = storage::grievance::count_open_grievances(&mut con).await?;

    let total_centers = centers.len() as u64;
    let total_distributions = distributions.len() as u64;
    let average_trust_score = if centers.is_empty() {
        0
    } else {
        centers.iter().map(|c| c.trust_score as u64).sum::<u64>() / total_centers
    };

    let today = time::OffsetDateTime::now_utc().date().to_string();
    let upcoming =
        storage::distribution::upcoming_distributions(&mut con, &today, RECENT_LIMIT).await?;

    let recent: Vec<_> = distributions.iter().take(RECENT_LIMIT).collect();
    let completed: Vec<_> = distributions
        .iter()
        .filter(|d| {
            matches!(
                d.status,
                DistributionStatus::Completed | DistributionStatus::Verified
            )
        })
        .take(RECENT_LIMIT)
        .collect();
    let issues: Vec<_> = distributions
        .iter()
        .filter(|d| d.status == DistributionStatus::Pending)
        .take(RECENT_LIMIT)
        .collect();

    Ok(Json(serde_json::json!({
        "stats": {
            "totalCenters": total_centers,
            "totalDistributions": total_distributions,
            "estimatedBeneficiaries": total_distributions * BENEFICIARIES_PER_DISTRIBUTION,
            "averageTrustScore": average_trust_score,
            "openGrievances": open_grievances,
        },
        "recentDistributions": recent,
        "upcomingDistributions": upcoming,
        "completedDistributions": completed,
        "issueDistributions": issues,
    })))
}
