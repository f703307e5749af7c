//! API route handlers.

pub mod auth;
pub mod center;
pub mod dashboard;
pub mod distribution;
pub mod grievance;
pub mod pages;

use crate::auth::middleware::AppState;
use axum::{routing::get, routing::post, Router};

/// Offset into a listing for a 1-based page number.
///
/// Saturates so a hostile `page` query value cannot overflow the
/// multiplication; an out-of-range page just yields an empty slice.
pub(crate) fn page_offset(page: u64, limit: u64) -> usize {
    page.saturating_sub(1)
        .saturating_mul(limit)
        .min(usize::MAX as u64) as usize
}

/// Build the API router with all endpoints.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Auth endpoints
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        // Center endpoints
        .route(
            "/api/centers",
            get(center::list_centers).post(center::create_center),
        )
        .route("/api/centers/trust-scores", get(center::trust_scores))
        .route(
            "/api/centers/{id}",
            get(center::get_center).put(center::update_center),
        )
        // Distribution endpoints
        .route(
            "/api/distributions",
            get(distribution::list_distributions).post(distribution::create_distribution),
        )
        .route("/api/distributions/verify", post(distribution::verify_distribution))
        .route(
            "/api/distributions/{id}",
            get(distribution::get_distribution)
                .put(distribution::update_distribution)
                .delete(distribution::delete_distribution),
        )
        // Grievance endpoints
        .route(
            "/api/grievances",
            get(grievance::list_grievances).post(grievance::create_grievance),
        )
        .route(
            "/api/grievances/{id}",
            get(grievance::get_grievance).put(grievance::update_grievance),
        )
        // Dashboard
        .route("/api/dashboard/stats", get(dashboard::stats))
        // Page gates (static assets themselves come from the fallback service)
        .route("/login", get(pages::login_page))
        .route("/dashboard", get(pages::dashboard_page))
        .route("/dashboard/{*path}", get(pages::dashboard_page))
}
