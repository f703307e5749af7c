//! Page gate handlers.
//!
//! Thin redirects in front of the static dashboard: unauthenticated visitors
//! land on `/login`, authenticated ones are kept out of it. The pages
//! themselves are plain files under `static/`.

use crate::auth::middleware::AuthUser;
use axum::{
    extract::Request,
    response::{IntoResponse, Redirect, Response},
};
use tower::util::ServiceExt;
use tower_http::services::ServeFile;

async fn serve_static(path: &str, request: Request) -> Response {
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(infallible) => match infallible {},
    }
}

/// GET /login — Static login page, unless already authenticated
pub async fn login_page(user: Option<AuthUser>, request: Request) -> Response {
    if user.is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    serve_static("static/login.html", request).await
}

/// GET /dashboard and /dashboard/{*path} — Gated dashboard shell
pub async fn dashboard_page(user: Option<AuthUser>, request: Request) -> Response {
    if user.is_none() {
        return Redirect::to("/login").into_response();
    }
    serve_static("static/dashboard.html", request).await
}
