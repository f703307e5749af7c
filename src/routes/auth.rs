//! Auth API endpoints.

use crate::auth::middleware::{check_rate_limit, AppState, AuthUser, TOKEN_COOKIE};
use crate::auth::token::issue_token;
use crate::auth::verify::{normalize_address, verify_wallet_signature, LOGIN_MESSAGE};
use crate::error::AppError;
use crate::models::{LoginRequest, LoginResponse};
use crate::storage;
use axum::{
    extract::{ConnectInfo, State},
    response::{IntoResponse, Redirect},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::hash::{Hash, Hasher};
use std::net::SocketAddr;

fn session_cookie(state: &AppState, value: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, value))
        .http_only(true)
        .secure(state.config.cookie_secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// POST /api/auth/login — Verify a wallet signature and start a session
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Rate limit by IP
    let mut con = state.redis_connection().await?;

    let rate_limit_key = format!("ratelimit:login:{}", addr.ip());
    let allowed = check_rate_limit(
        &mut con,
        &rate_limit_key,
        state.config.rate_limit_login_per_min,
        60,
    )
    .await
    .map_err(|e| AppError::Internal(format!("Rate limit check failed: {}", e)))?;

    if !allowed {
        let mut hasher = std::hash::DefaultHasher::new();
        addr.ip().hash(&mut hasher);
        let ip_hash = format!("{:x}", hasher.finish());
        tracing::warn!(action = "rate_limited", endpoint = "auth/login", ip_hash = %ip_hash, "Rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    let (Some(wallet_address), Some(signature)) = (req.wallet_address, req.signature) else {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    };

    let wallet_address = normalize_address(&wallet_address)
        .ok_or_else(|| AppError::BadRequest("Invalid wallet address".to_string()))?;

    if !verify_wallet_signature(LOGIN_MESSAGE, &wallet_address, &signature) {
        tracing::warn!(action = "auth_failed", wallet = %wallet_address, "Invalid signature");
        return Err(AppError::Unauthorized("Invalid signature".to_string()));
    }

    // First login creates the identity; later logins reuse it
    let (user, created) = storage::user::create_if_absent(&mut con, &wallet_address).await?;
    if created {
        tracing::info!(action = "user_created", wallet = %user.wallet_address, role = %user.role, "Identity created on first login");
    }

    let token = issue_token(
        &user.wallet_address,
        state.config.jwt_secret.as_bytes(),
        state.config.session_ttl_secs,
    )
    .map_err(|e| AppError::Internal(format!("Token issuance failed: {}", e)))?;

    let jar = jar.add(session_cookie(
        &state,
        token,
        state.config.session_ttl_secs as i64,
    ));

    tracing::info!(action = "auth_success", wallet = %user.wallet_address, role = %user.role, "User authenticated");

    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            user,
        }),
    ))
}

/// GET /api/auth/me — Return the authenticated identity
pub async fn me(AuthUser(user): AuthUser) -> impl IntoResponse {
    Json(serde_json::json!({ "user": user }))
}

/// POST /api/auth/logout — Clear the session cookie
///
/// Idempotent: no authentication required and no server-side state to
/// revoke, the token simply stops being presented.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = jar.add(session_cookie(&state, String::new(), 0));

    tracing::info!(action = "logout", "Session cookie cleared");

    (jar, Redirect::to("/login"))
}
