//! Axum extractors for authentication, authorization, and rate limiting.

use crate::auth::token::validate_token;
use crate::config::Config;
use crate::error::AppError;
use crate::models::{Role, StoredUser};
use crate::storage;
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use redis::AsyncCommands;
use std::sync::Arc;

/// Name of the session cookie.
pub const TOKEN_COOKIE: &str = "token";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub redis: redis::Client,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn redis_connection(
        &self,
    ) -> Result<redis::aio::MultiplexedConnection, AppError> {
        self.redis
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))
    }
}

/// Authenticated user extractor.
///
/// Reads the session token from the `token` cookie, validates it, and
/// resolves the identity record. Every failure mode — missing cookie,
/// invalid or expired token, identity record gone — rejects with the same
/// 401 `Unauthorized` so callers get no diagnostic signal.
pub struct AuthUser(pub StoredUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = match CookieJar::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(infallible) => match infallible {},
        };

        let token = jar
            .get(TOKEN_COOKIE)
            .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))?;

        // Token validation must precede identity resolution
        let wallet_address = validate_token(token.value(), state.config.jwt_secret.as_bytes())
            .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))?;

        // A valid token for a non-existent identity is not sufficient
        let mut con = state.redis_connection().await?;
        let user = storage::user::get_user(&mut con, &wallet_address)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))?;

        Ok(AuthUser(user))
    }
}

/// Optional variant: `Option<AuthUser>` yields Some for a valid session
/// cookie and None otherwise, without failing the request. Used for the
/// login-page already-logged-in check and page redirects.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(
            <AuthUser as FromRequestParts<AppState>>::from_request_parts(parts, state)
                .await
                .ok(),
        )
    }
}

/// Admin-only extractor.
///
/// Authenticates, then requires the admin role. Returns 403 otherwise.
pub struct AdminUser(pub StoredUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) =
            <AuthUser as FromRequestParts<AppState>>::from_request_parts(parts, state).await?;

        if !user.role.authorized(&[Role::Admin]) {
            return Err(AppError::Forbidden("Unauthorized".to_string()));
        }

        Ok(AdminUser(user))
    }
}

/// Check rate limit using Redis INCR with TTL.
///
/// # Arguments
/// * `con` - Redis connection
/// * `key` - Rate limit key (e.g., "ratelimit:login:127.0.0.1")
/// * `max` - Maximum requests allowed in window
/// * `window_secs` - Time window in seconds
///
/// # Returns
/// * `Ok(true)` if under limit
/// * `Ok(false)` if limit exceeded
pub async fn check_rate_limit<C>(
    con: &mut C,
    key: &str,
    max: u32,
    window_secs: u64,
) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    // Increment counter
    let count: u32 = con.incr(key, 1).await?;

    // Set TTL on first request
    if count == 1 {
        con.expire::<_, ()>(key, window_secs as i64).await?;
    }

    Ok(count <= max)
}
