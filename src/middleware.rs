//! Security headers middleware.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

/// Middleware that adds security headers to all responses.
///
/// - **Referrer-Policy: no-referrer** keeps wallet-bearing URLs out of
///   Referer headers when users navigate away.
/// - **X-Content-Type-Options: nosniff** forces browsers to respect
///   declared Content-Type headers.
/// - **X-Frame-Options: DENY** prevents clickjacking via embedding.
/// - **Strict-Transport-Security** pins HTTPS for 2 years.
/// - **Permissions-Policy** disables browser features the dashboard does
///   not use (geolocation is read via a form field, not the browser API).
/// - **Content-Security-Policy** restricts every resource class to the
///   same origin and blocks framing.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("cache-control", HeaderValue::from_static("no-store"));
    headers.insert("referrer-policy", HeaderValue::from_static("no-referrer"));
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "strict-transport-security",
        HeaderValue::from_static("max-age=63072000; includeSubDomains; preload"),
    );
    headers.insert(
        "permissions-policy",
        HeaderValue::from_static("camera=(), microphone=(), geolocation=(), payment=()"),
    );
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static(
            "default-src 'self'; \
             script-src 'self'; \
             style-src 'self'; \
             object-src 'none'; \
             frame-ancestors 'none'; \
             base-uri 'self'; \
             form-action 'self'",
        ),
    );

    response
}
