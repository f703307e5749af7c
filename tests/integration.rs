//! Integration tests for the rationchain API.
//!
//! These tests require a running Redis instance (default: redis://127.0.0.1:6379).
//! Set REDIS_URL env var to override. Each test skips itself when Redis is not
//! reachable.

use k256::ecdsa::SigningKey;
use rationchain::{
    auth::middleware::AppState,
    auth::token::Claims,
    auth::verify::{address_from_key, sign_wallet_message, LOGIN_MESSAGE},
    config::Config,
    middleware::security_headers,
    models::Role,
    routes, storage,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use zeroize::Zeroizing;

const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Helper to get Redis URL from environment or use default.
fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

/// Generate a wallet for testing: signing key, address, and login signature.
fn test_wallet() -> (SigningKey, String, String) {
    let key = loop {
        let mut seed = [0u8; 32];
        rand::fill(&mut seed);
        if let Ok(key) = SigningKey::from_slice(&seed) {
            break key;
        }
    };
    let address = address_from_key(key.verifying_key());
    let signature = sign_wallet_message(&key, LOGIN_MESSAGE).expect("signing failed");
    (key, address, signature)
}

/// Spin up a test server and return its base URL, a Redis connection, and the
/// bootstrapped admin's address + login signature.
///
/// Returns None when Redis is unavailable so callers can skip.
async fn spawn_test_server() -> Option<(
    String,
    redis::aio::MultiplexedConnection,
    String,
    String,
)> {
    let redis_client = match redis::Client::open(redis_url()) {
        Ok(c) => c,
        Err(_) => {
            eprintln!("Skipping test: Redis not available");
            return None;
        }
    };
    let mut con = match redis_client.get_multiplexed_async_connection().await {
        Ok(c) => c,
        Err(_) => {
            eprintln!("Skipping test: Redis connection failed");
            return None;
        }
    };

    let (_admin_key, admin_address, admin_signature) = test_wallet();
    storage::user::upsert_admin(&mut con, &admin_address)
        .await
        .expect("Failed to upsert admin");

    let config = Config {
        jwt_secret: Zeroizing::new(TEST_JWT_SECRET.to_string()),
        admin_wallet: Some(admin_address.clone()),
        redis_url: redis_url(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        cookie_secure: false,
        session_ttl_secs: 3600,
        rate_limit_login_per_min: 1000,
        default_page_limit: 10,
        max_page_limit: 100,
    };

    let state = AppState {
        redis: redis_client,
        config: Arc::new(config),
    };

    let app = routes::api_router()
        .fallback_service(ServeDir::new("static"))
        .layer(axum::middleware::from_fn(security_headers))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
        )
        .await
        .unwrap();
    });

    let base_url = format!("http://{}", addr);
    Some((base_url, con, admin_address, admin_signature))
}

/// Client with a cookie store, so the session cookie flows automatically.
fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to build client")
}

/// Log in with the given address + signature, asserting success.
async fn login(
    client: &reqwest::Client,
    base_url: &str,
    address: &str,
    signature: &str,
) -> serde_json::Value {
    let resp = client
        .post(format!("{}/api/auth/login", base_url))
        .json(&serde_json::json!({
            "walletAddress": address,
            "signature": signature,
        }))
        .send()
        .await
        .expect("Failed to send login");
    assert_eq!(resp.status(), 200);
    resp.json().await.expect("Invalid login response")
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_login_creates_volunteer_identity_and_sets_cookie() {
    let Some((base_url, mut con, _, _)) = spawn_test_server().await else {
        return;
    };
    let client = test_client();
    let (_key, address, signature) = test_wallet();

    let resp = client
        .post(format!("{}/api/auth/login", base_url))
        .json(&serde_json::json!({
            "walletAddress": address,
            "signature": signature,
        }))
        .send()
        .await
        .expect("Failed to send login");

    assert_eq!(resp.status(), 200);
    let cookie_header = resp
        .headers()
        .get("set-cookie")
        .expect("Login must set the session cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie_header.starts_with("token="));
    assert!(cookie_header.contains("HttpOnly"));
    assert!(cookie_header.contains("SameSite=Strict"));

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["walletAddress"], address.to_lowercase());
    assert_eq!(body["user"]["role"], "volunteer");

    // Identity exists in the store
    let stored = storage::user::get_user(&mut con, &address)
        .await
        .unwrap()
        .expect("Identity must be created on first login");
    assert_eq!(stored.role, Role::Volunteer);

    // The cookie authenticates /me
    let me: serde_json::Value = client
        .get(format!("{}/api/auth/me", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["user"]["walletAddress"], address.to_lowercase());
}

#[tokio::test]
async fn test_login_repeat_reuses_identity() {
    let Some((base_url, mut con, _, _)) = spawn_test_server().await else {
        return;
    };
    let client = test_client();
    let (_key, address, signature) = test_wallet();

    login(&client, &base_url, &address, &signature).await;
    let first = storage::user::get_user(&mut con, &address)
        .await
        .unwrap()
        .unwrap();

    login(&client, &base_url, &address, &signature).await;
    let second = storage::user::get_user(&mut con, &address)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.created_at, second.created_at);
    assert_eq!(first.wallet_address, second.wallet_address);
}

#[tokio::test]
async fn test_login_wrong_wallet_rejected_without_identity() {
    let Some((base_url, mut con, _, _)) = spawn_test_server().await else {
        return;
    };
    let client = test_client();
    let (key, _address, _sig) = test_wallet();
    let (_other_key, other_address, _) = test_wallet();

    // Signature from one wallet, claim of another
    let signature = sign_wallet_message(&key, LOGIN_MESSAGE).unwrap();
    let resp = client
        .post(format!("{}/api/auth/login", base_url))
        .json(&serde_json::json!({
            "walletAddress": other_address,
            "signature": signature,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid signature");

    // The failed attempt must not have created an identity
    let stored = storage::user::get_user(&mut con, &other_address).await.unwrap();
    assert!(stored.is_none());
}

#[tokio::test]
async fn test_login_malformed_signature_rejected_uniformly() {
    let Some((base_url, _con, _, _)) = spawn_test_server().await else {
        return;
    };
    let client = test_client();
    let (_key, address, _sig) = test_wallet();

    // Garbage hex, truncated bytes, impossible recovery byte: all must look
    // exactly like a signature that does not match
    let bad_v = format!("0x{}09", "00".repeat(64));
    for signature in ["0xnot-hex", "0x1234", bad_v.as_str()] {
        let resp = client
            .post(format!("{}/api/auth/login", base_url))
            .json(&serde_json::json!({
                "walletAddress": address,
                "signature": signature,
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Invalid signature");
    }
}

#[tokio::test]
async fn test_concurrent_first_logins_create_one_identity() {
    let redis_client = match redis::Client::open(redis_url()) {
        Ok(c) => c,
        Err(_) => {
            eprintln!("Skipping test: Redis not available");
            return;
        }
    };
    let con = match redis_client.get_multiplexed_async_connection().await {
        Ok(c) => c,
        Err(_) => {
            eprintln!("Skipping test: Redis connection failed");
            return;
        }
    };

    let (_key, address, _sig) = test_wallet();

    // Race eight simultaneous get-or-creates for one fresh wallet
    let mut handles = Vec::new();
    for _ in 0..8 {
        let mut con = con.clone();
        let address = address.clone();
        handles.push(tokio::spawn(async move {
            storage::user::create_if_absent(&mut con, &address).await.unwrap()
        }));
    }

    let mut created_count = 0;
    let mut users = Vec::new();
    for handle in handles {
        let (user, created) = handle.await.unwrap();
        if created {
            created_count += 1;
        }
        users.push(user);
    }

    // Exactly one call wins the insert; everyone observes the same record
    assert_eq!(created_count, 1);
    for user in &users {
        assert_eq!(user.wallet_address, address.to_lowercase());
        assert_eq!(user.role, Role::Volunteer);
        assert_eq!(user.created_at, users[0].created_at);
    }
}

#[tokio::test]
async fn test_login_missing_fields() {
    let Some((base_url, _con, _, _)) = spawn_test_server().await else {
        return;
    };
    let client = test_client();

    let resp = client
        .post(format!("{}/api/auth/login", base_url))
        .json(&serde_json::json!({ "walletAddress": "0x0000000000000000000000000000000000000001" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Missing required fields");
}

#[tokio::test]
async fn test_me_unauthenticated_and_expired_look_identical() {
    let Some((base_url, _con, _, _)) = spawn_test_server().await else {
        return;
    };

    // No cookie at all
    let bare = reqwest::Client::new();
    let resp = bare
        .get(format!("{}/api/auth/me", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let no_cookie_body: serde_json::Value = resp.json().await.unwrap();

    // An expired token, signed with the real secret
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let claims = Claims {
        sub: "0x0000000000000000000000000000000000000002".to_string(),
        iat: now - 7200,
        exp: now - 3600,
    };
    let expired = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap();

    let resp = bare
        .get(format!("{}/api/auth/me", base_url))
        .header("Cookie", format!("token={}", expired))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let expired_body: serde_json::Value = resp.json().await.unwrap();

    // Same status, same body: no signal about which check failed
    assert_eq!(no_cookie_body, expired_body);
    assert_eq!(expired_body["error"], "Unauthorized");
}

#[tokio::test]
async fn test_logout_clears_session() {
    let Some((base_url, _con, _, _)) = spawn_test_server().await else {
        return;
    };
    let client = test_client();
    let (_key, address, signature) = test_wallet();

    login(&client, &base_url, &address, &signature).await;

    let resp = client
        .post(format!("{}/api/auth/logout", base_url))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers().get("location").unwrap(), "/login");

    // Cookie gone: me is unauthorized again
    let resp = client
        .get(format!("{}/api/auth/me", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

// ============================================================================
// Role Authorization Tests
// ============================================================================

#[tokio::test]
async fn test_center_creation_requires_admin() {
    let Some((base_url, _con, admin_address, admin_signature)) = spawn_test_server().await
    else {
        return;
    };

    let center = serde_json::json!({
        "name": "Ward 12 Fair Price Shop",
        "location": {
            "address": "12 Market Road",
            "coordinates": { "latitude": 19.076, "longitude": 72.8777 }
        }
    });

    // Volunteer is rejected
    let volunteer = test_client();
    let (_key, address, signature) = test_wallet();
    login(&volunteer, &base_url, &address, &signature).await;

    let resp = volunteer
        .post(format!("{}/api/centers", base_url))
        .json(&center)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized");

    // Admin succeeds, with the default trust score
    let admin = test_client();
    login(&admin, &base_url, &admin_address, &admin_signature).await;

    let resp = admin
        .post(format!("{}/api/centers", base_url))
        .json(&center)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["center"]["trustScore"], 75);
    assert_eq!(body["center"]["name"], "Ward 12 Fair Price Shop");
}

#[tokio::test]
async fn test_center_update_admin_only_and_rejects_empty() {
    let Some((base_url, _con, admin_address, admin_signature)) = spawn_test_server().await
    else {
        return;
    };
    let admin = test_client();
    login(&admin, &base_url, &admin_address, &admin_signature).await;

    let created: serde_json::Value = admin
        .post(format!("{}/api/centers", base_url))
        .json(&serde_json::json!({
            "name": "Sector 4 Depot",
            "location": {
                "address": "4 Depot Lane",
                "coordinates": { "latitude": 28.6139, "longitude": 77.209 }
            }
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let center_id = created["center"]["id"].as_str().unwrap().to_string();

    // Empty update body is a bad request
    let resp = admin
        .put(format!("{}/api/centers/{}", base_url, center_id))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No changes made");

    // Partial update applies
    let resp = admin
        .put(format!("{}/api/centers/{}", base_url, center_id))
        .json(&serde_json::json!({ "trustScore": 90 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["center"]["trustScore"], 90);
    assert_eq!(body["center"]["name"], "Sector 4 Depot");
}

// ============================================================================
// Distribution Tests
// ============================================================================

/// Create a center as admin and return its id.
async fn create_center(client: &reqwest::Client, base_url: &str, name: &str) -> String {
    let body: serde_json::Value = client
        .post(format!("{}/api/centers", base_url))
        .json(&serde_json::json!({
            "name": name,
            "location": {
                "address": "1 Test Street",
                "coordinates": { "latitude": 0.0, "longitude": 0.0 }
            }
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["center"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_distribution_lifecycle() {
    let Some((base_url, _con, admin_address, admin_signature)) = spawn_test_server().await
    else {
        return;
    };
    let admin = test_client();
    login(&admin, &base_url, &admin_address, &admin_signature).await;
    let center_id = create_center(&admin, &base_url, "Lifecycle Center").await;

    // Unknown center is a 404
    let resp = admin
        .post(format!("{}/api/distributions", base_url))
        .json(&serde_json::json!({
            "centerId": "does-not-exist",
            "commodity": "Rice",
            "quantity": "500kg",
            "date": "2026-09-15"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // Create against the real center
    let resp = admin
        .post(format!("{}/api/distributions", base_url))
        .json(&serde_json::json!({
            "centerId": center_id,
            "commodity": "Rice",
            "quantity": "500kg",
            "date": "2026-09-15"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    let dist = &body["distribution"];
    let business_key = dist["distributionId"].as_str().unwrap().to_string();
    assert!(business_key.starts_with("DIST-"));
    assert_eq!(dist["status"], "scheduled");
    assert_eq!(dist["time"], "12:00 PM");
    assert_eq!(dist["geoVerified"], false);
    assert_eq!(dist["centerName"], "Lifecycle Center");

    // Business key resolves through the dual lookup
    let resp = admin
        .get(format!("{}/api/distributions/{}", base_url, business_key))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let fetched: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(fetched["distribution"]["id"], dist["id"]);

    // Geo-verification marks the record and stamps the verifier
    let resp = admin
        .post(format!("{}/api/distributions/verify", base_url))
        .json(&serde_json::json!({
            "distributionId": business_key,
            "geoLocation": { "latitude": 19.07, "longitude": 72.87 },
            "txHash": "0xfeedbeef"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let verified: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(verified["distribution"]["status"], "verified");
    assert_eq!(verified["distribution"]["geoVerified"], true);
    assert_eq!(
        verified["distribution"]["verifiedBy"],
        admin_address.to_lowercase()
    );

    // Delete is admin-only; the admin may remove it
    let resp = admin
        .delete(format!("{}/api/distributions/{}", base_url, business_key))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = admin
        .get(format!("{}/api/distributions/{}", base_url, business_key))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_distribution_delete_requires_admin() {
    let Some((base_url, _con, admin_address, admin_signature)) = spawn_test_server().await
    else {
        return;
    };
    let admin = test_client();
    login(&admin, &base_url, &admin_address, &admin_signature).await;
    let center_id = create_center(&admin, &base_url, "Delete Guard Center").await;

    let created: serde_json::Value = admin
        .post(format!("{}/api/distributions", base_url))
        .json(&serde_json::json!({
            "centerId": center_id,
            "commodity": "Wheat",
            "quantity": "200kg",
            "date": "2026-10-01"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["distribution"]["id"].as_str().unwrap().to_string();

    let volunteer = test_client();
    let (_key, address, signature) = test_wallet();
    login(&volunteer, &base_url, &address, &signature).await;

    let resp = volunteer
        .delete(format!("{}/api/distributions/{}", base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // Still there
    let resp = volunteer
        .get(format!("{}/api/distributions/{}", base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_distribution_list_pagination_shape() {
    let Some((base_url, _con, admin_address, admin_signature)) = spawn_test_server().await
    else {
        return;
    };
    let admin = test_client();
    login(&admin, &base_url, &admin_address, &admin_signature).await;
    let center_id = create_center(&admin, &base_url, "Pagination Center").await;

    for i in 0..3 {
        let resp = admin
            .post(format!("{}/api/distributions", base_url))
            .json(&serde_json::json!({
                "centerId": center_id,
                "commodity": "Rice",
                "quantity": format!("{}kg", (i + 1) * 100),
                "date": "2026-09-20"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    let body: serde_json::Value = admin
        .get(format!(
            "{}/api/distributions?centerId={}&limit=2&page=1",
            base_url, center_id
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["distributions"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 2);
    assert_eq!(body["pagination"]["pages"], 2);
}

// ============================================================================
// Grievance Tests
// ============================================================================

#[tokio::test]
async fn test_citizen_sees_only_own_grievances() {
    let Some((base_url, mut con, admin_address, admin_signature)) = spawn_test_server().await
    else {
        return;
    };
    let admin = test_client();
    login(&admin, &base_url, &admin_address, &admin_signature).await;
    let center_id = create_center(&admin, &base_url, "Grievance Center").await;

    // Two citizens; identities demoted from the volunteer default
    let mut citizens = Vec::new();
    for _ in 0..2 {
        let client = test_client();
        let (_key, address, signature) = test_wallet();
        login(&client, &base_url, &address, &signature).await;

        let (mut user, _) = storage::user::create_if_absent(&mut con, &address)
            .await
            .unwrap();
        user.role = Role::Citizen;
        storage::user::update_user(&mut con, &mut user).await.unwrap();

        citizens.push((client, address.to_lowercase()));
    }

    // Each citizen files one grievance
    for (client, _address) in &citizens {
        let resp = client
            .post(format!("{}/api/grievances", base_url))
            .json(&serde_json::json!({
                "title": "Short-weighed ration",
                "description": "Received 4kg against a 5kg entitlement",
                "centerId": center_id
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert!(body["grievance"]["grievanceId"]
            .as_str()
            .unwrap()
            .starts_with("GR-"));
        assert_eq!(body["grievance"]["status"], "open");
    }

    // Listing is scoped to the caller for citizens
    for (client, address) in &citizens {
        let body: serde_json::Value = client
            .get(format!("{}/api/grievances", base_url))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let grievances = body["grievances"].as_array().unwrap();
        assert!(!grievances.is_empty());
        for g in grievances {
            assert_eq!(g["userId"].as_str().unwrap(), address);
        }
    }

    // A citizen cannot read another citizen's grievance
    let other_list: serde_json::Value = citizens[1]
        .0
        .get(format!("{}/api/grievances", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let other_id = other_list["grievances"][0]["id"].as_str().unwrap();

    let resp = citizens[0]
        .0
        .get(format!("{}/api/grievances/{}", base_url, other_id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // Staff see everything; the admin can resolve it
    let resp = admin
        .put(format!("{}/api/grievances/{}", base_url, other_id))
        .json(&serde_json::json!({
            "status": "resolved",
            "resolution": "Stock register corrected"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["grievance"]["status"], "resolved");
    assert_eq!(body["grievance"]["resolution"], "Stock register corrected");
}

// ============================================================================
// Dashboard and Page Gate Tests
// ============================================================================

#[tokio::test]
async fn test_dashboard_stats_shape() {
    let Some((base_url, _con, admin_address, admin_signature)) = spawn_test_server().await
    else {
        return;
    };
    let admin = test_client();
    login(&admin, &base_url, &admin_address, &admin_signature).await;

    let body: serde_json::Value = admin
        .get(format!("{}/api/dashboard/stats", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let stats = &body["stats"];
    assert!(stats["totalCenters"].is_u64());
    assert!(stats["totalDistributions"].is_u64());
    assert_eq!(
        stats["estimatedBeneficiaries"].as_u64().unwrap(),
        stats["totalDistributions"].as_u64().unwrap() * 20
    );
    assert!(stats["averageTrustScore"].is_u64());
    assert!(stats["openGrievances"].is_u64());
    assert!(body["recentDistributions"].is_array());
    assert!(body["upcomingDistributions"].is_array());
}

#[tokio::test]
async fn test_page_gates_redirect() {
    let Some((base_url, _con, admin_address, admin_signature)) = spawn_test_server().await
    else {
        return;
    };

    // Unauthenticated dashboard access bounces to the login page
    let bare = test_client();
    let resp = bare
        .get(format!("{}/dashboard", base_url))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers().get("location").unwrap(), "/login");

    // Authenticated login-page access bounces to the dashboard
    let admin = test_client();
    login(&admin, &base_url, &admin_address, &admin_signature).await;
    let resp = admin
        .get(format!("{}/login", base_url))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers().get("location").unwrap(), "/dashboard");
}
