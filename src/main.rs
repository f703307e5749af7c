//! Rationchain application entry point.
//!
//! Bootstraps the server:
//! 1. Load configuration from environment
//! 2. Connect to Redis
//! 3. Upsert the admin identity when ADMIN_WALLET is set
//! 4. Build router with API routes + static file serving
//! 5. Apply security headers middleware
//! 6. Start Axum server
//!
//! Also supports a `keygen` subcommand for generating test wallets.

use rationchain::{
    auth::middleware::AppState,
    auth::verify::{address_from_key, sign_wallet_message, LOGIN_MESSAGE},
    config::Config,
    middleware::security_headers,
    routes, storage,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

/// Generate a fresh wallet and a ready-to-use login signature.
fn keygen() -> Result<(), String> {
    use k256::ecdsa::SigningKey;

    // A random 32-byte seed is rejected only when it falls outside the
    // curve order; retry rather than unwrap.
    let key = loop {
        let mut seed = [0u8; 32];
        rand::fill(&mut seed);
        if let Ok(key) = SigningKey::from_slice(&seed) {
            break key;
        }
    };

    let address = address_from_key(key.verifying_key());
    let signature =
        sign_wallet_message(&key, LOGIN_MESSAGE).map_err(|e| format!("Signing failed: {}", e))?;

    println!("address:     {}", address);
    println!("private key: 0x{}", hex::encode(key.to_bytes()));
    println!("signature:   {}", signature);
    Ok(())
}

fn print_keygen_usage() {
    eprintln!("Usage: rationchain keygen");
    eprintln!();
    eprintln!("Generate a wallet keypair and a login signature for local testing.");
    eprintln!();
    eprintln!("Use the address as ADMIN_WALLET in .env to bootstrap an admin, and");
    eprintln!("POST the address + signature to /api/auth/login to sign in.");
}

#[tokio::main]
async fn main() {
    // Check for keygen subcommand
    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && args[1] == "keygen" {
        if args.len() != 2 {
            print_keygen_usage();
            std::process::exit(1);
        }
        if let Err(e) = keygen() {
            eprintln!("Error generating wallet: {}", e);
            std::process::exit(1);
        }
        return;
    }

    // Initialize tracing with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config from environment
    let config = Config::from_env().expect("Failed to load config");
    tracing::info!("Starting rationchain on {}", config.bind_addr);

    // Connect to Redis
    let redis_client = redis::Client::open(config.redis_url.as_str()).expect("Invalid Redis URL");

    // Verify Redis connection
    let mut con = redis_client
        .get_multiplexed_async_connection()
        .await
        .expect("Failed to connect to Redis");

    // Bootstrap the admin identity
    if let Some(admin_wallet) = &config.admin_wallet {
        storage::user::upsert_admin(&mut con, admin_wallet)
            .await
            .expect("Failed to upsert admin identity");
        tracing::info!("Admin wallet {} configured", admin_wallet);
    }

    // Build shared state
    let state = AppState {
        redis: redis_client,
        config: Arc::new(config.clone()),
    };

    // Build router:
    // - API routes and page gates (with state)
    // - Static file serving (fallback)
    // - Security headers middleware
    // Explicit CORS: deny all cross-origin requests (single-origin deployment).
    // CorsLayer::new() with no allowed origins rejects all CORS preflight requests.
    let cors = CorsLayer::new();

    let app = routes::api_router()
        .fallback_service(ServeDir::new("static"))
        .layer(cors)
        .layer(axum::middleware::from_fn(security_headers))
        .with_state(state);

    // Bind to configured address
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Listening on {}", config.bind_addr);

    // Start server (with_connect_info required for ConnectInfo<SocketAddr> extractors)
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
