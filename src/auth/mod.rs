//! Wallet-signature authentication: message verification, session tokens,
//! and the request extractors that gate the API.

pub mod middleware;
pub mod token;
pub mod verify;

pub use middleware::{check_rate_limit, AdminUser, AppState, AuthUser, TOKEN_COOKIE};
pub use token::{issue_token, validate_token, Claims};
pub use verify::{normalize_address, verify_wallet_signature, LOGIN_MESSAGE};
