//! Request, response, and storage models for the API.
//!
//! Wire formats use camelCase to match the dashboard frontend.
//! Storage models represent the JSON documents persisted in Redis.

use serde::{Deserialize, Serialize};

// ============================================================================
// Auth Models
// ============================================================================

/// Login request: a wallet address and a signature over the login message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub wallet_address: Option<String>,
    pub signature: Option<String>,
}

/// Response after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: StoredUser,
}

// ============================================================================
// Center Models
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCenterRequest {
    pub name: Option<String>,
    pub location: Option<Location>,
    pub trust_score: Option<u32>,
}

/// Partial update; fields left out are kept as stored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCenterRequest {
    pub name: Option<String>,
    pub location: Option<Location>,
    pub trust_score: Option<u32>,
}

impl UpdateCenterRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.location.is_none() && self.trust_score.is_none()
    }
}

/// Projection of a center for the trust-score board.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustScoreEntry {
    pub name: String,
    pub trust_score: u32,
}

// ============================================================================
// Distribution Models
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDistributionRequest {
    pub center_id: Option<String>,
    pub commodity: Option<String>,
    pub quantity: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub status: Option<DistributionStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDistributionRequest {
    pub commodity: Option<String>,
    pub quantity: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub status: Option<DistributionStatus>,
    pub tx_hash: Option<String>,
}

impl UpdateDistributionRequest {
    pub fn is_empty(&self) -> bool {
        self.commodity.is_none()
            && self.quantity.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.status.is_none()
            && self.tx_hash.is_none()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyDistributionRequest {
    pub distribution_id: Option<String>,
    pub geo_location: Option<Coordinates>,
    pub tx_hash: Option<String>,
}

// ============================================================================
// Grievance Models
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGrievanceRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub center_id: Option<String>,
    pub tx_hash: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGrievanceRequest {
    pub status: Option<GrievanceStatus>,
    pub assigned_to: Option<String>,
    pub resolution: Option<String>,
}

impl UpdateGrievanceRequest {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.assigned_to.is_none() && self.resolution.is_none()
    }
}

// ============================================================================
// Listing Models
// ============================================================================

/// Query parameters shared by the paginated list endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub status: Option<String>,
    pub center_id: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub pages: u64,
}

impl Pagination {
    pub fn new(total: u64, page: u64, limit: u64) -> Self {
        Pagination {
            total,
            page,
            limit,
            pages: total.div_ceil(limit.max(1)),
        }
    }
}

// ============================================================================
// Storage Models
// ============================================================================

/// Identity record as stored in Redis, keyed by normalized wallet address.
///
/// The wallet address is the sole identity key and is lower-cased before
/// storage and every comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub wallet_address: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Distribution center as stored in Redis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCenter {
    pub id: String,
    pub name: String,
    pub location: Location,
    pub trust_score: u32,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Ration delivery as stored in Redis.
///
/// `distribution_id` is the human-facing business key (`DIST-0001`);
/// `id` is the primary record key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDistribution {
    pub id: String,
    pub distribution_id: String,
    pub center_id: String,
    pub center_name: String,
    pub commodity: String,
    pub quantity: String,
    pub date: String,
    pub time: String,
    pub status: DistributionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    pub geo_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_location: Option<Coordinates>,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Citizen grievance as stored in Redis. `user_id` is the author's wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredGrievance {
    pub id: String,
    pub grievance_id: String,
    pub title: String,
    pub description: String,
    pub status: GrievanceStatus,
    pub date: String,
    pub user_id: String,
    pub user_name: String,
    pub center_id: String,
    pub center_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Audit record for an on-chain transaction hash reported by a client.
/// The hash is an opaque string; nothing here talks to a chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTransaction {
    pub tx_hash: String,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub reference_id: String,
    pub wallet_address: String,
    pub status: String,
    pub created_at: u64,
    pub updated_at: u64,
}

// ============================================================================
// Roles and Statuses
// ============================================================================

/// User role. Closed set; new roles require a code change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Ngo,
    Volunteer,
    Citizen,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Ngo => "ngo",
            Role::Volunteer => "volunteer",
            Role::Citizen => "citizen",
        }
    }

    /// Membership test used by mutating handlers.
    pub fn authorized(&self, required: &[Role]) -> bool {
        required.contains(self)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "ngo" => Ok(Role::Ngo),
            "volunteer" => Ok(Role::Volunteer),
            "citizen" => Ok(Role::Citizen),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistributionStatus {
    Scheduled,
    InProgress,
    Completed,
    Verified,
    Pending,
}

impl DistributionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionStatus::Scheduled => "scheduled",
            DistributionStatus::InProgress => "in-progress",
            DistributionStatus::Completed => "completed",
            DistributionStatus::Verified => "verified",
            DistributionStatus::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrievanceStatus {
    Open,
    InProgress,
    Resolved,
}

impl GrievanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrievanceStatus::Open => "open",
            GrievanceStatus::InProgress => "in-progress",
            GrievanceStatus::Resolved => "resolved",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Ngo, Role::Volunteer, Role::Citizen] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_authorized() {
        assert!(Role::Admin.authorized(&[Role::Admin]));
        assert!(Role::Ngo.authorized(&[Role::Admin, Role::Ngo]));
        assert!(!Role::Volunteer.authorized(&[Role::Admin]));
        assert!(!Role::Citizen.authorized(&[]));
    }

    #[test]
    fn test_status_serde_kebab_case() {
        let json = serde_json::to_string(&DistributionStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        let status: GrievanceStatus = serde_json::from_str("\"resolved\"").unwrap();
        assert_eq!(status, GrievanceStatus::Resolved);
    }

    #[test]
    fn test_user_wire_format_is_camel_case() {
        let user = StoredUser {
            wallet_address: "0xabc".to_string(),
            role: Role::Volunteer,
            name: None,
            created_at: 1,
            updated_at: 1,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["walletAddress"], "0xabc");
        assert_eq!(json["role"], "volunteer");
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_pagination_page_count() {
        assert_eq!(Pagination::new(0, 1, 10).pages, 0);
        assert_eq!(Pagination::new(10, 1, 10).pages, 1);
        assert_eq!(Pagination::new(11, 1, 10).pages, 2);
    }
}
