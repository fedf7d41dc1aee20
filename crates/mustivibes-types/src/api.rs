use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::AdminProfile;

// -- Console token claims --

/// Claims of the bearer token the console hands to its own clients. The
/// backend's admin token never leaves the session store; `sub` names the
/// session that holds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub admin_id: String,
    pub email: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub admin: AdminProfile,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

#[derive(Debug, Serialize)]
pub struct ChangePasswordResponse {
    pub message: String,
    pub strength: PasswordStrength,
}

// -- Shell --

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub sidebar_collapsed: bool,
}

// -- Rooms --

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub tag: String,
    #[serde(rename = "type", default = "default_room_type")]
    pub kind: String,
    #[serde(default)]
    pub duration: i64,
    /// `YYYY-MM-DDTHH:MM` as produced by a datetime-local input.
    #[serde(default)]
    pub start: String,
}

fn default_room_type() -> String {
    "audio".to_string()
}

// -- Coins --

#[derive(Debug, Deserialize)]
pub struct PackageInput {
    pub coins: f64,
    pub price: f64,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ReferralInput {
    pub coins: f64,
}

#[derive(Debug, Deserialize)]
pub struct CoinConversionInput {
    pub coins: f64,
    pub amount: f64,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct DeductionRuleInput {
    #[serde(default)]
    pub call_type: String,
    pub coins_per_minute: f64,
    #[serde(default)]
    pub is_active: Option<bool>,
}

// -- Moderation --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportAction {
    Approve,
    Reject,
}

#[derive(Debug, Deserialize)]
pub struct ReportActionRequest {
    pub action: ReportAction,
    #[serde(default)]
    pub admin_comment: String,
}

#[derive(Debug, Deserialize)]
pub struct WarningGuidelineInput {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: Vec<String>,
}

// -- Bulk actions --

#[derive(Debug, Default, Deserialize)]
pub struct BulkIdsRequest {
    /// Absent means "every eligible row".
    #[serde(default)]
    pub ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub requested: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BulkOutcome {
    pub fn from_results<T, E>(results: &[Result<T, E>]) -> Self {
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        BulkOutcome {
            requested: results.len(),
            succeeded,
            failed: results.len() - succeeded,
        }
    }
}
