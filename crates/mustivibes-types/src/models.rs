use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::de;

// -- People references --

/// A user embedded in another document (reporter, payer, notification
/// subject). The backend populates these as objects; older documents carry
/// only the id string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct PartyRef {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<Value> for PartyRef {
    fn from(value: Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        match &value {
            Value::Object(_) => PartyRef {
                id: value.get("_id").and_then(de::id_from_value),
                name: text("name"),
                nickname: text("nickname"),
                mobile: text("mobile"),
                email: text("email"),
            },
            other => PartyRef {
                id: de::id_from_value(other),
                ..Default::default()
            },
        }
    }
}

// -- Admin --

/// Mongoose builds with `virtuals` send both `_id` and `id`; older ones
/// send only `_id`. Either is taken, whichever is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct AdminProfile {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for AdminProfile {
    type Error = String;

    fn try_from(mut doc: Map<String, Value>) -> Result<Self, Self::Error> {
        let virtual_id = doc.remove("id");
        let mongo_id = doc.remove("_id");
        let id = mongo_id
            .as_ref()
            .and_then(de::id_from_value)
            .or_else(|| virtual_id.as_ref().and_then(de::id_from_value))
            .ok_or_else(|| "admin profile has no id".to_string())?;

        let mut text = |key: &str| match doc.remove(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        let email = text("email").unwrap_or_default();
        let name = text("name");
        let role = text("role");

        Ok(AdminProfile {
            id,
            email,
            name,
            role,
            extra: doc,
        })
    }
}

// -- Users --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", default, deserialize_with = "de::object_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default, deserialize_with = "de::number")]
    pub wallet: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub coins: f64,
    #[serde(default, deserialize_with = "de::id_list")]
    pub followers: Vec<String>,
    #[serde(default, deserialize_with = "de::id_list")]
    pub following: Vec<String>,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_blocked: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub has_warning: bool,
    #[serde(default, deserialize_with = "de::integer")]
    pub warning_count: i64,
    #[serde(default, deserialize_with = "de::flag")]
    pub profile_completed: bool,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// Profile fields the console does not interpret (photos, location,
    /// match stats). Kept so detail views pass them through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// -- Payments --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Created,
    Pending,
    Success,
    Failed,
    Other(String),
}

impl PaymentStatus {
    /// `paid`, `success` and `completed` all mean money arrived.
    pub fn is_successful(&self) -> bool {
        matches!(self, PaymentStatus::Success)
    }

    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Created => "created",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Other(s) => s,
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "created" => PaymentStatus::Created,
            "pending" => PaymentStatus::Pending,
            "paid" | "success" | "completed" | "captured" => PaymentStatus::Success,
            "failed" => PaymentStatus::Failed,
            _ => PaymentStatus::Other(raw),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id", default, deserialize_with = "de::object_id")]
    pub id: String,
    #[serde(default, alias = "userId")]
    pub user: Option<PartyRef>,
    #[serde(default, deserialize_with = "de::number")]
    pub amount: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub coins: f64,
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

// -- Coins --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinPackage {
    #[serde(rename = "_id", default, deserialize_with = "de::object_id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::number")]
    pub coins: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub price: f64,
    #[serde(default = "active_by_default", deserialize_with = "de::flag")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralConfig {
    #[serde(rename = "_id", default, deserialize_with = "de::object_id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::number")]
    pub coins: f64,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// How many coins a rupee amount buys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinConversion {
    #[serde(rename = "_id", default, deserialize_with = "de::object_id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::number")]
    pub coins: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub amount: f64,
    #[serde(default = "active_by_default", deserialize_with = "de::flag")]
    pub is_active: bool,
}

/// Coins charged per minute of a call type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionRule {
    #[serde(rename = "_id", default, deserialize_with = "de::object_id")]
    pub id: String,
    #[serde(default)]
    pub call_type: String,
    #[serde(default, deserialize_with = "de::number")]
    pub coins_per_minute: f64,
    #[serde(default = "active_by_default", deserialize_with = "de::flag")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

// -- Rooms --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(rename = "_id", default, deserialize_with = "de::object_id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::opt_object_id")]
    pub admin_id: Option<String>,
    #[serde(default)]
    pub tag: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    /// `DD-MM-YYYY hh:mm AM/PM`, in the platform's local time.
    #[serde(default)]
    pub start_date_time: String,
    /// Minutes.
    #[serde(default, deserialize_with = "de::integer")]
    pub duration: i64,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

// -- Moderation --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReportStatus {
    Pending,
    Approved,
    Rejected,
    Other(String),
}

impl ReportStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Approved => "approved",
            ReportStatus::Rejected => "rejected",
            ReportStatus::Other(s) => s,
        }
    }
}

impl Default for ReportStatus {
    fn default() -> Self {
        ReportStatus::Pending
    }
}

impl From<String> for ReportStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "pending" => ReportStatus::Pending,
            "approved" => ReportStatus::Approved,
            "rejected" => ReportStatus::Rejected,
            _ => ReportStatus::Other(raw),
        }
    }
}

impl From<ReportStatus> for String {
    fn from(status: ReportStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(rename = "_id", default, deserialize_with = "de::object_id")]
    pub id: String,
    #[serde(default)]
    pub reported_by: Option<PartyRef>,
    #[serde(default)]
    pub reported_user: Option<PartyRef>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub admin_comment: Option<String>,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    #[serde(rename = "_id", default, deserialize_with = "de::object_id")]
    pub id: String,
    #[serde(default)]
    pub reported_user: Option<PartyRef>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub admin_comment: Option<String>,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A warning category shown to users, with its guideline lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarningGuideline {
    #[serde(rename = "_id", default, deserialize_with = "de::object_id")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: Vec<String>,
}

// -- Notifications --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id", default, deserialize_with = "de::object_id")]
    pub id: String,
    /// follow, unfollow, block, unblock, feedback_submitted, test, ...
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_read: bool,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub related_user: Option<PartyRef>,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

// -- Dashboard --

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    #[serde(default)]
    pub summary: DashboardSummary,
    #[serde(default)]
    pub charts: DashboardCharts,
    #[serde(default)]
    pub recent_activity: RecentActivity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSummary {
    pub users: UserStats,
    pub calls: CallStats,
    pub coins: CoinStats,
    pub payments: PaymentStats,
    pub communication: CommunicationStats,
    pub messages: MessageStats,
    pub moderation: ModerationStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserStats {
    pub total: u64,
    pub new_today: u64,
    pub male: u64,
    pub female: u64,
    pub profile_completed: u64,
    pub with_location: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CallStats {
    pub total: u64,
    pub active: u64,
    pub ended: u64,
    pub missed: u64,
    pub male_to_male: u64,
    pub total_duration: f64,
    pub avg_duration: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoinStats {
    pub total_in_system: f64,
    pub admin_balance: f64,
    pub avg_per_user: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentStats {
    pub completed: u64,
    pub total_revenue: f64,
    pub total_coins_sold: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommunicationStats {
    pub total_chat_requests: u64,
    pub approved: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageStats {
    pub total: u64,
    pub unread: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModerationStats {
    pub total_reports: u64,
    pub pending_reports: u64,
    pub approved_reports: u64,
    pub warnings_issued: u64,
    pub users_with_warnings: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardCharts {
    pub user_growth: Vec<CountPoint>,
    pub call_volume: Vec<CountPoint>,
    pub revenue: Vec<RevenuePoint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CountPoint {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenuePoint {
    pub date: String,
    pub revenue: f64,
    pub coins: f64,
}

/// Recent rows are shown verbatim, so they stay untyped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentActivity {
    pub users: Vec<Value>,
    pub payments: Vec<Value>,
    pub calls: Vec<Value>,
}
