use std::borrow::Cow;

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use mustivibes_types::models::User;

use crate::auth::AppState;
use crate::csv::{self, CsvRow};
use crate::error::{ApiError, checked_id};
use crate::extract::{Json, Path, Query};
use crate::listing::{self, ListQuery, Listable, Page, SortKey};
use crate::middleware::AdminSession;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockFilter {
    #[default]
    All,
    Blocked,
    Active,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserFilters {
    #[serde(default)]
    pub status: BlockFilter,
}

impl UserFilters {
    fn keeps(&self, user: &User) -> bool {
        match self.status {
            BlockFilter::All => true,
            BlockFilter::Blocked => user.is_blocked,
            BlockFilter::Active => !user.is_blocked,
        }
    }
}

impl Listable for User {
    const SORT_COLUMNS: &'static [&'static str] = &["name", "coins", "wallet", "createdAt"];

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        listing::fields([
            self.name.as_deref(),
            self.nickname.as_deref(),
            self.mobile.as_deref(),
            self.email.as_deref(),
        ])
    }

    fn sort_key(&self, column: &str) -> SortKey {
        match column {
            "name" => SortKey::text(self.name.as_deref()),
            "coins" => SortKey::Number(self.coins),
            "wallet" => SortKey::Number(self.wallet),
            _ => SortKey::time(self.created_at),
        }
    }
}

impl CsvRow for User {
    const HEADER: &'static [&'static str] = &[
        "Name", "Nickname", "Mobile", "Email", "Gender", "Coins", "Wallet", "Blocked", "Joined",
    ];

    fn csv_fields(&self) -> Vec<String> {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        vec![
            text(&self.name),
            text(&self.nickname),
            text(&self.mobile),
            text(&self.email),
            text(&self.gender),
            csv::number(self.coins),
            csv::number(self.wallet),
            if self.is_blocked { "Yes" } else { "No" }.to_string(),
            csv::date(self.created_at),
        ]
    }
}

#[derive(Debug, Serialize)]
pub struct UserStats {
    pub followers_count: usize,
    pub following_count: usize,
    pub age: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub stats: UserStats,
}

/// Whole years between `dob` and `today`. Accepts a plain date or a full
/// timestamp; future or unparseable dates give `None`.
pub fn age_on(dob: &str, today: NaiveDate) -> Option<u32> {
    let dob = dob.trim();
    let born = NaiveDate::parse_from_str(dob, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(dob).ok().map(|t| t.date_naive()))?;

    let mut years = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

async fn selected_users(
    state: &AppState,
    session: &AdminSession,
    list: &ListQuery,
    filters: &UserFilters,
) -> Result<Vec<User>, ApiError> {
    let users = state.backend.list_users(&session.backend_token).await?;
    listing::select(users, list, |u| filters.keeps(u))
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(list): Query<ListQuery>,
    Query(filters): Query<UserFilters>,
) -> Result<Json<Page<User>>, ApiError> {
    let users = selected_users(&state, &session, &list, &filters).await?;
    Ok(Json(listing::paginate(users, &list)))
}

pub async fn export_users(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(list): Query<ListQuery>,
    Query(filters): Query<UserFilters>,
) -> Result<Response, ApiError> {
    let users = selected_users(&state, &session, &list, &filters).await?;
    Ok(csv::download("users", &users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
) -> Result<Json<UserDetail>, ApiError> {
    let user = state
        .backend
        .get_user(&session.backend_token, checked_id(&id)?)
        .await?;

    let stats = UserStats {
        followers_count: user.followers.len(),
        following_count: user.following.len(),
        age: user.dob.as_deref().and_then(|dob| age_on(dob, state.today())),
    };
    Ok(Json(UserDetail { user, stats }))
}

/// Fields an admin may not rewrite through the edit form.
const READ_ONLY_FIELDS: &[&str] = &["_id", "id", "createdAt", "updatedAt", "__v"];

pub async fn update_user(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
    Json(mut changes): Json<Map<String, Value>>,
) -> Result<Json<User>, ApiError> {
    let id = checked_id(&id)?;
    for field in READ_ONLY_FIELDS {
        changes.remove(*field);
    }
    if changes.is_empty() {
        return Err(ApiError::bad_request("No changes to save"));
    }

    let user = state
        .backend
        .update_user(&session.backend_token, id, &changes)
        .await?;
    info!("Admin {} updated user {}", session.admin.email, id);
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = checked_id(&id)?;
    state.backend.delete_user(&session.backend_token, id).await?;
    info!("Admin {} deleted user {}", session.admin.email, id);
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Clone, Copy)]
enum Relation {
    Followers,
    Following,
}

/// Row of a followers/following table: only the fields that screen shows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub mobile: Option<String>,
    pub gender: Option<String>,
    pub is_blocked: bool,
}

impl From<User> for Connection {
    fn from(user: User) -> Self {
        Connection {
            id: user.id,
            name: user.name,
            nickname: user.nickname,
            mobile: user.mobile,
            gender: user.gender,
            is_blocked: user.is_blocked,
        }
    }
}

impl Listable for Connection {
    const SORT_COLUMNS: &'static [&'static str] = &["name", "nickname"];

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        listing::fields([self.name.as_deref(), self.mobile.as_deref(), self.nickname.as_deref()])
    }

    fn sort_key(&self, column: &str) -> SortKey {
        match column {
            "name" => SortKey::text(self.name.as_deref()),
            _ => SortKey::text(self.nickname.as_deref()),
        }
    }
}

async fn relations(
    state: &AppState,
    session: &AdminSession,
    id: &str,
    relation: Relation,
    list: &ListQuery,
) -> Result<Page<Connection>, ApiError> {
    let token = &session.backend_token;
    let user = state.backend.get_user(token, checked_id(id)?).await?;
    let ids = match relation {
        Relation::Followers => user.followers,
        Relation::Following => user.following,
    };

    let people: Vec<Connection> = state
        .backend
        .get_users_many(token, &ids)
        .await
        .into_iter()
        .map(Connection::from)
        .collect();

    let people = listing::select(people, list, |_| true)?;
    Ok(listing::paginate(people, list))
}

pub async fn list_followers(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
    Query(list): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(relations(&state, &session, &id, Relation::Followers, &list).await?))
}

pub async fn list_following(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
    Query(list): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(relations(&state, &session, &id, Relation::Following, &list).await?))
}
