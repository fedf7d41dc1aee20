//! Warnings issued to users, and the guideline categories admins pick
//! them from.

use std::borrow::Cow;

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use mustivibes_types::api::WarningGuidelineInput;
use mustivibes_types::models::{Warning, WarningGuideline};

use crate::auth::AppState;
use crate::csv::{self, CsvRow};
use crate::error::{ApiError, checked_id};
use crate::extract::{Json, Path, Query};
use crate::listing::{self, ListQuery, Listable, Page, SortKey};
use crate::middleware::AdminSession;

// -- Issued warnings --

#[derive(Debug, Default, Deserialize)]
pub struct WarningFilters {
    /// `all` or a number of days back from now.
    #[serde(default)]
    pub within: Option<String>,
}

impl WarningFilters {
    /// Earliest issue time kept, or `None` for the whole history.
    fn since(&self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, ApiError> {
        let days = match self.within.as_deref().map(str::trim) {
            None | Some("") => return Ok(None),
            Some(raw) if raw.eq_ignore_ascii_case("all") => return Ok(None),
            Some(raw) => raw.parse::<u32>().ok().filter(|days| *days > 0),
        };
        let days =
            days.ok_or_else(|| ApiError::bad_request("'within' must be 'all' or a number of days"))?;
        now.checked_sub_signed(Duration::days(days.into()))
            .map(Some)
            .ok_or_else(|| ApiError::bad_request("'within' reaches too far back"))
    }
}

fn issued_within(warning: &Warning, since: Option<DateTime<Utc>>) -> bool {
    match since {
        None => true,
        Some(since) => warning.created_at.is_some_and(|at| at >= since),
    }
}

impl Listable for Warning {
    const SORT_COLUMNS: &'static [&'static str] = &["createdAt", "reason"];

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        listing::fields([
            Some(self.reason.as_str()),
            self.reported_user.as_ref().and_then(|u| u.name.as_deref()),
            self.admin_comment.as_deref(),
        ])
    }

    fn sort_key(&self, column: &str) -> SortKey {
        match column {
            "reason" => SortKey::text(Some(self.reason.as_str())),
            _ => SortKey::time(self.created_at),
        }
    }
}

impl CsvRow for Warning {
    const HEADER: &'static [&'static str] = &["User", "Mobile", "Reason", "Admin Comment", "Date"];

    fn csv_fields(&self) -> Vec<String> {
        let user = self.reported_user.as_ref();
        vec![
            user.and_then(|u| u.name.clone()).unwrap_or_else(|| "Unknown".into()),
            user.and_then(|u| u.mobile.clone()).unwrap_or_else(|| "N/A".into()),
            self.reason.clone(),
            self.admin_comment.clone().unwrap_or_else(|| "-".into()),
            csv::date(self.created_at),
        ]
    }
}

async fn selected_warnings(
    state: &AppState,
    session: &AdminSession,
    list: &ListQuery,
    filters: &WarningFilters,
) -> Result<Vec<Warning>, ApiError> {
    let since = filters.since(Utc::now())?;
    let warnings = state.backend.list_warnings(&session.backend_token).await?;
    listing::select(warnings, list, |w| issued_within(w, since))
}

pub async fn list_warnings(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(list): Query<ListQuery>,
    Query(filters): Query<WarningFilters>,
) -> Result<Json<Page<Warning>>, ApiError> {
    let warnings = selected_warnings(&state, &session, &list, &filters).await?;
    Ok(Json(listing::paginate(warnings, &list)))
}

pub async fn export_warnings(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(list): Query<ListQuery>,
    Query(filters): Query<WarningFilters>,
) -> Result<Response, ApiError> {
    let warnings = selected_warnings(&state, &session, &list, &filters).await?;
    Ok(csv::download("warnings", &warnings))
}

// -- Guidelines --

/// Trimmed type and non-blank description lines.
fn clean_guideline(input: WarningGuidelineInput) -> Result<(String, Vec<String>), ApiError> {
    let kind = input.kind.trim().to_string();
    if kind.is_empty() {
        return Err(ApiError::bad_request("Warning type is required"));
    }
    let description: Vec<String> = input
        .description
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if description.is_empty() {
        return Err(ApiError::bad_request("Add at least one guideline line"));
    }
    Ok((kind, description))
}

impl Listable for WarningGuideline {
    const SORT_COLUMNS: &'static [&'static str] = &["type"];

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        std::iter::once(self.kind.as_str())
            .chain(self.description.iter().map(String::as_str))
            .map(Cow::Borrowed)
            .collect()
    }

    fn sort_key(&self, _column: &str) -> SortKey {
        SortKey::text(Some(self.kind.as_str()))
    }
}

pub async fn list_guidelines(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(list): Query<ListQuery>,
) -> Result<Json<Page<WarningGuideline>>, ApiError> {
    let guidelines = state
        .backend
        .list_warning_guidelines(&session.backend_token)
        .await?;
    let guidelines = listing::select(guidelines, &list, |_| true)?;
    Ok(Json(listing::paginate(guidelines, &list)))
}

pub async fn create_guideline(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Json(input): Json<WarningGuidelineInput>,
) -> Result<impl IntoResponse, ApiError> {
    let (kind, description) = clean_guideline(input)?;
    let body = state
        .backend
        .create_warning_guideline(&session.backend_token, &kind, &description)
        .await?;
    info!("Admin {} added warning type '{}'", session.admin.email, kind);
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn update_guideline(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
    Json(input): Json<WarningGuidelineInput>,
) -> Result<Json<Value>, ApiError> {
    let (kind, description) = clean_guideline(input)?;
    let body = state
        .backend
        .update_warning_guideline(&session.backend_token, checked_id(&id)?, &kind, &description)
        .await?;
    Ok(Json(body))
}

pub async fn delete_guideline(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .backend
        .delete_warning_guideline(&session.backend_token, checked_id(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
