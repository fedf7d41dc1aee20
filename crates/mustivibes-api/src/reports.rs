use std::borrow::Cow;
use std::collections::BTreeMap;

use axum::{
    Extension,
    extract::State,
    response::Response,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use mustivibes_types::api::{ReportAction, ReportActionRequest};
use mustivibes_types::models::{PartyRef, Report, ReportStatus};

use crate::auth::AppState;
use crate::csv::{self, CsvRow};
use crate::error::{ApiError, checked_id};
use crate::extract::{Json, Path, Query};
use crate::listing::{self, ListQuery, Listable, Page, SortKey};
use crate::middleware::AdminSession;

#[derive(Debug, Deserialize)]
pub struct ReportFilters {
    /// Tab: `pending` (default), `approved`, `rejected` or `all`.
    #[serde(default = "pending_tab")]
    pub status: String,
}

fn pending_tab() -> String {
    "pending".into()
}

impl Default for ReportFilters {
    fn default() -> Self {
        ReportFilters { status: pending_tab() }
    }
}

impl ReportFilters {
    fn tab(&self) -> Option<ReportStatus> {
        let raw = self.status.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            None
        } else {
            Some(ReportStatus::from(raw.to_string()))
        }
    }
}

impl Listable for Report {
    const SORT_COLUMNS: &'static [&'static str] = &["createdAt", "reason", "status"];

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        listing::fields([
            Some(self.reason.as_str()),
            self.reported_user.as_ref().and_then(|u| u.name.as_deref()),
            self.reported_by.as_ref().and_then(|u| u.name.as_deref()),
        ])
    }

    fn sort_key(&self, column: &str) -> SortKey {
        match column {
            "reason" => SortKey::text(Some(self.reason.as_str())),
            "status" => SortKey::text(Some(self.status.as_str())),
            _ => SortKey::time(self.created_at),
        }
    }
}

impl CsvRow for Report {
    const HEADER: &'static [&'static str] = &[
        "Reporter", "Reported User", "Reason", "Status", "Admin Comment", "Date",
    ];

    fn csv_fields(&self) -> Vec<String> {
        let name = |party: &Option<PartyRef>, fallback: &str| {
            party
                .as_ref()
                .and_then(|p| p.name.clone())
                .unwrap_or_else(|| fallback.to_string())
        };
        vec![
            name(&self.reported_by, "Anonymous"),
            name(&self.reported_user, "Unknown"),
            self.reason.clone(),
            self.status.as_str().to_string(),
            self.admin_comment.clone().unwrap_or_default(),
            csv::date(self.created_at),
        ]
    }
}

#[derive(Debug, Serialize)]
pub struct ReportList {
    #[serde(flatten)]
    pub page: Page<Report>,
    /// Tab sizes over every report, regardless of the active tab.
    pub counts: BTreeMap<String, usize>,
}

fn status_counts(reports: &[Report]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = ["pending", "approved", "rejected"]
        .iter()
        .map(|s| (s.to_string(), 0))
        .collect();
    for report in reports {
        *counts.entry(report.status.as_str().to_string()).or_default() += 1;
    }
    counts
}

pub async fn list_reports(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(list): Query<ListQuery>,
    Query(filters): Query<ReportFilters>,
) -> Result<Json<ReportList>, ApiError> {
    let reports = state.backend.list_reports(&session.backend_token).await?;
    let counts = status_counts(&reports);
    let tab = filters.tab();
    let reports = listing::select(reports, &list, |r| tab.as_ref().is_none_or(|t| &r.status == t))?;

    Ok(Json(ReportList {
        page: listing::paginate(reports, &list),
        counts,
    }))
}

pub async fn export_reports(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(list): Query<ListQuery>,
    Query(filters): Query<ReportFilters>,
) -> Result<Response, ApiError> {
    let reports = state.backend.list_reports(&session.backend_token).await?;
    let tab = filters.tab();
    let reports = listing::select(reports, &list, |r| tab.as_ref().is_none_or(|t| &r.status == t))?;
    Ok(csv::download("reports", &reports))
}

pub async fn get_report(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
) -> Result<Json<Report>, ApiError> {
    let report = state
        .backend
        .get_report(&session.backend_token, checked_id(&id)?)
        .await?;
    Ok(Json(report))
}

/// Approve or reject a report. The comment is shown to the reported user,
/// so it cannot be blank.
pub async fn act_on_report(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
    Json(req): Json<ReportActionRequest>,
) -> Result<Json<Value>, ApiError> {
    let id = checked_id(&id)?;
    let comment = req.admin_comment.trim();
    if comment.is_empty() {
        return Err(ApiError::bad_request("Admin comment is required"));
    }

    let body = state
        .backend
        .handle_report(&session.backend_token, id, req.action, comment)
        .await?;

    let verb = match req.action {
        ReportAction::Approve => "approved",
        ReportAction::Reject => "rejected",
    };
    info!("Admin {} {} report {}", session.admin.email, verb, id);
    Ok(Json(body))
}
