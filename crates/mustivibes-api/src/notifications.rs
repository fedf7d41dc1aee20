use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use mustivibes_backend::BackendError;
use mustivibes_types::api::{BulkIdsRequest, BulkOutcome};
use mustivibes_types::models::Notification;

use crate::auth::AppState;
use crate::error::{ApiError, checked_id};
use crate::extract::{Json, Path, Query};
use crate::listing::{self, ListQuery, Listable, Page, SortKey};
use crate::middleware::AdminSession;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadFilter {
    #[default]
    All,
    Read,
    Unread,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotificationFilters {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub read: ReadFilter,
}

impl NotificationFilters {
    fn keeps(&self, n: &Notification) -> bool {
        let kind_ok = self
            .kind
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !k.eq_ignore_ascii_case("all"))
            .is_none_or(|k| n.kind.eq_ignore_ascii_case(k));
        let read_ok = match self.read {
            ReadFilter::All => true,
            ReadFilter::Read => n.is_read,
            ReadFilter::Unread => !n.is_read,
        };
        kind_ok && read_ok
    }
}

impl Listable for Notification {
    const SORT_COLUMNS: &'static [&'static str] = &["createdAt", "type", "title"];

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        listing::fields([
            self.title.as_deref(),
            self.body.as_deref(),
            self.related_user.as_ref().and_then(|u| u.name.as_deref()),
        ])
    }

    fn sort_key(&self, column: &str) -> SortKey {
        match column {
            "type" => SortKey::text(Some(self.kind.as_str())),
            "title" => SortKey::text(self.title.as_deref()),
            _ => SortKey::time(self.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationList {
    #[serde(flatten)]
    pub page: Page<Notification>,
    pub unread_count: u64,
    /// Per-type totals over the whole feed, for the type filter chips.
    pub type_counts: BTreeMap<String, usize>,
}

fn type_counts(feed: &[Notification]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for n in feed {
        *counts.entry(n.kind.clone()).or_default() += 1;
    }
    counts
}

pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(list): Query<ListQuery>,
    Query(filters): Query<NotificationFilters>,
) -> Result<Json<NotificationList>, ApiError> {
    let feed = state.backend.list_notifications(&session.backend_token).await?;
    let type_counts = type_counts(&feed.notifications);
    let rows = listing::select(feed.notifications, &list, |n| filters.keeps(n))?;

    Ok(Json(NotificationList {
        page: listing::paginate(rows, &list),
        unread_count: feed.unread_count,
        type_counts,
    }))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .backend
        .mark_notification_read(&session.backend_token, checked_id(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_notification(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .backend
        .delete_notification(&session.backend_token, checked_id(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Validated, de-duplicated ids in request order.
fn distinct_ids(ids: &[String]) -> Result<Vec<String>, ApiError> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        let id = checked_id(id)?;
        if seen.insert(id) {
            out.push(id.to_string());
        }
    }
    Ok(out)
}

/// Which ids a mark-read request touches: the chosen ones that are still
/// unread, or every unread notification when none were chosen.
fn unread_targets(feed: &[Notification], chosen: Option<Vec<String>>) -> Vec<String> {
    let unread = feed.iter().filter(|n| !n.is_read).map(|n| n.id.clone());
    match chosen {
        None => unread.collect(),
        Some(chosen) => {
            let unread: HashSet<String> = unread.collect();
            chosen.into_iter().filter(|id| unread.contains(id)).collect()
        }
    }
}

/// Failures are already logged per id by the bulk runner.
fn tally(results: Vec<(String, Result<(), BackendError>)>) -> BulkOutcome {
    let flat: Vec<_> = results.into_iter().map(|(_, result)| result).collect();
    BulkOutcome::from_results(&flat)
}

pub async fn mark_many_read(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Json(req): Json<BulkIdsRequest>,
) -> Result<Json<BulkOutcome>, ApiError> {
    let chosen = req.ids.as_deref().map(distinct_ids).transpose()?;
    let feed = state.backend.list_notifications(&session.backend_token).await?;
    let targets = unread_targets(&feed.notifications, chosen);

    if targets.is_empty() {
        return Ok(Json(BulkOutcome::default()));
    }

    let results = state
        .backend
        .mark_notifications_read(&session.backend_token, targets)
        .await;
    let outcome = tally(results);
    info!(
        "Admin {} marked {} notifications read ({} failed)",
        session.admin.email, outcome.succeeded, outcome.failed
    );
    Ok(Json(outcome))
}

pub async fn delete_many(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Json(req): Json<BulkIdsRequest>,
) -> Result<Json<BulkOutcome>, ApiError> {
    let ids = distinct_ids(req.ids.as_deref().unwrap_or_default())?;
    if ids.is_empty() {
        return Err(ApiError::bad_request("Select at least one notification"));
    }

    let results = state
        .backend
        .delete_notifications(&session.backend_token, ids)
        .await;
    let outcome = tally(results);
    info!(
        "Admin {} deleted {} notifications ({} failed)",
        session.admin.email, outcome.succeeded, outcome.failed
    );
    Ok(Json(outcome))
}
