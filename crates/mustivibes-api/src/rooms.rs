use std::borrow::Cow;
use std::collections::BTreeMap;

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use mustivibes_backend::NewRoom;
use mustivibes_types::api::CreateRoomRequest;
use mustivibes_types::models::Room;
use mustivibes_types::room::{self, RoomStatus};

use crate::auth::AppState;
use crate::csv::{self, CsvRow};
use crate::error::ApiError;
use crate::extract::{Json, Query};
use crate::listing::{self, ListQuery, Listable, Page, SortKey};
use crate::middleware::AdminSession;

const ROOM_TYPES: &[&str] = &["audio", "video"];

/// A room with its status as of the request.
#[derive(Debug, Clone, Serialize)]
pub struct RoomRow {
    #[serde(flatten)]
    pub room: Room,
    pub status: RoomStatus,
}

impl RoomRow {
    pub fn at(room: Room, now: NaiveDateTime) -> Self {
        let status = RoomStatus::derive(&room.start_date_time, room.duration, now);
        RoomRow { room, status }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RoomFilters {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl RoomFilters {
    /// `all` and blank mean no filter.
    fn chosen(value: &Option<String>) -> Option<&str> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
    }

    fn status(&self) -> Result<Option<RoomStatus>, ApiError> {
        Self::chosen(&self.status)
            .map(|raw| {
                RoomStatus::parse(raw)
                    .ok_or_else(|| ApiError::bad_request(format!("unknown room status '{raw}'")))
            })
            .transpose()
    }

    fn keeps(&self, row: &RoomRow, status: Option<RoomStatus>) -> bool {
        status.is_none_or(|s| row.status == s)
            && Self::chosen(&self.kind).is_none_or(|k| row.room.kind.eq_ignore_ascii_case(k))
    }
}

impl Listable for RoomRow {
    const SORT_COLUMNS: &'static [&'static str] = &["startDateTime", "duration", "tag", "status"];

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.room.tag.as_str()), Cow::Borrowed(self.room.kind.as_str())]
    }

    fn sort_key(&self, column: &str) -> SortKey {
        match column {
            "duration" => SortKey::Number(self.room.duration as f64),
            "tag" => SortKey::text(Some(self.room.tag.as_str())),
            "status" => SortKey::text(Some(self.status.as_str())),
            // Stored as text; compare the parsed time instead.
            _ => room::parse_start(&self.room.start_date_time)
                .map_or(SortKey::Missing, |t| SortKey::Time(t.and_utc())),
        }
    }
}

impl CsvRow for RoomRow {
    const HEADER: &'static [&'static str] = &["Tag", "Type", "Start", "Duration (min)", "Status"];

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.room.tag.clone(),
            self.room.kind.clone(),
            self.room.start_date_time.clone(),
            self.room.duration.to_string(),
            self.status.as_str().to_string(),
        ]
    }
}

#[derive(Debug, Serialize)]
pub struct RoomList {
    #[serde(flatten)]
    pub page: Page<RoomRow>,
    /// Over every room, so the status tabs can show their sizes.
    pub counts: BTreeMap<&'static str, usize>,
}

fn status_counts(rows: &[RoomRow]) -> BTreeMap<&'static str, usize> {
    let mut counts: BTreeMap<&'static str, usize> =
        RoomStatus::ALL.iter().map(|s| (s.as_str(), 0)).collect();
    for row in rows {
        *counts.entry(row.status.as_str()).or_default() += 1;
    }
    counts
}

async fn room_rows(state: &AppState, session: &AdminSession) -> Result<Vec<RoomRow>, ApiError> {
    let rooms = state.backend.list_rooms(&session.backend_token).await?;
    let now = state.local_now();
    Ok(rooms.into_iter().map(|room| RoomRow::at(room, now)).collect())
}

pub async fn list_rooms(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(list): Query<ListQuery>,
    Query(filters): Query<RoomFilters>,
) -> Result<Json<RoomList>, ApiError> {
    let status = filters.status()?;
    let rows = room_rows(&state, &session).await?;
    let counts = status_counts(&rows);
    let rows = listing::select(rows, &list, |r| filters.keeps(r, status))?;

    Ok(Json(RoomList {
        page: listing::paginate(rows, &list),
        counts,
    }))
}

pub async fn export_rooms(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(list): Query<ListQuery>,
    Query(filters): Query<RoomFilters>,
) -> Result<Response, ApiError> {
    let status = filters.status()?;
    let rows = room_rows(&state, &session).await?;
    let rows = listing::select(rows, &list, |r| filters.keeps(r, status))?;
    Ok(csv::download("rooms", &rows))
}

pub async fn create_room(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tag = req.tag.trim();
    if tag.is_empty() {
        return Err(ApiError::bad_request("Room tag is required"));
    }
    let kind = req.kind.trim().to_ascii_lowercase();
    if !ROOM_TYPES.contains(&kind.as_str()) {
        return Err(ApiError::bad_request("Room type must be audio or video"));
    }
    if req.duration <= 0 {
        return Err(ApiError::bad_request("Duration must be a positive number of minutes"));
    }
    let start = room::normalize_start(&req.start)
        .ok_or_else(|| ApiError::bad_request("Start time must look like 2026-01-29T18:08"))?;

    let created = state
        .backend
        .create_room(
            &session.backend_token,
            &NewRoom {
                admin_id: &session.admin.id,
                kind: &kind,
                tag,
                duration: req.duration,
                start_date_time: &start,
            },
        )
        .await?;

    info!("Admin {} scheduled room '{}' for {}", session.admin.email, tag, start);
    Ok((StatusCode::CREATED, Json(RoomRow::at(created, state.local_now()))))
}
