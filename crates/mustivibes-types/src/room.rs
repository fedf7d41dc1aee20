//! Room scheduling times and the derived live/upcoming/completed label.
//!
//! Rooms store their start as a display string, `DD-MM-YYYY hh:mm AM/PM`,
//! in the platform's local time with no zone attached. Status is never
//! persisted; it is recomputed against "now" whenever a room is shown.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// chrono format for `29-01-2026 06:08 PM`.
pub const START_FORMAT: &str = "%d-%m-%Y %I:%M %p";

/// Formats accepted from admin forms (`<input type="datetime-local">`).
const INPUT_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Upcoming,
    Live,
    Completed,
    Unknown,
}

impl RoomStatus {
    pub const ALL: [RoomStatus; 4] = [
        RoomStatus::Upcoming,
        RoomStatus::Live,
        RoomStatus::Completed,
        RoomStatus::Unknown,
    ];

    /// Status of a room starting at `start` (display string) and lasting
    /// `duration_minutes`, as seen at `now`. Both ends of the window count
    /// as live.
    pub fn derive(start: &str, duration_minutes: i64, now: NaiveDateTime) -> Self {
        let Some(start) = parse_start(start) else {
            return RoomStatus::Unknown;
        };
        let end = start + Duration::minutes(duration_minutes.max(0));

        if now < start {
            RoomStatus::Upcoming
        } else if now <= end {
            RoomStatus::Live
        } else {
            RoomStatus::Completed
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoomStatus::Upcoming => "upcoming",
            RoomStatus::Live => "live",
            RoomStatus::Completed => "completed",
            RoomStatus::Unknown => "unknown",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

pub fn parse_start(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), START_FORMAT).ok()
}

pub fn format_start(at: NaiveDateTime) -> String {
    at.format(START_FORMAT).to_string()
}

/// Normalise a start time typed into the create-room form. Accepts the
/// ISO-ish forms a browser produces as well as the stored display format.
pub fn normalize_start(raw: &str) -> Option<String> {
    let raw = raw.trim();
    INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| parse_start(raw))
        .map(format_start)
}
