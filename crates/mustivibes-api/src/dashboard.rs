use axum::{Extension, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use mustivibes_types::models::DashboardData;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::extract::Json;
use crate::middleware::AdminSession;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub data: DashboardData,
    /// When the console fetched these figures. The backend does not say.
    pub fetched_at: DateTime<Utc>,
}

/// Backend-aggregated stats, passed through as-is.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let data = state.backend.dashboard(&session.backend_token).await?;
    Ok(Json(DashboardResponse {
        data,
        fetched_at: Utc::now(),
    }))
}
