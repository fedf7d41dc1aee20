use axum::{Extension, extract::State};
use tracing::info;

use mustivibes_types::api::{
    ChangePasswordRequest, ChangePasswordResponse, PasswordStrength, Preferences,
};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::extract::Json;
use crate::middleware::AdminSession;

/// Length-only rating shown next to the new password.
pub fn password_strength(password: &str) -> PasswordStrength {
    match password.chars().count() {
        0..=6 => PasswordStrength::Weak,
        7..=10 => PasswordStrength::Medium,
        _ => PasswordStrength::Strong,
    }
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ChangePasswordResponse>, ApiError> {
    if req.current_password.is_empty() || req.new_password.is_empty() {
        return Err(ApiError::bad_request("Current and new password are required"));
    }

    state
        .backend
        .change_password(&session.backend_token, &req.current_password, &req.new_password)
        .await?;

    info!("Admin {} changed their password", session.admin.email);
    Ok(Json(ChangePasswordResponse {
        message: "Password updated".into(),
        strength: password_strength(&req.new_password),
    }))
}

// -- Shell preferences --

pub async fn get_preferences(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> Result<Json<Preferences>, ApiError> {
    let prefs = state
        .db
        .get_preferences(&session.admin.id)?
        .map(|row| Preferences {
            dark_mode: row.dark_mode,
            sidebar_collapsed: row.sidebar_collapsed,
        })
        .unwrap_or_default();
    Ok(Json(prefs))
}

pub async fn put_preferences(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Json(prefs): Json<Preferences>,
) -> Result<Json<Preferences>, ApiError> {
    state
        .db
        .save_preferences(&session.admin.id, prefs.dark_mode, prefs.sidebar_collapsed)?;
    Ok(Json(prefs))
}
