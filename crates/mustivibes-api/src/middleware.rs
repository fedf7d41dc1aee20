use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde_json::Map;
use tracing::debug;

use mustivibes_types::api::Claims;
use mustivibes_types::models::AdminProfile;

use crate::auth::AppState;
use crate::error::ApiError;

/// The signed-in admin, inserted into request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub id: String,
    pub admin: AdminProfile,
    /// Bearer for backend calls made on this admin's behalf.
    pub backend_token: String,
}

/// Validate the console JWT from the Authorization header and load the
/// session it names. Expired or logged-out sessions are rejected even when
/// the token itself still verifies.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(ApiError::unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(ApiError::unauthorized)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        debug!("Rejected console token: {}", e);
        ApiError::unauthorized()
    })?;

    let session_id = token_data.claims.sub.to_string();
    let row = state
        .db
        .get_active_session(&session_id)?
        .ok_or_else(ApiError::unauthorized)?;

    let admin = serde_json::from_str(&row.admin_json).unwrap_or_else(|_| AdminProfile {
        id: row.admin_id.clone(),
        email: row.email.clone(),
        name: None,
        role: None,
        extra: Map::new(),
    });

    req.extensions_mut().insert(AdminSession {
        id: row.id,
        admin,
        backend_token: row.backend_token,
    });
    Ok(next.run(req).await)
}
