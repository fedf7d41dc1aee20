use std::sync::Arc;

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{info, warn};
use uuid::Uuid;

use mustivibes_backend::{BackendClient, BackendError};
use mustivibes_db::Database;
use mustivibes_db::queries::NewSession;
use mustivibes_types::api::{Claims, LoginRequest, LoginResponse};

use crate::error::ApiError;
use crate::extract::Json;
use crate::middleware::AdminSession;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub backend: BackendClient,
    pub jwt_secret: String,
    pub session_ttl: Duration,
    /// Offset of the backend's wall clock. Room start strings carry no zone.
    pub utc_offset: FixedOffset,
}

impl AppStateInner {
    /// Current wall-clock time as the backend writes it.
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.utc_offset).naive_local()
    }

    pub fn today(&self) -> NaiveDate {
        self.local_now().date()
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = req.email.trim();
    if email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let (backend_token, admin) = state
        .backend
        .admin_login(email, &req.password)
        .await
        .map_err(|err| match err {
            BackendError::Rejected { message } => ApiError::Unauthorized(message),
            BackendError::Status { status, message } if (400..500).contains(&status) => {
                ApiError::Unauthorized(message)
            }
            other => ApiError::Upstream(other),
        })?;

    let session_id = Uuid::new_v4();
    let expires_at = Utc::now() + state.session_ttl;
    let admin_json = serde_json::to_string(&admin).map_err(anyhow::Error::from)?;

    state.db.create_session(&NewSession {
        id: &session_id.to_string(),
        admin_id: &admin.id,
        email: &admin.email,
        admin_json: &admin_json,
        backend_token: &backend_token,
        expires_at,
    })?;

    let token = create_token(&state.jwt_secret, session_id, &admin.id, &admin.email, expires_at.timestamp())
        .map_err(anyhow::Error::from)?;

    info!("Admin {} signed in", admin.email);
    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            token,
            expires_at,
            admin,
        }),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> Result<StatusCode, ApiError> {
    if !state.db.delete_session(&session.id)? {
        warn!("Logout for session {} that was already gone", session.id);
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(Extension(session): Extension<AdminSession>) -> impl IntoResponse {
    Json(session.admin)
}

pub fn create_token(
    secret: &str,
    session_id: Uuid,
    admin_id: &str,
    email: &str,
    expires_at: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: session_id,
        admin_id: admin_id.to_string(),
        email: email.to_string(),
        exp: expires_at.max(0) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
