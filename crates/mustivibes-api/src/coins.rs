//! Coin economy settings: purchasable packages, the referral reward,
//! rupee-to-coin conversion and per-minute call deductions.

use std::borrow::Cow;

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use mustivibes_types::api::{CoinConversionInput, DeductionRuleInput, PackageInput, ReferralInput};
use mustivibes_types::models::{CoinConversion, CoinPackage, DeductionRule, ReferralConfig};

use crate::auth::AppState;
use crate::csv;
use crate::error::{ApiError, checked_id};
use crate::extract::{Json, Path, Query};
use crate::listing::{self, ListQuery, Listable, Page, SortKey};
use crate::middleware::AdminSession;

fn positive(value: f64, what: &str) -> Result<(), ApiError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!("{what} must be greater than zero")))
    }
}

// -- Packages --

#[derive(Debug, Default, Deserialize)]
pub struct PackageFilters {
    #[serde(default)]
    pub active: Option<bool>,
}

impl Listable for CoinPackage {
    const SORT_COLUMNS: &'static [&'static str] = &["coins", "price", "createdAt"];

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Owned(csv::number(self.coins)),
            Cow::Owned(csv::number(self.price)),
        ]
    }

    fn sort_key(&self, column: &str) -> SortKey {
        match column {
            "coins" => SortKey::Number(self.coins),
            "price" => SortKey::Number(self.price),
            _ => SortKey::time(self.created_at),
        }
    }
}

fn validate_package(input: &PackageInput) -> Result<(), ApiError> {
    positive(input.coins, "Coins")?;
    positive(input.price, "Price")
}

pub async fn list_packages(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(list): Query<ListQuery>,
    Query(filters): Query<PackageFilters>,
) -> Result<Json<Page<CoinPackage>>, ApiError> {
    let packages = state.backend.list_packages(&session.backend_token).await?;
    let packages = listing::select(packages, &list, |p| {
        filters.active.is_none_or(|active| p.is_active == active)
    })?;
    Ok(Json(listing::paginate(packages, &list)))
}

pub async fn create_package(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Json(input): Json<PackageInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_package(&input)?;
    let body = state.backend.create_package(&session.backend_token, &input).await?;
    info!("Admin {} added a {}-coin package", session.admin.email, input.coins);
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn update_package(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
    Json(input): Json<PackageInput>,
) -> Result<Json<Value>, ApiError> {
    validate_package(&input)?;
    let body = state
        .backend
        .update_package(&session.backend_token, checked_id(&id)?, &input)
        .await?;
    Ok(Json(body))
}

pub async fn delete_package(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .backend
        .delete_package(&session.backend_token, checked_id(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// -- Referral reward --

impl Listable for ReferralConfig {
    const SORT_COLUMNS: &'static [&'static str] = &["coins", "createdAt"];

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Owned(csv::number(self.coins))]
    }

    fn sort_key(&self, column: &str) -> SortKey {
        match column {
            "coins" => SortKey::Number(self.coins),
            _ => SortKey::time(self.created_at),
        }
    }
}

pub async fn list_referral(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(list): Query<ListQuery>,
) -> Result<Json<Page<ReferralConfig>>, ApiError> {
    let configs = state.backend.list_referral_configs(&session.backend_token).await?;
    let configs = listing::select(configs, &list, |_| true)?;
    Ok(Json(listing::paginate(configs, &list)))
}

pub async fn create_referral(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Json(input): Json<ReferralInput>,
) -> Result<impl IntoResponse, ApiError> {
    positive(input.coins, "Referral coins")?;
    let body = state
        .backend
        .create_referral_config(&session.backend_token, input.coins)
        .await?;
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn update_referral(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
    Json(input): Json<ReferralInput>,
) -> Result<Json<Value>, ApiError> {
    positive(input.coins, "Referral coins")?;
    let body = state
        .backend
        .update_referral_config(&session.backend_token, checked_id(&id)?, input.coins)
        .await?;
    Ok(Json(body))
}

pub async fn delete_referral(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .backend
        .delete_referral_config(&session.backend_token, checked_id(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// -- Coin conversion --

impl Listable for CoinConversion {
    const SORT_COLUMNS: &'static [&'static str] = &["coins", "amount"];

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Owned(csv::number(self.coins)),
            Cow::Owned(csv::number(self.amount)),
        ]
    }

    fn sort_key(&self, column: &str) -> SortKey {
        match column {
            "amount" => SortKey::Number(self.amount),
            _ => SortKey::Number(self.coins),
        }
    }
}

fn validate_conversion(input: &CoinConversionInput) -> Result<(), ApiError> {
    positive(input.coins, "Coins")?;
    positive(input.amount, "Amount")
}

pub async fn list_conversions(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(list): Query<ListQuery>,
) -> Result<Json<Page<CoinConversion>>, ApiError> {
    let conversions = state.backend.list_coin_conversions(&session.backend_token).await?;
    let conversions = listing::select(conversions, &list, |_| true)?;
    Ok(Json(listing::paginate(conversions, &list)))
}

pub async fn create_conversion(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Json(input): Json<CoinConversionInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_conversion(&input)?;
    let body = state
        .backend
        .create_coin_conversion(&session.backend_token, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn update_conversion(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
    Json(input): Json<CoinConversionInput>,
) -> Result<Json<Value>, ApiError> {
    validate_conversion(&input)?;
    let body = state
        .backend
        .update_coin_conversion(&session.backend_token, checked_id(&id)?, &input)
        .await?;
    Ok(Json(body))
}

pub async fn delete_conversion(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .backend
        .delete_coin_conversion(&session.backend_token, checked_id(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// -- Call deductions --

impl Listable for DeductionRule {
    const SORT_COLUMNS: &'static [&'static str] = &["callType", "coinsPerMinute"];

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        listing::fields([Some(self.call_type.as_str())])
    }

    fn sort_key(&self, column: &str) -> SortKey {
        match column {
            "coinsPerMinute" => SortKey::Number(self.coins_per_minute),
            _ => SortKey::text(Some(self.call_type.as_str())),
        }
    }
}

fn validate_deduction(input: &DeductionRuleInput) -> Result<(), ApiError> {
    if input.call_type.trim().is_empty() {
        return Err(ApiError::bad_request("Call type is required"));
    }
    // Zero is a free call type.
    if !input.coins_per_minute.is_finite() || input.coins_per_minute < 0.0 {
        return Err(ApiError::bad_request("Coins per minute cannot be negative"));
    }
    Ok(())
}

pub async fn list_deductions(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(list): Query<ListQuery>,
) -> Result<Json<Page<DeductionRule>>, ApiError> {
    let rules = state.backend.list_deduction_rules(&session.backend_token).await?;
    let rules = listing::select(rules, &list, |_| true)?;
    Ok(Json(listing::paginate(rules, &list)))
}

pub async fn create_deduction(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Json(input): Json<DeductionRuleInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_deduction(&input)?;
    let body = state
        .backend
        .create_deduction_rule(&session.backend_token, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn update_deduction(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
    Json(input): Json<DeductionRuleInput>,
) -> Result<Json<Value>, ApiError> {
    validate_deduction(&input)?;
    let body = state
        .backend
        .update_deduction_rule(&session.backend_token, checked_id(&id)?, &input)
        .await?;
    Ok(Json(body))
}

pub async fn delete_deduction(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .backend
        .delete_deduction_rule(&session.backend_token, checked_id(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
