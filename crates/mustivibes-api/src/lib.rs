//! HTTP surface of the Mustivibes admin console.
//!
//! `/auth/login` and `/health` are public; everything under `/admin` runs
//! behind [`middleware::require_auth`] and acts on the backend with the
//! signed-in admin's stored token.

pub mod auth;
pub mod coins;
pub mod csv;
pub mod dashboard;
pub mod error;
pub mod extract;
pub mod listing;
pub mod middleware;
pub mod notifications;
pub mod payments;
pub mod reports;
pub mod rooms;
pub mod settings;
pub mod users;
pub mod warnings;

use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};

use crate::auth::AppState;
use crate::middleware::require_auth;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Every console route. CORS and request tracing are layered on by the
/// binary.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        // Session and shell
        .route("/admin/logout", post(auth::logout))
        .route("/admin/me", get(auth::me))
        .route("/admin/settings/password", post(settings::change_password))
        .route(
            "/admin/preferences",
            get(settings::get_preferences).put(settings::put_preferences),
        )
        .route("/admin/dashboard", get(dashboard::get_dashboard))
        // Users
        .route("/admin/users", get(users::list_users))
        .route("/admin/users/export", get(users::export_users))
        .route(
            "/admin/users/{id}",
            get(users::get_user).put(users::update_user).delete(users::delete_user),
        )
        .route("/admin/users/{id}/followers", get(users::list_followers))
        .route("/admin/users/{id}/following", get(users::list_following))
        // Payments
        .route("/admin/payments", get(payments::list_payments))
        .route("/admin/payments/export", get(payments::export_payments))
        // Rooms
        .route("/admin/rooms", get(rooms::list_rooms).post(rooms::create_room))
        .route("/admin/rooms/export", get(rooms::export_rooms))
        // Coin economy
        .route("/admin/packages", get(coins::list_packages).post(coins::create_package))
        .route(
            "/admin/packages/{id}",
            put(coins::update_package).delete(coins::delete_package),
        )
        .route("/admin/referral", get(coins::list_referral).post(coins::create_referral))
        .route(
            "/admin/referral/{id}",
            put(coins::update_referral).delete(coins::delete_referral),
        )
        .route(
            "/admin/coin-conversions",
            get(coins::list_conversions).post(coins::create_conversion),
        )
        .route(
            "/admin/coin-conversions/{id}",
            put(coins::update_conversion).delete(coins::delete_conversion),
        )
        .route(
            "/admin/deduction-rules",
            get(coins::list_deductions).post(coins::create_deduction),
        )
        .route(
            "/admin/deduction-rules/{id}",
            put(coins::update_deduction).delete(coins::delete_deduction),
        )
        // Moderation
        .route("/admin/reports", get(reports::list_reports))
        .route("/admin/reports/export", get(reports::export_reports))
        .route("/admin/reports/{id}", get(reports::get_report))
        .route("/admin/reports/{id}/action", put(reports::act_on_report))
        .route("/admin/warnings", get(warnings::list_warnings))
        .route("/admin/warnings/export", get(warnings::export_warnings))
        .route(
            "/admin/warning-guidelines",
            get(warnings::list_guidelines).post(warnings::create_guideline),
        )
        .route(
            "/admin/warning-guidelines/{id}",
            put(warnings::update_guideline).delete(warnings::delete_guideline),
        )
        // Notifications
        .route("/admin/notifications", get(notifications::list_notifications))
        .route("/admin/notifications/read", post(notifications::mark_many_read))
        .route("/admin/notifications/delete", post(notifications::delete_many))
        .route("/admin/notifications/{id}/read", put(notifications::mark_read))
        .route("/admin/notifications/{id}", delete(notifications::delete_notification))
        .route_layer(from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}
