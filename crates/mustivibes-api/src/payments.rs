use std::borrow::Cow;

use axum::{
    Extension,
    extract::State,
    response::Response,
};
use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use mustivibes_types::models::{Payment, PaymentStatus};

use crate::auth::AppState;
use crate::csv::{self, CsvRow};
use crate::error::ApiError;
use crate::extract::{Json, Query};
use crate::listing::{self, ListQuery, Listable, Page, SortKey};
use crate::middleware::AdminSession;

#[derive(Debug, Default, Deserialize)]
pub struct PaymentFilters {
    /// `created`, `pending`, `success` (or `paid`), `failed`; `all` or absent
    /// keeps everything.
    #[serde(default)]
    pub status: Option<String>,
    /// Inclusive calendar dates, in the backend's local time.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl PaymentFilters {
    fn validate(&self) -> Result<(), ApiError> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => {
                Err(ApiError::bad_request("'from' must not be after 'to'"))
            }
            _ => Ok(()),
        }
    }

    fn keeps(&self, payment: &Payment, offset: &FixedOffset) -> bool {
        if let Some(status) = self.status.as_deref().filter(|s| !s.eq_ignore_ascii_case("all")) {
            if payment.status != PaymentStatus::from(status.to_string()) {
                return false;
            }
        }

        if self.from.is_none() && self.to.is_none() {
            return true;
        }
        let Some(created) = payment.created_at else {
            return false;
        };
        let day = created.with_timezone(offset).date_naive();
        self.from.is_none_or(|from| day >= from) && self.to.is_none_or(|to| day <= to)
    }
}

impl Listable for Payment {
    const SORT_COLUMNS: &'static [&'static str] = &["amount", "coins", "createdAt", "status"];

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        let user = self.user.as_ref();
        listing::fields([
            user.and_then(|u| u.name.as_deref()),
            user.and_then(|u| u.mobile.as_deref()),
            self.razorpay_order_id.as_deref(),
            self.razorpay_payment_id.as_deref(),
        ])
    }

    fn sort_key(&self, column: &str) -> SortKey {
        match column {
            "amount" => SortKey::Number(self.amount),
            "coins" => SortKey::Number(self.coins),
            "status" => SortKey::text(Some(self.status.as_str())),
            _ => SortKey::time(self.created_at),
        }
    }
}

impl CsvRow for Payment {
    const HEADER: &'static [&'static str] = &[
        "User", "Mobile", "Amount", "Coins", "Order ID", "Payment ID", "Status", "Date",
    ];

    fn csv_fields(&self) -> Vec<String> {
        let user = self.user.as_ref();
        vec![
            user.and_then(|u| u.name.clone()).unwrap_or_else(|| "Unknown".into()),
            user.and_then(|u| u.mobile.clone()).unwrap_or_default(),
            csv::number(self.amount),
            csv::number(self.coins),
            self.razorpay_order_id.clone().unwrap_or_default(),
            self.razorpay_payment_id.clone().unwrap_or_default(),
            self.status.as_str().to_string(),
            csv::date(self.created_at),
        ]
    }
}

/// Money that actually arrived, over the filtered rows.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct PaymentTotals {
    pub amount: f64,
    pub coins: f64,
    pub successful: usize,
}

impl PaymentTotals {
    pub fn over(payments: &[Payment]) -> Self {
        payments
            .iter()
            .filter(|p| p.status.is_successful())
            .fold(PaymentTotals::default(), |mut totals, p| {
                totals.amount += p.amount;
                totals.coins += p.coins;
                totals.successful += 1;
                totals
            })
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentList {
    #[serde(flatten)]
    pub page: Page<Payment>,
    pub totals: PaymentTotals,
}

async fn selected_payments(
    state: &AppState,
    session: &AdminSession,
    list: &ListQuery,
    filters: &PaymentFilters,
) -> Result<Vec<Payment>, ApiError> {
    filters.validate()?;
    let payments = state.backend.list_payments(&session.backend_token).await?;
    listing::select(payments, list, |p| filters.keeps(p, &state.utc_offset))
}

pub async fn list_payments(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(list): Query<ListQuery>,
    Query(filters): Query<PaymentFilters>,
) -> Result<Json<PaymentList>, ApiError> {
    let payments = selected_payments(&state, &session, &list, &filters).await?;
    let totals = PaymentTotals::over(&payments);
    Ok(Json(PaymentList {
        page: listing::paginate(payments, &list),
        totals,
    }))
}

pub async fn export_payments(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(list): Query<ListQuery>,
    Query(filters): Query<PaymentFilters>,
) -> Result<Response, ApiError> {
    let payments = selected_payments(&state, &session, &list, &filters).await?;
    Ok(csv::download("payments", &payments))
}
