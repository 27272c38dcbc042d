use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

pub mod auth;
pub mod products;
pub mod reports;
pub mod sales;
pub mod surveys;
pub mod users;

/// Inclusive calendar-date range accepted by the audit and survey listings.
#[derive(Debug, Deserialize, IntoParams)]
pub struct DateRangeQuery {
    pub desde: Option<NaiveDate>,
    pub hasta: Option<NaiveDate>,
}
