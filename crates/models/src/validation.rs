//! Typed parsing of incoming payloads and query parameters.
//!
//! Wire DTOs keep every field optional so that a missing field is reported
//! as a validation error with a readable message instead of a generic
//! deserialization failure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::month::{parse_month, Month};

/// JSON body of `POST /subscriptions` and `PUT /subscriptions/:id`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SubscriptionPayload {
    pub service_name: Option<String>,
    pub price: Option<i64>,
    pub user_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Validated subscription fields, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start: Month,
    pub end: Option<Month>,
}

/// Query string of `GET /subscriptions/sum`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SumQuery {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Validated sum filter. The period is inclusive at month granularity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SumFilter {
    pub start: Month,
    pub end: Month,
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
}

/// Canonical hyphenated UUID text, any version.
pub fn parse_uuid(input: &str) -> Result<Uuid, ModelError> {
    let invalid = || ModelError::Validation(format!("invalid UUID {input:?}"));
    // `Uuid::parse_str` also accepts braced, urn and simple forms
    if input.len() != 36 {
        return Err(invalid());
    }
    Uuid::parse_str(input).map_err(|_| invalid())
}

// Blank counts as missing; the value itself is passed on untrimmed.
fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ModelError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ModelError::Validation(format!("{field} is required"))),
    }
}

fn optional(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn month_field(value: &str, field: &str) -> Result<Month, ModelError> {
    parse_month(value).map_err(|_| ModelError::Validation(format!("{field} must be in MM-YYYY format")))
}

fn uuid_field(value: &str, field: &str) -> Result<Uuid, ModelError> {
    parse_uuid(value).map_err(|_| ModelError::Validation(format!("{field} must be a UUID")))
}

/// Validate a create/update body.
///
/// Rules: `service_name` non-empty, `price` in `1..=i32::MAX`, `user_id` a
/// UUID, `start_date` a month, `end_date` a month not before `start_date`
/// when present and non-empty.
pub fn parse_subscription_request(payload: &SubscriptionPayload) -> Result<NewSubscription, ModelError> {
    let service_name = required(&payload.service_name, "service_name")?.trim().to_string();

    let price = payload
        .price
        .ok_or_else(|| ModelError::validation("price is required"))?;
    if price <= 0 {
        return Err(ModelError::validation("price must be greater than 0"));
    }
    let price = i32::try_from(price).map_err(|_| ModelError::validation("price is too large"))?;

    let user_id = uuid_field(required(&payload.user_id, "user_id")?, "user_id")?;
    let start = month_field(required(&payload.start_date, "start_date")?, "start_date")?;
    let end = optional(&payload.end_date)
        .map(|v| month_field(v, "end_date"))
        .transpose()?;

    if let Some(end) = end {
        if end < start {
            return Err(ModelError::validation("end_date must not be before start_date"));
        }
    }

    Ok(NewSubscription { service_name, price, user_id, start, end })
}

/// Validate the sum query; an empty optional filter counts as absent.
/// An inverted period is accepted and simply matches nothing.
pub fn parse_sum_query(query: &SumQuery) -> Result<SumFilter, ModelError> {
    let start = month_field(required(&query.start_date, "start_date")?, "start_date")?;
    let end = month_field(required(&query.end_date, "end_date")?, "end_date")?;
    let user_id = optional(&query.user_id).map(|v| uuid_field(v, "user_id")).transpose()?;
    let service_name = optional(&query.service_name).map(|v| v.trim().to_string());
    Ok(SumFilter { start, end, user_id, service_name })
}
