use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use models::subscription;
use models::validation::{SubscriptionPayload, SumQuery};

use crate::{errors::ApiError, routes::AppState};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TotalPrice {
    pub total_price: i64,
}

#[utoipa::path(
    post, path = "/subscriptions", tag = "subscriptions",
    request_body = crate::openapi::SubscriptionInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Create Failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<SubscriptionPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<subscription::Model>), ApiError> {
    let Json(payload) = payload?;
    let created = state.subscriptions.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/subscriptions", tag = "subscriptions",
    responses(
        (status = 200, description = "List OK", body = [crate::openapi::SubscriptionDoc]),
        (status = 500, description = "List Failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<subscription::Model>>, ApiError> {
    Ok(Json(state.subscriptions.list().await?))
}

#[utoipa::path(
    get, path = "/subscriptions/{id}", tag = "subscriptions",
    params(("id" = i32, Path, description = "Subscription ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Invalid id", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Lookup Failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<subscription::Model>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.subscriptions.get(id).await?))
}

#[utoipa::path(
    put, path = "/subscriptions/{id}", tag = "subscriptions",
    params(("id" = i32, Path, description = "Subscription ID")),
    request_body = crate::openapi::SubscriptionInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Update Failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<SubscriptionPayload>, JsonRejection>,
) -> Result<Json<subscription::Model>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    Ok(Json(state.subscriptions.update(id, &payload).await?))
}

#[utoipa::path(
    delete, path = "/subscriptions/{id}", tag = "subscriptions",
    params(("id" = i32, Path, description = "Subscription ID")),
    responses(
        (status = 204, description = "Deleted (or already absent)"),
        (status = 400, description = "Invalid id", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Delete Failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.subscriptions.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/subscriptions/sum", tag = "subscriptions",
    params(
        ("start_date" = String, Query, description = "First month of the period, MM-YYYY"),
        ("end_date" = String, Query, description = "Last month of the period, MM-YYYY"),
        ("user_id" = Option<String>, Query, description = "Only subscriptions of this user"),
        ("service_name" = Option<String>, Query, description = "Only subscriptions to this service")
    ),
    responses(
        (status = 200, description = "Sum", body = crate::openapi::TotalPriceDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Sum Failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn sum(
    State(state): State<AppState>,
    query: Result<Query<SumQuery>, QueryRejection>,
) -> Result<Json<TotalPrice>, ApiError> {
    let Query(query) = query?;
    let total_price = state.subscriptions.sum(&query).await?;
    Ok(Json(TotalPrice { total_price }))
}
