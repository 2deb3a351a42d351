use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};
use utoipa::OpenApi;

use common::types::{Health, Message};
use service::{SubscriptionRepository, SubscriptionService};

use crate::openapi::ApiDoc;

pub mod subscriptions;

/// Shared handler state: the subscription service over any repository.
#[derive(Clone)]
pub struct AppState {
    pub subscriptions: Arc<SubscriptionService<dyn SubscriptionRepository>>,
}

impl AppState {
    pub fn new(repo: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions: Arc::new(SubscriptionService::new(repo)) }
    }
}

#[utoipa::path(get, path = "/ping", tag = "health", responses((status = 200, description = "Alive", body = crate::openapi::MessageDoc)))]
pub async fn ping() -> Json<Message> {
    Json(Message::new("pong"))
}

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses(
        (status = 200, description = "Storage reachable", body = crate::openapi::HealthDoc),
        (status = 503, description = "Storage unreachable", body = crate::openapi::HealthDoc)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    match state.subscriptions.ping().await {
        Ok(()) => (StatusCode::OK, Json(Health { status: "ok" })),
        Err(e) => {
            warn!(error = %e, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(Health { status: "unavailable" }))
        }
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/subscriptions", get(subscriptions::list).post(subscriptions::create))
        // static segment takes priority over `:id`
        .route("/subscriptions/sum", get(subscriptions::sum))
        .route(
            "/subscriptions/:id",
            get(subscriptions::get).put(subscriptions::update).delete(subscriptions::delete),
        )
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
