use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthDoc { pub status: String }

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String }

#[derive(ToSchema)]
pub struct TotalPriceDoc { pub total_price: i64 }

/// Create/update body. Months are `MM-YYYY`.
#[derive(ToSchema)]
pub struct SubscriptionInputDoc {
    #[schema(example = "Yandex Plus")]
    pub service_name: String,
    #[schema(example = 400)]
    pub price: i64,
    pub user_id: Uuid,
    #[schema(example = "07-2025")]
    pub start_date: String,
    #[schema(example = "12-2025")]
    pub end_date: Option<String>,
}

/// Stored subscription. Dates are the first day of the month.
#[derive(ToSchema)]
pub struct SubscriptionDoc {
    pub id: i32,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    #[schema(example = "2025-07-01")]
    pub start_date: String,
    pub end_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::ping,
        crate::routes::health,
        crate::routes::subscriptions::create,
        crate::routes::subscriptions::list,
        crate::routes::subscriptions::get,
        crate::routes::subscriptions::update,
        crate::routes::subscriptions::delete,
        crate::routes::subscriptions::sum,
    ),
    components(
        schemas(
            HealthDoc,
            MessageDoc,
            ErrorDoc,
            TotalPriceDoc,
            SubscriptionInputDoc,
            SubscriptionDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "subscriptions")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for p in ["/ping", "/health", "/subscriptions", "/subscriptions/{id}", "/subscriptions/sum"] {
            assert!(paths.contains(&p), "missing {p}");
        }
    }
}
