use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use chrono::Utc;
use models::subscription::{self, find_live};
use models::validation::{NewSubscription, SumFilter};
use crate::errors::ServiceError;

#[derive(Debug, FromQueryResult)]
struct TotalPrice {
    total_price: Option<i64>,
}

/// Insert a validated subscription.
pub async fn create_subscription(db: &DatabaseConnection, fields: &NewSubscription) -> Result<subscription::Model, ServiceError> {
    let created = subscription::create(db, fields).await?;
    Ok(created)
}

/// Get a live subscription by id.
pub async fn get_subscription(db: &DatabaseConnection, id: i32) -> Result<Option<subscription::Model>, ServiceError> {
    let found = find_live()
        .filter(subscription::Column::Id.eq(id))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

/// List every live subscription, oldest id first.
pub async fn list_subscriptions(db: &DatabaseConnection) -> Result<Vec<subscription::Model>, ServiceError> {
    let rows = find_live()
        .order_by_asc(subscription::Column::Id)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

/// Replace all business fields of a live subscription.
pub async fn update_subscription(db: &DatabaseConnection, id: i32, fields: &NewSubscription) -> Result<subscription::Model, ServiceError> {
    let Some(existing) = get_subscription(db, id).await? else {
        return Err(ServiceError::not_found("subscription"));
    };
    let mut am: subscription::ActiveModel = existing.into();
    subscription::apply(&mut am, fields);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Soft-delete a subscription; returns true if a live row was marked.
pub async fn delete_subscription(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let deleted = subscription::soft_delete(db, id).await?;
    Ok(deleted)
}

/// Sum `price` over live rows starting inside the filter period.
pub async fn sum_subscription_prices(db: &DatabaseConnection, filter: &SumFilter) -> Result<i64, ServiceError> {
    let mut query = find_live()
        .select_only()
        .column_as(Expr::col(subscription::Column::Price).sum(), "total_price")
        .filter(subscription::Column::StartDate.between(filter.start.first_day(), filter.end.first_day()));
    if let Some(user_id) = filter.user_id {
        query = query.filter(subscription::Column::UserId.eq(user_id));
    }
    if let Some(name) = &filter.service_name {
        query = query.filter(subscription::Column::ServiceName.eq(name.as_str()));
    }
    let row = query
        .into_model::<TotalPrice>()
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(row.and_then(|r| r.total_price).unwrap_or(0))
}
