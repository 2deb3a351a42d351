use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use models::subscription;
use models::validation::{NewSubscription, SumFilter};

use crate::errors::ServiceError;

/// Storage seam for subscriptions. Reads never return soft-deleted rows.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, fields: &NewSubscription) -> Result<subscription::Model, ServiceError>;
    async fn get(&self, id: i32) -> Result<Option<subscription::Model>, ServiceError>;
    async fn list(&self) -> Result<Vec<subscription::Model>, ServiceError>;
    /// `NotFound` when no live row has `id`.
    async fn update(&self, id: i32, fields: &NewSubscription) -> Result<subscription::Model, ServiceError>;
    /// Returns whether a live row was marked deleted.
    async fn soft_delete(&self, id: i32) -> Result<bool, ServiceError>;
    async fn sum_prices(&self, filter: &SumFilter) -> Result<i64, ServiceError>;
    async fn ping(&self) -> Result<(), ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmSubscriptionRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmSubscriptionRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    async fn create(&self, fields: &NewSubscription) -> Result<subscription::Model, ServiceError> {
        crate::db::subscription_service::create_subscription(&self.db, fields).await
    }

    async fn get(&self, id: i32) -> Result<Option<subscription::Model>, ServiceError> {
        crate::db::subscription_service::get_subscription(&self.db, id).await
    }

    async fn list(&self) -> Result<Vec<subscription::Model>, ServiceError> {
        crate::db::subscription_service::list_subscriptions(&self.db).await
    }

    async fn update(&self, id: i32, fields: &NewSubscription) -> Result<subscription::Model, ServiceError> {
        crate::db::subscription_service::update_subscription(&self.db, id, fields).await
    }

    async fn soft_delete(&self, id: i32) -> Result<bool, ServiceError> {
        crate::db::subscription_service::delete_subscription(&self.db, id).await
    }

    async fn sum_prices(&self, filter: &SumFilter) -> Result<i64, ServiceError> {
        crate::db::subscription_service::sum_subscription_prices(&self.db, filter).await
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        models::db::ping(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }
}

/// Simple in-memory mock repository for tests and doc examples.
/// Mirrors the SeaORM semantics: soft delete, id-ordered listing,
/// inclusive month-range sums.
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use chrono::Utc;
    use sea_orm::entity::prelude::DateTimeWithTimeZone;

    #[derive(Default)]
    struct State {
        last_id: i32,
        rows: BTreeMap<i32, subscription::Model>,
    }

    #[derive(Default)]
    pub struct MockSubscriptionRepository {
        state: Mutex<State>,
        unavailable: bool,
    }

    impl MockSubscriptionRepository {
        /// A repository whose every call fails like a dropped connection.
        pub fn unavailable() -> Self {
            Self { unavailable: true, ..Self::default() }
        }

        /// Every stored row, soft-deleted ones included.
        pub fn all_rows(&self) -> Vec<subscription::Model> {
            self.lock().rows.values().cloned().collect()
        }

        fn lock(&self) -> MutexGuard<'_, State> {
            self.state.lock().unwrap_or_else(PoisonError::into_inner)
        }

        fn check(&self) -> Result<(), ServiceError> {
            if self.unavailable {
                return Err(ServiceError::Db("connection refused".into()));
            }
            Ok(())
        }
    }

    fn now() -> DateTimeWithTimeZone {
        Utc::now().into()
    }

    #[async_trait]
    impl SubscriptionRepository for MockSubscriptionRepository {
        async fn create(&self, fields: &NewSubscription) -> Result<subscription::Model, ServiceError> {
            self.check()?;
            let mut state = self.lock();
            state.last_id += 1;
            let ts = now();
            let row = subscription::Model {
                id: state.last_id,
                service_name: fields.service_name.clone(),
                price: fields.price,
                user_id: fields.user_id,
                start_date: fields.start.first_day(),
                end_date: fields.end.map(|m| m.first_day()),
                created_at: ts,
                updated_at: ts,
                deleted_at: None,
            };
            state.rows.insert(row.id, row.clone());
            Ok(row)
        }

        async fn get(&self, id: i32) -> Result<Option<subscription::Model>, ServiceError> {
            self.check()?;
            Ok(self.lock().rows.get(&id).filter(|r| !r.is_deleted()).cloned())
        }

        async fn list(&self) -> Result<Vec<subscription::Model>, ServiceError> {
            self.check()?;
            Ok(self.lock().rows.values().filter(|r| !r.is_deleted()).cloned().collect())
        }

        async fn update(&self, id: i32, fields: &NewSubscription) -> Result<subscription::Model, ServiceError> {
            self.check()?;
            let mut state = self.lock();
            let Some(row) = state.rows.get_mut(&id).filter(|r| !r.is_deleted()) else {
                return Err(ServiceError::not_found("subscription"));
            };
            row.service_name = fields.service_name.clone();
            row.price = fields.price;
            row.user_id = fields.user_id;
            row.start_date = fields.start.first_day();
            row.end_date = fields.end.map(|m| m.first_day());
            row.updated_at = now();
            Ok(row.clone())
        }

        async fn soft_delete(&self, id: i32) -> Result<bool, ServiceError> {
            self.check()?;
            let mut state = self.lock();
            match state.rows.get_mut(&id).filter(|r| !r.is_deleted()) {
                Some(row) => {
                    let ts = now();
                    row.deleted_at = Some(ts);
                    row.updated_at = ts;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn sum_prices(&self, filter: &SumFilter) -> Result<i64, ServiceError> {
            self.check()?;
            let (from, to) = (filter.start.first_day(), filter.end.first_day());
            let total = self
                .lock()
                .rows
                .values()
                .filter(|r| !r.is_deleted())
                .filter(|r| r.start_date >= from && r.start_date <= to)
                .filter(|r| filter.user_id.map_or(true, |u| r.user_id == u))
                .filter(|r| filter.service_name.as_deref().map_or(true, |n| r.service_name == n))
                .map(|r| i64::from(r.price))
                .sum();
            Ok(total)
        }

        async fn ping(&self) -> Result<(), ServiceError> {
            self.check()
        }
    }
}
