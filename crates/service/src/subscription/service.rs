use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use models::subscription;
use models::validation::{parse_subscription_request, parse_sum_query, SubscriptionPayload, SumQuery};

use crate::errors::ServiceError;
use crate::subscription::repository::SubscriptionRepository;

/// Application service for subscriptions, independent of the web framework.
/// Validates raw payloads, then delegates to the repository.
pub struct SubscriptionService<R: SubscriptionRepository + ?Sized> {
    repo: Arc<R>,
}

fn log_failure(op: &'static str, err: &ServiceError) {
    if err.is_validation() || err.is_not_found() {
        warn!(op, error = %err, "subscription request rejected");
    } else {
        error!(op, error = %err, "subscription storage failure");
    }
}

impl<R: SubscriptionRepository + ?Sized> SubscriptionService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Validate and store a new subscription.
    ///
    /// # Examples
    /// ```
    /// use service::subscription::{repository::mock::MockSubscriptionRepository, service::SubscriptionService};
    /// use models::validation::SubscriptionPayload;
    /// use std::sync::Arc;
    /// let svc = SubscriptionService::new(Arc::new(MockSubscriptionRepository::default()));
    /// let payload = SubscriptionPayload {
    ///     service_name: Some("Netflix".into()),
    ///     price: Some(100),
    ///     user_id: Some("60601fee-2bf1-4721-ae6f-7636e79a0cba".into()),
    ///     start_date: Some("01-2024".into()),
    ///     end_date: None,
    /// };
    /// let created = tokio_test::block_on(svc.create(&payload)).unwrap();
    /// assert_eq!(created.id, 1);
    /// ```
    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: &SubscriptionPayload) -> Result<subscription::Model, ServiceError> {
        let result = async {
            let fields = parse_subscription_request(payload)?;
            self.repo.create(&fields).await
        }
        .await;
        match &result {
            Ok(m) => info!(id = m.id, user_id = %m.user_id, service_name = %m.service_name, "created subscription"),
            Err(e) => log_failure("create", e),
        }
        result
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<subscription::Model, ServiceError> {
        let result = match self.repo.get(id).await {
            Ok(Some(m)) => Ok(m),
            Ok(None) => Err(ServiceError::not_found(&format!("subscription {id}"))),
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            log_failure("get", e);
        }
        result
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<subscription::Model>, ServiceError> {
        let result = self.repo.list().await;
        match &result {
            Ok(rows) => info!(count = rows.len(), "list subscriptions"),
            Err(e) => log_failure("list", e),
        }
        result
    }

    /// Replace every field of a live subscription.
    /// Existence is checked before the payload is validated.
    #[instrument(skip(self, payload))]
    pub async fn update(&self, id: i32, payload: &SubscriptionPayload) -> Result<subscription::Model, ServiceError> {
        let result = async {
            if self.repo.get(id).await?.is_none() {
                return Err(ServiceError::not_found(&format!("subscription {id}")));
            }
            let fields = parse_subscription_request(payload)?;
            self.repo.update(id, &fields).await
        }
        .await;
        match &result {
            Ok(m) => info!(id = m.id, "updated subscription"),
            Err(e) => log_failure("update", e),
        }
        result
    }

    /// Soft-delete; succeeds whether or not a live row existed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        match self.repo.soft_delete(id).await {
            Ok(deleted) => {
                info!(id, deleted, "delete subscription");
                Ok(())
            }
            Err(e) => {
                log_failure("delete", &e);
                Err(e)
            }
        }
    }

    /// Total price of live subscriptions starting within the query period.
    #[instrument(skip(self, query))]
    pub async fn sum(&self, query: &SumQuery) -> Result<i64, ServiceError> {
        let result = async {
            let filter = parse_sum_query(query)?;
            self.repo.sum_prices(&filter).await
        }
        .await;
        match &result {
            Ok(total) => info!(total, "sum subscription prices"),
            Err(e) => log_failure("sum", e),
        }
        result
    }

    /// Storage readiness.
    pub async fn ping(&self) -> Result<(), ServiceError> {
        self.repo.ping().await
    }
}
