//! Service layer providing the subscription operations on top of models.
//! - Separates business rules from data access (`subscription::repository`).
//! - Reuses validation and entity definitions from the `models` crate.
//! - Maps every failure onto [`errors::ServiceError`].

pub mod errors;
pub mod db;
pub mod subscription;
#[cfg(test)]
pub mod test_support;

pub use subscription::repository::{SeaOrmSubscriptionRepository, SubscriptionRepository};
pub use subscription::service::SubscriptionService;
