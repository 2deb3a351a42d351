//! Migrator for the subscription schema.
//! Indexes are applied after the table they cover.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_subscription;
mod m20240101_000002_add_subscription_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_subscription::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000002_add_subscription_indexes::Migration),
        ]
    }
}
