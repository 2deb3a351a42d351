//! SeaORM-backed data access functions used by the repository implementation.

pub mod subscription_service;
