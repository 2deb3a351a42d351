//! Subscription operations: repository abstraction and the service that
//! composes validation with storage.

pub mod repository;
pub mod service;
