//! Persistence-facing types: the `subscription` entity, month values,
//! request validation and database connection helpers.

pub mod errors;
pub mod db;
pub mod month;
pub mod validation;
pub mod subscription;

pub use month::{parse_month, Month};
