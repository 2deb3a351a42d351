//! Shared building blocks for the subscription service crates:
//! logging setup, the startup retry policy and small HTTP payload types.

pub mod types;
pub mod utils;
pub mod retry;
