//! Database interaction layer.
//!
//! Wraps a PostgreSQL connection (via `sqlx`) and exposes the four inventory
//! operations plus idempotent table bootstrap.

mod postgres;

pub use postgres::*;
