//! Case-count aggregation.
//!
//! Raw daily counts from the statistics API are normalized, filtered by an
//! inclusive date range, and summed into day, ISO-week, or month buckets.
//! Bucketed series can then be turned into period-over-period rates.

pub mod aggregate;
pub mod ranking;
pub mod rate;
pub mod types;
