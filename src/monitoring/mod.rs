//! Monitoring API integration
//!
//! CPU time-series aggregation: daily bucketing, overall statistics, and
//! tier classification.

pub mod utilization;

pub use utilization::{get_utilization, summarize, DailyAggregate, Tier, UtilizationSummary};
