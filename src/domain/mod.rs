//! Domain types used throughout the tool.
//!
//! This module defines:
//!
//! - calendar and numeric ranges (`DateRange`, `IntRange`, `FloatRange`)
//! - fixture record schemas (`DailyMetricRecord`, `HistoricalMetricRecord`)
//! - fixture distribution parameters (`DailyFixtureSpec`, `HistoricalFixtureSpec`)
//! - the bootstrap step list (`BootstrapStep`)

pub mod types;

pub use types::*;
