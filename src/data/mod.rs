//! Data generation and processing.
//!
//! - synthetic fixtures (`sample`)
//! - cleaning + derived metrics (`processor`)

pub mod processor;
pub mod sample;

pub use processor::{ProcessedMetricRow, calculate_metrics, clean_rows};
pub use sample::{fixture_rng, generate_daily_metrics, generate_historical_data};
