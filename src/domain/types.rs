//! Shared domain types.
//!
//! These types are kept lightweight and serializable so they can be:
//!
//! - generated in-memory by the fixture generator
//! - written to / read back from CSV with `csv` + `serde`
//! - selected from the command line (`BootstrapStep`)

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Inclusive calendar-date range at daily granularity.
///
/// Only constructible through [`DateRange::new`], so `start <= end` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if end < start {
            return Err(AppError::data(format!(
                "Invalid date range: end {end} is before start {start}."
            )));
        }
        Ok(Self { start, end })
    }

    /// Build a range from `(year, month, day)` triples.
    pub fn from_ymd(start: (i32, u32, u32), end: (i32, u32, u32)) -> Result<Self, AppError> {
        let to_date = |(y, m, d): (i32, u32, u32)| {
            NaiveDate::from_ymd_opt(y, m, d)
                .ok_or_else(|| AppError::data(format!("Invalid calendar date {y:04}-{m:02}-{d:02}.")))
        };
        Self::new(to_date(start)?, to_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days in the range (both ends included). Zero if reversed.
    pub fn len_days(&self) -> usize {
        usize::try_from((self.end - self.start).num_days()).map_or(0, |n| n + 1)
    }

    /// Every date in the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }
}

/// Half-open integer interval `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    pub low: i64,
    pub high: i64,
}

impl IntRange {
    pub const fn new(low: i64, high: i64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, v: i64) -> bool {
        v >= self.low && v < self.high
    }
}

/// Half-open real interval `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatRange {
    pub low: f64,
    pub high: f64,
}

impl FloatRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.low && v < self.high
    }
}

/// One row of `daily_metrics.csv`. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetricRecord {
    pub date: NaiveDate,
    pub sales: i64,
    pub revenue: f64,
    pub users: i64,
    pub conversion_rate: f64,
}

/// One row of `historical_data.csv`. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalMetricRecord {
    pub date: NaiveDate,
    pub sales: i64,
    pub revenue: f64,
}

/// Distribution parameters for the daily fixture.
#[derive(Debug, Clone)]
pub struct DailyFixtureSpec {
    pub dates: DateRange,
    pub sales: IntRange,
    pub revenue: FloatRange,
    pub users: IntRange,
    pub conversion_rate: FloatRange,
}

impl DailyFixtureSpec {
    /// January 2024 demo window.
    pub fn standard() -> Result<Self, AppError> {
        Ok(Self {
            dates: DateRange::from_ymd((2024, 1, 1), (2024, 1, 30))?,
            sales: IntRange::new(100, 500),
            revenue: FloatRange::new(1000.0, 5000.0),
            users: IntRange::new(50, 200),
            conversion_rate: FloatRange::new(0.01, 0.05),
        })
    }
}

/// Distribution parameters for the prior-year historical fixture.
#[derive(Debug, Clone)]
pub struct HistoricalFixtureSpec {
    pub dates: DateRange,
    pub sales: IntRange,
    pub revenue: FloatRange,
}

impl HistoricalFixtureSpec {
    /// Full calendar year 2023.
    pub fn standard() -> Result<Self, AppError> {
        Ok(Self {
            dates: DateRange::from_ymd((2023, 1, 1), (2023, 12, 31))?,
            sales: IntRange::new(50, 300),
            revenue: FloatRange::new(500.0, 3000.0),
        })
    }
}

/// One independently runnable bootstrap step, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum BootstrapStep {
    /// Check that the workspace root is usable.
    Environment,
    /// Create the workspace directory tree.
    Directories,
    /// Regenerate `data/raw/daily_metrics.csv`.
    DailyMetrics,
    /// Regenerate `data/raw/historical_data.csv`.
    HistoricalData,
    /// Write `config/config.yaml` if it is missing.
    Config,
}

impl BootstrapStep {
    pub const ALL: [BootstrapStep; 5] = [
        BootstrapStep::Environment,
        BootstrapStep::Directories,
        BootstrapStep::DailyMetrics,
        BootstrapStep::HistoricalData,
        BootstrapStep::Config,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            BootstrapStep::Environment => "environment",
            BootstrapStep::Directories => "directories",
            BootstrapStep::DailyMetrics => "daily metrics fixture",
            BootstrapStep::HistoricalData => "historical data fixture",
            BootstrapStep::Config => "default config",
        }
    }
}
