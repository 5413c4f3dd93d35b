//! Synthetic metric fixture generation.
//!
//! Every numeric column is an independent uniform draw per row. Integer columns
//! use a discrete uniform over `[low, high)`; float columns a continuous
//! uniform over `[low, high)`.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Uniform;

use crate::domain::{
    DailyFixtureSpec, DailyMetricRecord, DateRange, FloatRange, HistoricalFixtureSpec,
    HistoricalMetricRecord, IntRange,
};
use crate::error::AppError;

/// Stream ids used to derive per-dataset seeds from a single user seed.
pub const DAILY_STREAM: u64 = 1;
pub const HISTORICAL_STREAM: u64 = 2;

/// Build the RNG for one fixture.
///
/// Without a seed this draws from OS entropy, so every run yields fresh demo
/// values. With a seed, each dataset gets its own deterministic stream so that
/// re-running a single step reproduces exactly the file a full run would write.
pub fn fixture_rng(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
        None => StdRng::from_entropy(),
    }
}

pub fn generate_daily_metrics<R: Rng + ?Sized>(
    spec: &DailyFixtureSpec,
    rng: &mut R,
) -> Result<Vec<DailyMetricRecord>, AppError> {
    let sales = int_dist("sales", spec.sales)?;
    let revenue = float_dist("revenue", spec.revenue)?;
    let users = int_dist("users", spec.users)?;
    let conversion_rate = float_dist("conversion_rate", spec.conversion_rate)?;

    let dates = non_empty_dates(spec.dates)?;
    Ok(dates
        .days()
        .map(|date| DailyMetricRecord {
            date,
            sales: sales.sample(rng),
            revenue: revenue.sample(rng),
            users: users.sample(rng),
            conversion_rate: conversion_rate.sample(rng),
        })
        .collect())
}

pub fn generate_historical_data<R: Rng + ?Sized>(
    spec: &HistoricalFixtureSpec,
    rng: &mut R,
) -> Result<Vec<HistoricalMetricRecord>, AppError> {
    let sales = int_dist("sales", spec.sales)?;
    let revenue = float_dist("revenue", spec.revenue)?;

    let dates = non_empty_dates(spec.dates)?;
    Ok(dates
        .days()
        .map(|date| HistoricalMetricRecord {
            date,
            sales: sales.sample(rng),
            revenue: revenue.sample(rng),
        })
        .collect())
}

fn non_empty_dates(dates: DateRange) -> Result<DateRange, AppError> {
    if dates.len_days() == 0 {
        return Err(AppError::data(format!(
            "Invalid date range: end {} is before start {}.",
            dates.end(),
            dates.start()
        )));
    }
    Ok(dates)
}

// `Uniform::new` panics on an empty range, so validate first.
fn int_dist(column: &str, range: IntRange) -> Result<Uniform<i64>, AppError> {
    if range.low >= range.high {
        return Err(AppError::data(format!(
            "Empty sampling range for `{column}`: [{}, {}).",
            range.low, range.high
        )));
    }
    Ok(Uniform::new(range.low, range.high))
}

fn float_dist(column: &str, range: FloatRange) -> Result<Uniform<f64>, AppError> {
    if !(range.low.is_finite() && range.high.is_finite() && range.low < range.high) {
        return Err(AppError::data(format!(
            "Invalid sampling range for `{column}`: [{}, {}).",
            range.low, range.high
        )));
    }
    Ok(Uniform::new(range.low, range.high))
}
