//! Cleaning and derived metrics for raw daily data.
//!
//! Pure functions over in-memory rows; file handling lives in `io` and the
//! orchestration in `app::pipeline`.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::io::export::CsvRecord;
use crate::io::ingest::RawMetricRow;

/// Window length for the trailing sales moving average.
pub const MOVING_AVERAGE_WINDOW: usize = 7;

/// A cleaned row with derived metrics. Field order is the output CSV column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessedMetricRow {
    pub date: Option<NaiveDate>,
    pub sales: Option<f64>,
    pub revenue: Option<f64>,
    pub users: Option<f64>,
    pub conversion_rate: Option<f64>,
    pub sales_growth: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub sales_7d_ma: Option<f64>,
    pub cumulative_revenue: Option<f64>,
}

impl CsvRecord for ProcessedMetricRow {
    const COLUMNS: &'static [&'static str] = &[
        "date",
        "sales",
        "revenue",
        "users",
        "conversion_rate",
        "sales_growth",
        "revenue_growth",
        "sales_7d_ma",
        "cumulative_revenue",
    ];
}

/// Fill gaps in numeric columns and drop exact duplicate rows.
///
/// Each numeric column is forward-filled, then back-filled, independently. A
/// column with no values at all stays empty. Duplicates are detected after
/// filling and the first occurrence is kept.
pub fn clean_rows(rows: &[RawMetricRow]) -> Vec<RawMetricRow> {
    let mut out = rows.to_vec();

    fill_column(&mut out, |r| &mut r.sales);
    fill_column(&mut out, |r| &mut r.revenue);
    fill_column(&mut out, |r| &mut r.users);
    fill_column(&mut out, |r| &mut r.conversion_rate);

    let mut seen = HashSet::new();
    out.retain(|r| seen.insert(row_key(r)));
    out
}

/// Compute growth rates, the trailing moving average and cumulative revenue.
pub fn calculate_metrics(rows: &[RawMetricRow]) -> Vec<ProcessedMetricRow> {
    let sales: Vec<Option<f64>> = rows.iter().map(|r| r.sales).collect();
    let revenue: Vec<Option<f64>> = rows.iter().map(|r| r.revenue).collect();

    let sales_growth = pct_change(&sales);
    let revenue_growth = pct_change(&revenue);
    let sales_ma = rolling_mean(&sales, MOVING_AVERAGE_WINDOW);
    let cumulative = cumulative_sum(&revenue);

    rows.iter()
        .enumerate()
        .map(|(i, r)| ProcessedMetricRow {
            date: r.date,
            sales: r.sales,
            revenue: r.revenue,
            users: r.users,
            conversion_rate: r.conversion_rate,
            sales_growth: sales_growth[i],
            revenue_growth: revenue_growth[i],
            sales_7d_ma: sales_ma[i],
            cumulative_revenue: cumulative[i],
        })
        .collect()
}

fn fill_column<F>(rows: &mut [RawMetricRow], field: F)
where
    F: Fn(&mut RawMetricRow) -> &mut Option<f64>,
{
    let mut last = None;
    for row in rows.iter_mut() {
        let cell = field(row);
        match *cell {
            Some(v) => last = Some(v),
            None => *cell = last,
        }
    }

    let mut next = None;
    for row in rows.iter_mut().rev() {
        let cell = field(row);
        match *cell {
            Some(v) => next = Some(v),
            None => *cell = next,
        }
    }
}

type RowKey = (Option<NaiveDate>, [Option<u64>; 4]);

fn row_key(r: &RawMetricRow) -> RowKey {
    let bits = |v: Option<f64>| v.map(f64::to_bits);
    (
        r.date,
        [bits(r.sales), bits(r.revenue), bits(r.users), bits(r.conversion_rate)],
    )
}

/// Percent change from the previous row, times 100.
///
/// Undefined (None) on the first row, when either value is missing, or when
/// the previous value is zero.
fn pct_change(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let change = match (i.checked_sub(1).and_then(|p| values[p]), values[i]) {
            (Some(prev), Some(curr)) if prev != 0.0 => Some((curr - prev) / prev * 100.0),
            _ => None,
        };
        out.push(change);
    }
    out
}

fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if window == 0 || i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let sum = slice.iter().copied().sum::<Option<f64>>()?;
            Some(sum / window as f64)
        })
        .collect()
}

fn cumulative_sum(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut acc = 0.0;
    values
        .iter()
        .map(|v| {
            let v = (*v)?;
            acc += v;
            Some(acc)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(day: u32, sales: Option<f64>, revenue: Option<f64>) -> RawMetricRow {
        RawMetricRow {
            date: NaiveDate::from_ymd_opt(2024, 1, day),
            sales,
            revenue,
            users: Some(50.0),
            conversion_rate: Some(0.02),
        }
    }

    #[test]
    fn forward_then_backward_fill() {
        let rows = vec![
            row(1, None, Some(1.0)),
            row(2, Some(10.0), None),
            row(3, None, None),
            row(4, Some(40.0), Some(4.0)),
        ];
        let cleaned = clean_rows(&rows);
        let sales: Vec<_> = cleaned.iter().map(|r| r.sales).collect();
        let revenue: Vec<_> = cleaned.iter().map(|r| r.revenue).collect();
        assert_eq!(sales, vec![Some(10.0), Some(10.0), Some(10.0), Some(40.0)]);
        assert_eq!(revenue, vec![Some(1.0), Some(1.0), Some(1.0), Some(4.0)]);
    }

    #[test]
    fn column_with_no_values_stays_empty() {
        let mut rows = vec![row(1, Some(1.0), Some(1.0)), row(2, Some(2.0), Some(2.0))];
        for r in &mut rows {
            r.users = None;
        }
        let cleaned = clean_rows(&rows);
        assert!(cleaned.iter().all(|r| r.users.is_none()));
    }

    #[test]
    fn exact_duplicates_are_dropped_keeping_first() {
        let rows = vec![
            row(1, Some(1.0), Some(1.0)),
            row(1, Some(1.0), Some(1.0)),
            row(2, Some(1.0), Some(1.0)),
        ];
        let cleaned = clean_rows(&rows);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[1].date, NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[test]
    fn growth_rates() {
        let rows = vec![
            row(1, Some(100.0), Some(0.0)),
            row(2, Some(110.0), Some(50.0)),
            row(3, Some(99.0), Some(100.0)),
        ];
        let out = calculate_metrics(&rows);
        assert_eq!(out[0].sales_growth, None);
        assert!((out[1].sales_growth.unwrap() - 10.0).abs() < 1e-9);
        assert!((out[2].sales_growth.unwrap() + 10.0).abs() < 1e-9);
        // Previous revenue of zero has no defined percent change.
        assert_eq!(out[1].revenue_growth, None);
        assert!((out[2].revenue_growth.unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn moving_average_needs_full_window() {
        let rows: Vec<_> = (1..=8).map(|d| row(d, Some(d as f64), Some(1.0))).collect();
        let out = calculate_metrics(&rows);
        assert!(out[..6].iter().all(|r| r.sales_7d_ma.is_none()));
        // mean(1..=7) = 4, mean(2..=8) = 5
        assert_eq!(out[6].sales_7d_ma, Some(4.0));
        assert_eq!(out[7].sales_7d_ma, Some(5.0));
    }

    #[test]
    fn cumulative_revenue_is_running_sum() {
        let rows = vec![
            row(1, Some(1.0), Some(10.0)),
            row(2, Some(1.0), Some(20.5)),
            row(3, Some(1.0), Some(0.5)),
        ];
        let out = calculate_metrics(&rows);
        let cum: Vec<_> = out.iter().map(|r| r.cumulative_revenue).collect();
        assert_eq!(cum, vec![Some(10.0), Some(30.5), Some(31.0)]);
    }
}
