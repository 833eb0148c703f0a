//! Static chart rendering with Plotters.
//!
//! Charts are drawn with the bitmap backend straight into the output file;
//! the encoder is picked from the file extension (`.jpg`, `.png`, ...).
//!
//! Axis-bound and label helpers are kept free of drawing code so they can be
//! tested without fonts or a backend.

use std::ops::Range;

use chrono::{Duration, NaiveDate};

use crate::error::AppError;

pub mod deflation;
pub mod kpi;

pub use deflation::render_deflation_chart;
pub use kpi::render_kpi_report;

const FONT: &str = "sans-serif";
/// Month ticks on date axes.
const DATE_TICK_FORMAT: &str = "%Y-%m";

/// X-axis bounds for a set of dates. A single date is widened by one day on
/// each side so the axis has a non-empty span.
pub fn date_bounds(dates: impl IntoIterator<Item = NaiveDate>) -> Option<(NaiveDate, NaiveDate)> {
    let mut iter = dates.into_iter();
    let first = iter.next()?;
    let (lo, hi) = iter.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));

    if lo == hi {
        Some((lo - Duration::days(1), hi + Duration::days(1)))
    } else {
        Some((lo, hi))
    }
}

/// Y-axis bounds with 5% padding. Non-finite values are ignored.
pub fn value_bounds(values: impl IntoIterator<Item = f64>) -> Option<Range<f64>> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;

    let span = hi - lo;
    let pad = if span > f64::EPSILON * hi.abs().max(1.0) {
        span * 0.05
    } else {
        // Flat series: open a band around the level.
        (hi.abs() * 0.05).max(1.0)
    };
    Some((lo - pad)..(hi + pad))
}

/// Tick label for value axes: fewer decimals for large magnitudes.
pub fn format_axis_value(v: f64) -> String {
    if v.abs() >= 100.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn format_date_tick(d: &NaiveDate) -> String {
    d.format(DATE_TICK_FORMAT).to_string()
}

fn draw_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::output(format!("Chart rendering failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn date_bounds_span_input() {
        let bounds = date_bounds([d(2024, 3, 1), d(2023, 9, 4), d(2024, 9, 4)]).unwrap();
        assert_eq!(bounds, (d(2023, 9, 4), d(2024, 9, 4)));
    }

    #[test]
    fn date_bounds_widen_single_day() {
        let bounds = date_bounds([d(2024, 9, 4)]).unwrap();
        assert_eq!(bounds, (d(2024, 9, 3), d(2024, 9, 5)));
        assert!(date_bounds(std::iter::empty()).is_none());
    }

    #[test]
    fn value_bounds_pad_range() {
        let r = value_bounds([800.0, 1000.0, f64::NAN]).unwrap();
        assert!((r.start - 790.0).abs() < 1e-9);
        assert!((r.end - 1010.0).abs() < 1e-9);
    }

    #[test]
    fn value_bounds_open_flat_series() {
        let r = value_bounds([40.0, 40.0]).unwrap();
        assert!(r.start < 40.0 && r.end > 40.0);

        let r = value_bounds([0.0]).unwrap();
        assert_eq!(r, -1.0..1.0);

        assert!(value_bounds([f64::INFINITY]).is_none());
    }

    #[test]
    fn axis_values_use_magnitude_dependent_precision() {
        assert_eq!(format_axis_value(27415.4), "27415");
        assert_eq!(format_axis_value(4.256), "4.26");
        assert_eq!(format_date_tick(&d(2024, 9, 4)), "2024-09");
    }
}
