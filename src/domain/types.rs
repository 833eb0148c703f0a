//! Shared domain types.
//!
//! Everything here lives for a single run only. `HistoricalPoint` derives
//! `Serialize` because the KPI JSON export embeds history points as-is.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AppError;

/// Identifier of a BCRA statistics variable (`idVariable`).
pub type VariableId = u32;

/// A principal variable as reported by the "current values" endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub id: VariableId,
    /// API description, when present.
    pub label: Option<String>,
    pub value: f64,
    pub date: NaiveDate,
}

/// One observation of a historical series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A historical series for one variable, ordered by date ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub id: VariableId,
    pub points: Vec<HistoricalPoint>,
}

impl Series {
    /// Build a series, sorting points by date.
    ///
    /// The sort is stable so equal dates keep their response order.
    pub fn new(id: VariableId, mut points: Vec<HistoricalPoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self { id, points }
    }

    /// The "data unavailable" value returned by the fetcher on failure.
    pub fn empty(id: VariableId) -> Self {
        Self { id, points: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn first(&self) -> Option<&HistoricalPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&HistoricalPoint> {
        self.points.last()
    }
}

/// A joined row of the nominal series and the deflator index.
///
/// `deflated = nominal * (index_at_end / index)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergedRow {
    pub date: NaiveDate,
    pub nominal: f64,
    pub index: f64,
    pub deflated: f64,
}

/// Watch-list entry: which variable to show and under which label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub id: VariableId,
    pub label: &'static str,
}

/// A current value that passed the watch-list filter, relabelled.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiRow {
    pub id: VariableId,
    pub label: String,
    pub value: f64,
    pub date: NaiveDate,
}

/// One row of the KPI report: the current value plus its history.
///
/// An empty `history` means the history could not be fetched; the row is
/// still reported, with a placeholder instead of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiPanel {
    pub row: KpiRow,
    pub history: Series,
}

impl KpiPanel {
    pub fn has_history(&self) -> bool {
        !self.history.is_empty()
    }
}

/// Inclusive calendar range used in historical series requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, AppError> {
        if from > to {
            return Err(AppError::config(format!(
                "Invalid date range: start {from} is after end {to}."
            )));
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from.format("%Y-%m-%d"), self.to.format("%Y-%m-%d"))
    }
}

/// Pixel size of a rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Resolved options for the `deflate` report.
#[derive(Debug, Clone)]
pub struct DeflateConfig {
    pub range: DateRange,
    pub output: PathBuf,
    pub size: ImageSize,
    pub export_csv: Option<PathBuf>,
}

/// Resolved options for the `kpi` report.
///
/// `row_height` is per watch-list row; the image grows with the number of rows.
#[derive(Debug, Clone)]
pub struct KpiConfig {
    pub range: DateRange,
    pub output: PathBuf,
    pub width: u32,
    pub row_height: u32,
    pub export_json: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn series_new_sorts_by_date() {
        let s = Series::new(
            5,
            vec![
                HistoricalPoint { date: d(2024, 1, 3), value: 3.0 },
                HistoricalPoint { date: d(2024, 1, 1), value: 1.0 },
                HistoricalPoint { date: d(2024, 1, 2), value: 2.0 },
            ],
        );
        let values: Vec<f64> = s.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
        assert_eq!(s.first().unwrap().date, d(2024, 1, 1));
        assert_eq!(s.last().unwrap().date, d(2024, 1, 3));
    }

    #[test]
    fn date_range_rejects_reversed_bounds() {
        let err = DateRange::new(d(2024, 9, 4), d(2023, 9, 4)).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let same = DateRange::new(d(2024, 9, 4), d(2024, 9, 4)).unwrap();
        assert_eq!(same.to_string(), "2024-09-04..2024-09-04");
    }
}
