//! Align a nominal series with a price index and deflate it.
//!
//! Rows are joined on exact date equality. Dates present in only one series
//! are dropped; there is no interpolation or forward-fill.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{MergedRow, Series};
use crate::error::AppError;

/// Inner-join `nominal` and `index` by date and express every nominal value
/// in end-of-period index terms:
///
/// `deflated = nominal * (index_at_end / index_at_row)`
///
/// so the last joined row's deflated value equals its nominal value.
pub fn merge_and_deflate(nominal: &Series, index: &Series) -> Result<Vec<MergedRow>, AppError> {
    for series in [nominal, index] {
        if series.is_empty() {
            return Err(AppError::data(format!(
                "Historical data for variable {} is unavailable; cannot build the deflated series.",
                series.id
            )));
        }
    }

    let nominal_by_date = by_date(nominal);
    let index_by_date = by_date(index);

    let joined: Vec<(NaiveDate, f64, f64)> = nominal_by_date
        .iter()
        .filter_map(|(date, &n)| index_by_date.get(date).map(|&i| (*date, n, i)))
        .collect();

    debug!(
        nominal = nominal_by_date.len(),
        index = index_by_date.len(),
        joined = joined.len(),
        "aligned series on date"
    );

    let Some(&(_, _, index_end)) = joined.last() else {
        return Err(AppError::data(format!(
            "Variables {} and {} share no observation dates.",
            nominal.id, index.id
        )));
    };

    let mut rows = Vec::with_capacity(joined.len());
    for (date, nominal_value, index_value) in joined {
        if !(index_value.is_finite() && index_value > 0.0) {
            return Err(AppError::data(format!(
                "Invalid index value {index_value} for variable {} on {date}.",
                index.id
            )));
        }
        rows.push(MergedRow {
            date,
            nominal: nominal_value,
            index: index_value,
            deflated: nominal_value * (index_end / index_value),
        });
    }

    Ok(rows)
}

/// Later observations for the same date replace earlier ones.
fn by_date(series: &Series) -> BTreeMap<NaiveDate, f64> {
    series.points.iter().map(|p| (p.date, p.value)).collect()
}
