//! Shared report pipelines.
//!
//! Each pipeline is: current values -> historical series -> transform. The
//! front-end (`app`) then takes care of printing, rendering and exports.

use tracing::{info, warn};

use crate::data::IndicatorSource;
use crate::data::catalog::{CER_ID, EXCHANGE_RATE_ID};
use crate::domain::{DateRange, Indicator, KpiPanel, MergedRow, Variable};
use crate::error::AppError;
use crate::transform::{merge_and_deflate, select_watchlist};

/// Outputs of a `bcra deflate` run.
#[derive(Debug, Clone)]
pub struct DeflationRun {
    pub range: DateRange,
    /// Current official values of the nominal series and the index, when listed.
    pub quotes: Vec<Variable>,
    pub rows: Vec<MergedRow>,
}

/// Outputs of a `bcra kpi` run.
#[derive(Debug, Clone)]
pub struct KpiRun {
    pub range: DateRange,
    pub panels: Vec<KpiPanel>,
}

/// Exchange rate vs. CER-deflated exchange rate.
///
/// Fails if either history is unavailable: there is no partial report.
pub fn run_deflation<S: IndicatorSource>(source: &S, range: DateRange) -> Result<DeflationRun, AppError> {
    let current = source.principal_variables()?;
    let quotes: Vec<Variable> = current
        .into_iter()
        .filter(|v| v.id == EXCHANGE_RATE_ID || v.id == CER_ID)
        .collect();

    let nominal = source.series(EXCHANGE_RATE_ID, range);
    let index = source.series(CER_ID, range);

    let rows = merge_and_deflate(&nominal, &index)?;
    info!(%range, rows = rows.len(), "deflated exchange rate series");

    Ok(DeflationRun { range, quotes, rows })
}

/// Current values for the watch-list, each with its history when available.
pub fn run_kpi<S: IndicatorSource>(
    source: &S,
    range: DateRange,
    watchlist: &[Indicator],
) -> Result<KpiRun, AppError> {
    let current = source.principal_variables()?;

    let rows = select_watchlist(&current, watchlist);
    if rows.is_empty() {
        return Err(AppError::data(
            "None of the watch-listed variables are present in the current values listing.",
        ));
    }
    info!(selected = rows.len(), listed = current.len(), "filtered watch-list variables");

    let panels: Vec<KpiPanel> = rows
        .into_iter()
        .map(|row| {
            let history = source.series(row.id, range);
            if history.is_empty() {
                warn!(id = row.id, label = %row.label, "no history; the panel will show a placeholder");
            }
            KpiPanel { row, history }
        })
        .collect();

    Ok(KpiRun { range, panels })
}
