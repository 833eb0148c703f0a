//! Filter the current-values listing down to the KPI watch-list.

use crate::domain::{Indicator, KpiRow, Variable};

/// Keep only watch-listed variables, relabel them, and order them by
/// watch-list position. Ids the watch-list doesn't name are dropped; if the
/// listing repeats an id, the first occurrence wins.
pub fn select_watchlist(variables: &[Variable], watchlist: &[Indicator]) -> Vec<KpiRow> {
    watchlist
        .iter()
        .filter_map(|indicator| {
            variables
                .iter()
                .find(|v| v.id == indicator.id)
                .map(|v| KpiRow {
                    id: v.id,
                    label: indicator.label.to_string(),
                    value: v.value,
                    date: v.date,
                })
        })
        .collect()
}
