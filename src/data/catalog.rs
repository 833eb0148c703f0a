//! Known BCRA variable identifiers and the KPI watch-list.

use crate::domain::{Indicator, VariableId};

/// Wholesale exchange rate (ARS per USD, Com. A 3500).
pub const EXCHANGE_RATE_ID: VariableId = 5;
/// CER reference index, used as the deflator.
pub const CER_ID: VariableId = 31;

pub const EXCHANGE_RATE_LABEL: &str = "TC Mayorista";
pub const CER_LABEL: &str = "CER";

/// KPI watch-list. Slice order is the display priority.
pub const WATCHLIST: &[Indicator] = &[
    Indicator { id: 1, label: "Reservas Internacionales del BCRA" },
    Indicator { id: 5, label: "TC Mayorista" },
    Indicator { id: 27, label: "Inflación mensual" },
    Indicator { id: 28, label: "Inflación interanual" },
    Indicator { id: 29, label: "REM infla prox 12meses(mediana)" },
    Indicator { id: 34, label: "Tasa de Política Monetaria (TEA)" },
    Indicator { id: 7, label: "BADLAR TNA" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watchlist_ids_are_unique() {
        let mut ids: Vec<VariableId> = WATCHLIST.iter().map(|i| i.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), WATCHLIST.len());
    }

    #[test]
    fn watchlist_includes_exchange_rate() {
        assert!(WATCHLIST.iter().any(|i| i.id == EXCHANGE_RATE_ID));
    }
}
