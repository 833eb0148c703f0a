//! Terminal summaries printed after each report.
//!
//! Formatting lives here so the pipelines stay free of presentation concerns.

use crate::app::pipeline::{DeflationRun, KpiRun};
use crate::data::catalog::{CER_ID, CER_LABEL, EXCHANGE_RATE_ID, EXCHANGE_RATE_LABEL};
use crate::domain::VariableId;

/// Summary of a deflation run: official quotes, joined span, endpoints.
pub fn format_deflation_summary(run: &DeflationRun) -> String {
    let mut out = String::new();

    out.push_str("=== bcra - Tipo de Cambio Nominal vs. Deflactado (CER) ===\n");
    out.push_str(&format!("Range requested: {}\n", run.range));

    for id in [EXCHANGE_RATE_ID, CER_ID] {
        match run.quotes.iter().find(|v| v.id == id) {
            Some(v) => {
                out.push_str(&format!(
                    "Current {:<12} {:>14.4} (as of {})\n",
                    series_label(id),
                    v.value,
                    v.date
                ));
                if let Some(description) = &v.label {
                    out.push_str(&format!("        {description}\n"));
                }
            }
            None => out.push_str(&format!("Current {:<12} {:>14}\n", series_label(id), "-")),
        }
    }

    let (Some(first), Some(last)) = (run.rows.first(), run.rows.last()) else {
        out.push_str("Joined rows: 0\n");
        return out;
    };

    out.push_str(&format!(
        "Joined rows: {} | {} .. {}\n",
        run.rows.len(),
        first.date,
        last.date
    ));
    out.push_str(&format!("Index at end: {:.4}\n", last.index));
    out.push_str(&format!(
        "{:<10} {:>14} {:>14}\n",
        "", "nominal", "deflated"
    ));
    out.push_str(&format!(
        "{:<10} {:>14.2} {:>14.2}\n",
        "first", first.nominal, first.deflated
    ));
    out.push_str(&format!(
        "{:<10} {:>14.2} {:>14.2}\n",
        "last", last.nominal, last.deflated
    ));

    out
}

/// One line per KPI row, in report order.
pub fn format_kpi_summary(run: &KpiRun) -> String {
    let mut out = String::new();

    out.push_str("=== bcra - Principales Variables ===\n");
    out.push_str(&format!("History range: {}\n", run.range));

    for panel in &run.panels {
        let history = if panel.has_history() {
            format!("{} pts", panel.history.len())
        } else {
            "sin historial".to_string()
        };
        out.push_str(&format!(
            "{:>3}  {:<36} {:>14.2}  {}  [{}]\n",
            panel.row.id, panel.row.label, panel.row.value, panel.row.date, history
        ));
    }

    out
}

fn series_label(id: VariableId) -> &'static str {
    match id {
        EXCHANGE_RATE_ID => EXCHANGE_RATE_LABEL,
        CER_ID => CER_LABEL,
        _ => "?",
    }
}
