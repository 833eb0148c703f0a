//! Export report data next to the chart images.
//!
//! - merged deflation rows as CSV (spreadsheet friendly)
//! - KPI snapshot (current values + history) as JSON

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::app::pipeline::KpiRun;
use crate::domain::{HistoricalPoint, MergedRow, VariableId};
use crate::error::AppError;

/// Write merged rows to a CSV file.
pub fn write_merged_csv(path: &Path, rows: &[MergedRow]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "date,nominal,index,deflated")
        .map_err(|e| AppError::output(format!("Failed to write export CSV header: {e}")))?;

    for r in rows {
        writeln!(
            out,
            "{},{:.6},{:.6},{:.6}",
            r.date.format("%Y-%m-%d"),
            r.nominal,
            r.index,
            r.deflated
        )
        .map_err(|e| AppError::output(format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::output(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct KpiSnapshot<'a> {
    tool: &'static str,
    history_from: NaiveDate,
    history_to: NaiveDate,
    indicators: Vec<KpiSnapshotRow<'a>>,
}

#[derive(Debug, Serialize)]
struct KpiSnapshotRow<'a> {
    id: VariableId,
    label: &'a str,
    value: f64,
    date: NaiveDate,
    history_available: bool,
    history: &'a [HistoricalPoint],
}

/// Write the KPI snapshot as pretty JSON.
pub fn write_kpi_json(path: &Path, run: &KpiRun) -> Result<(), AppError> {
    let snapshot = KpiSnapshot {
        tool: "bcra",
        history_from: run.range.from(),
        history_to: run.range.to(),
        indicators: run
            .panels
            .iter()
            .map(|p| KpiSnapshotRow {
                id: p.row.id,
                label: &p.row.label,
                value: p.row.value,
                date: p.row.date,
                history_available: p.has_history(),
                history: &p.history.points,
            })
            .collect(),
    };

    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create export JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &snapshot)
        .map_err(|e| AppError::output(format!("Failed to write export JSON: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::{DateRange, KpiPanel, KpiRow, Series};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bcra_charts_{}_{name}", std::process::id()))
    }

    #[test]
    fn csv_has_header_and_one_line_per_row() {
        let path = temp_path("merged.csv");
        let rows = [
            MergedRow { date: d(2023, 9, 4), nominal: 800.0, index: 100.0, deflated: 880.0 },
            MergedRow { date: d(2023, 9, 5), nominal: 810.0, index: 110.0, deflated: 810.0 },
        ];

        write_merged_csv(&path, &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,nominal,index,deflated");
        assert_eq!(lines[1], "2023-09-04,800.000000,100.000000,880.000000");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn json_snapshot_flags_missing_history() {
        let path = temp_path("kpi.json");
        let run = KpiRun {
            range: DateRange::new(d(2023, 9, 16), d(2024, 9, 8)).unwrap(),
            panels: vec![
                KpiPanel {
                    row: KpiRow { id: 1, label: "Reservas Internacionales del BCRA".into(), value: 27415.0, date: d(2024, 9, 4) },
                    history: Series::new(1, vec![HistoricalPoint { date: d(2024, 9, 2), value: 27000.0 }]),
                },
                KpiPanel {
                    row: KpiRow { id: 7, label: "BADLAR TNA".into(), value: 39.5, date: d(2024, 9, 4) },
                    history: Series::empty(7),
                },
            ],
        };

        write_kpi_json(&path, &run).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["history_from"], "2023-09-16");
        let indicators = json["indicators"].as_array().unwrap();
        assert_eq!(indicators.len(), 2);
        assert_eq!(indicators[0]["history_available"], true);
        assert_eq!(indicators[0]["history"][0]["date"], "2024-09-02");
        assert_eq!(indicators[1]["label"], "BADLAR TNA");
        assert_eq!(indicators[1]["history_available"], false);
        assert_eq!(indicators[1]["history"].as_array().unwrap().len(), 0);
    }
}
