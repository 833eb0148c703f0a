//! Reporting utilities: formatted terminal output for both reports.

pub mod format;

pub use format::{format_deflation_summary, format_kpi_summary};
