//! Command-line parsing for the BCRA chart reports.
//!
//! Argument parsing and command dispatch stay separate from fetching,
//! transforming and rendering.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::data::DEFAULT_BASE_URL;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bcra", version, about = "BCRA statistics charts (exchange rate deflation, KPI report)")]
pub struct Cli {
    #[command(flatten)]
    pub client: ClientArgs,

    /// Log debug details (request URLs, row counts). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Chart the wholesale exchange rate against its CER-deflated value.
    Deflate(DeflateArgs),
    /// Render the KPI report for the watch-listed principal variables.
    Kpi(KpiArgs),
}

/// HTTP client options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct ClientArgs {
    /// Base URL of the statistics API.
    #[arg(long, env = "BCRA_API_BASE", default_value = DEFAULT_BASE_URL, global = true)]
    pub api_base: String,

    /// Extra trusted root certificate (PEM).
    #[arg(long, env = "BCRA_CA_CERT", value_name = "PEM", global = true, conflicts_with = "insecure")]
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS certificate validation.
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (default: HTTP client default).
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct DeflateArgs {
    /// First date of the history window (YYYY-MM-DD).
    #[arg(long, default_value = "2023-09-04")]
    pub from: NaiveDate,

    /// Last date of the history window (YYYY-MM-DD).
    #[arg(long, default_value = "2024-09-04")]
    pub to: NaiveDate,

    /// Output image; the format follows the extension.
    #[arg(short, long, default_value = "tc_nominal_vs_deflactado.jpg")]
    pub output: PathBuf,

    /// Image width (pixels).
    #[arg(long, default_value_t = 2000)]
    pub width: u32,

    /// Image height (pixels).
    #[arg(long, default_value_t = 1200)]
    pub height: u32,

    /// Also export the merged rows to CSV.
    #[arg(long = "export-csv", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct KpiArgs {
    /// First date of the history window (YYYY-MM-DD).
    #[arg(long, default_value = "2023-09-16")]
    pub from: NaiveDate,

    /// Last date of the history window (YYYY-MM-DD).
    #[arg(long, default_value = "2024-09-08")]
    pub to: NaiveDate,

    /// Output image; the format follows the extension.
    #[arg(short, long, default_value = "kpi_report_con_historial.jpg")]
    pub output: PathBuf,

    /// Image width (pixels).
    #[arg(long, default_value_t = 2400)]
    pub width: u32,

    /// Height of each report row (pixels).
    #[arg(long, default_value_t = 480)]
    pub row_height: u32,

    /// Also export the KPI snapshot to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}
