//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - builds the API client
//! - runs a report pipeline, prints its summary, renders and exports

use std::time::Duration;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{ClientArgs, Command, DeflateArgs, KpiArgs};
use crate::data::catalog::WATCHLIST;
use crate::data::{BcraClient, ClientConfig, TrustPolicy};
use crate::domain::{DateRange, DeflateConfig, ImageSize, KpiConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `bcra` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();

    init_tracing(cli.verbose);

    let client = BcraClient::new(&client_config_from_args(&cli.client))?;

    match cli.command {
        Command::Deflate(args) => handle_deflate(&client, deflate_config_from_args(&args)?),
        Command::Kpi(args) => handle_kpi(&client, kpi_config_from_args(&args)?),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "bcra_charts=debug" } else { "bcra_charts=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr; stdout carries the report summaries.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_deflate(client: &BcraClient, config: DeflateConfig) -> Result<(), AppError> {
    debug!(?config, "deflate report");
    let run = pipeline::run_deflation(client, config.range)?;

    println!("{}", crate::report::format_deflation_summary(&run));

    crate::plot::render_deflation_chart(&config.output, &run.rows, config.size)?;
    info!(path = %config.output.display(), "chart written");

    if let Some(path) = &config.export_csv {
        crate::io::write_merged_csv(path, &run.rows)?;
        info!(path = %path.display(), "merged rows exported");
    }

    println!("Informe guardado como '{}'.", config.output.display());
    Ok(())
}

fn handle_kpi(client: &BcraClient, config: KpiConfig) -> Result<(), AppError> {
    debug!(?config, "kpi report");
    let run = pipeline::run_kpi(client, config.range, WATCHLIST)?;

    println!("{}", crate::report::format_kpi_summary(&run));

    crate::plot::render_kpi_report(&config.output, &run.panels, config.width, config.row_height)?;
    info!(path = %config.output.display(), "report written");

    if let Some(path) = &config.export_json {
        crate::io::write_kpi_json(path, &run)?;
        info!(path = %path.display(), "KPI snapshot exported");
    }

    println!("Informe KPI con historial guardado como '{}'.", config.output.display());
    Ok(())
}

pub fn client_config_from_args(args: &ClientArgs) -> ClientConfig {
    let trust = if args.insecure {
        TrustPolicy::AcceptInvalid
    } else if let Some(path) = &args.ca_cert {
        TrustPolicy::ExtraRoot(path.clone())
    } else {
        TrustPolicy::SystemRoots
    };

    ClientConfig {
        base_url: args.api_base.clone(),
        trust,
        timeout: args.timeout_secs.map(Duration::from_secs),
    }
}

pub fn deflate_config_from_args(args: &DeflateArgs) -> Result<DeflateConfig, AppError> {
    ensure_image_size(args.width, args.height)?;
    Ok(DeflateConfig {
        range: DateRange::new(args.from, args.to)?,
        output: args.output.clone(),
        size: ImageSize {
            width: args.width,
            height: args.height,
        },
        export_csv: args.export_csv.clone(),
    })
}

pub fn kpi_config_from_args(args: &KpiArgs) -> Result<KpiConfig, AppError> {
    ensure_image_size(args.width, args.row_height)?;
    Ok(KpiConfig {
        range: DateRange::new(args.from, args.to)?,
        output: args.output.clone(),
        width: args.width,
        row_height: args.row_height,
        export_json: args.export_json.clone(),
    })
}

/// Largest accepted width or (row) height, in pixels.
const MAX_IMAGE_DIMENSION: u32 = 16_384;

fn ensure_image_size(width: u32, height: u32) -> Result<(), AppError> {
    if width < 200 || height < 120 {
        return Err(AppError::config(format!(
            "Image size {width}x{height} is too small to lay out a chart."
        )));
    }
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return Err(AppError::config(format!(
            "Image size {width}x{height} exceeds the {MAX_IMAGE_DIMENSION}px limit."
        )));
    }
    Ok(())
}
