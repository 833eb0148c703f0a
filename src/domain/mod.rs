//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - API-side records (`Variable`, `HistoricalPoint`, `Series`)
//! - derived rows (`MergedRow`, `KpiRow`)
//! - run configuration (`DateRange`, `DeflateConfig`, `KpiConfig`)

pub mod types;

pub use types::*;
