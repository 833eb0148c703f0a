//! `bcra-charts` library crate.
//!
//! The binary (`bcra`) is a thin wrapper around this library so that:
//!
//! - the pipelines are testable without spawning processes or hitting the network
//! - fetching, transforming and rendering stay separately navigable

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod transform;
