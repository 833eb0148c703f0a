//! Input/output helpers.
//!
//! - report exports (CSV/JSON) (`export`)

pub mod export;

pub use export::*;
