//! Data acquisition: the BCRA API client and the variable catalog.

pub mod bcra;
pub mod catalog;

pub use bcra::{BcraClient, ClientConfig, IndicatorSource, TrustPolicy, DEFAULT_BASE_URL};
