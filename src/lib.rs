//! Shared library for `delay-atlas`
//! Contains the loading, aggregation, chart and publishing pipeline used by the CLI

pub mod core;
pub mod logger;

pub use crate::core::{config, get_version};
