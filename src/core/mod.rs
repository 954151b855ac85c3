//! Core module: everything between the input files and the published chart

pub mod aggregate;
pub mod chart;
pub mod colorscale;
pub mod config;
pub mod error;
pub mod layout;
pub mod loader;
pub mod models;
pub mod network;
pub mod publish;

/// Returns the current version of the `delay-atlas` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
