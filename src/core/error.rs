//! Error types for the loading, charting and publishing stages

use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading or aggregating input data
#[derive(Debug, Error)]
pub enum DataError {
    /// The input file could not be opened or read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// A row could not be parsed
    #[error("malformed data in {path}: {source}")]
    Csv {
        /// File being read
        path: PathBuf,
        /// Underlying CSV error
        #[source]
        source: csv::Error,
    },
    /// Nothing survived filtering and joining
    #[error("no routes left after filtering {flights} flights by delay and joining airport coordinates")]
    NoRoutes {
        /// Number of flights read before filtering
        flights: usize,
    },
}

/// Failures while building or writing a chart
#[derive(Debug, Error)]
pub enum ChartError {
    /// The figure could not be serialized to JSON
    #[error("failed to serialize figure: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The HTML template failed to render
    #[error("failed to render chart page: {0}")]
    Template(#[from] askama::Error),
    /// The HTML file could not be written
    #[error("failed to write {path}: {source}")]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Failures while committing and pushing a chart
#[derive(Debug, Error)]
pub enum PublishError {
    /// `git` could not be started
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        /// Command line that was attempted
        command: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// `git` ran and exited unsuccessfully
    #[error("`{command}` failed{}", format_status(.code))]
    CommandFailed {
        /// Command line that failed
        command: String,
        /// Exit code, when the process exited normally
        code: Option<i32>,
    },
}

#[allow(clippy::ref_option)]
fn format_status(code: &Option<i32>) -> String {
    code.map_or_else(|| " (terminated by signal)".to_string(), |c| format!(" with exit code {c}"))
}
