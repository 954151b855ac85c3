//! CLI command handlers for `delay-atlas`.
//!
//! Each subcommand is implemented in its own submodule; the chart commands
//! share input resolution and the write-then-publish tail defined here.

pub mod config;
pub mod network;
pub mod routes;

use crate::args::ChartArgs;
use delay_atlas::config::Config;
use delay_atlas::core::chart::Chart;
use delay_atlas::core::publish::{PublishMode, PublishOutcome, Publisher, SystemGit};
use delay_atlas::{error, info};
use std::path::{Path, PathBuf};

/// Where the chart page goes: `--output`, else the fixed name inside `out_dir`
pub fn resolve_output(chart_args: &ChartArgs, config: &Config, default_name: &str) -> PathBuf {
    chart_args
        .output
        .clone()
        .unwrap_or_else(|| config.output_path(default_name))
}

/// Render `chart`, write it, print its absolute path and publish it if enabled
pub fn write_and_publish(
    chart: &dyn Chart,
    output: &Path,
    config: &Config,
    mode: PublishMode,
) -> Result<(), String> {
    chart.generate(output).map_err(|e| {
        error!("Chart generation failed: {e}");
        format!("✗ Failed to write {}: {e}", output.display())
    })?;

    let absolute = output
        .canonicalize()
        .unwrap_or_else(|_| output.to_path_buf());
    println!("✓ HTML saved: {}", absolute.display());

    if !config.git.push {
        info!("Publishing disabled; skipping git");
        return Ok(());
    }

    let mut git = SystemGit::new();
    let outcome = Publisher::new(&mut git, &config.git.remote, &config.git.branch)
        .publish(output, mode)
        .map_err(|e| {
            error!("Publishing failed: {e}");
            format!("✗ Failed to publish {}: {e}", output.display())
        })?;

    match outcome {
        PublishOutcome::Pushed { committed } => {
            let note = if committed { "" } else { " (no new commit)" };
            println!(
                "✓ Pushed to {}/{}{note}",
                config.git.remote, config.git.branch
            );
        }
        PublishOutcome::NotARepository => {
            eprintln!("✗ Not a git repository; chart written but not pushed");
        }
        PublishOutcome::RebaseInProgress => {
            eprintln!("✗ Rebase in progress; chart written but not pushed");
        }
        PublishOutcome::Failed(reason) => {
            eprintln!("✗ Push failed: {reason}");
        }
    }
    Ok(())
}
