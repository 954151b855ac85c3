//! Network command handler: force-directed airport connection graph

use super::{resolve_output, write_and_publish};
use crate::args::ChartArgs;
use delay_atlas::config::Config;
use delay_atlas::core::aggregate::{filter_by_delay, infer_countries};
use delay_atlas::core::chart::{NetworkChart, NETWORK_FILE};
use delay_atlas::core::layout::{layout_network, SpringConfig};
use delay_atlas::core::loader::{load_airports, load_flights, CoordinatePolicy};
use delay_atlas::core::network::FlightNetwork;
use delay_atlas::core::publish::PublishMode;
use delay_atlas::{error, info, warn};
use std::path::Path;

/// Run the network command
pub fn run(chart_args: &ChartArgs, config: &Config, layout: SpringConfig) {
    if let Err(e) = build(chart_args, config, layout) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn build(chart_args: &ChartArgs, config: &Config, layout: SpringConfig) -> Result<(), String> {
    let flights = load_flights(Path::new(&config.paths.flights_file)).map_err(|e| {
        error!("Failed to load flights: {e}");
        format!("✗ {e}")
    })?;

    // Stations without coordinates still get a name in the hover text
    let airports = load_airports(
        Path::new(&config.paths.airports_file),
        CoordinatePolicy::Optional,
    )
    .map_err(|e| {
        error!("Failed to load airports: {e}");
        format!("✗ {e}")
    })?;

    let windowed = filter_by_delay(&flights, config.delay_window());
    let network = FlightNetwork::from_records(windowed.iter().copied());
    let countries = infer_countries(windowed.iter().copied());
    info!(
        "Network: {} airports, {} connections from {} delayed flights",
        network.node_count(),
        network.edge_count(),
        windowed.len()
    );
    if network.is_empty() {
        warn!("No flights left after filtering; writing an empty network chart");
    }

    let positions = layout_network(&network, &layout);
    let chart = NetworkChart::new(&network, &positions, &countries, &airports);

    let output = resolve_output(chart_args, config, NETWORK_FILE);
    write_and_publish(&chart, &output, config, PublishMode::Sync)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const FLIGHTS: &str = "\
ID,DEPSTN,ARRSTN,target,DEP_COUNTRY,ARR_COUNTRY
train_1,TUN,CDG,40,Tunisia,France
";

    #[test]
    fn test_missing_airports_file_aborts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("flights.csv"), FLIGHTS).unwrap();

        let mut config = Config::from_defaults();
        config.paths.flights_file = dir.path().join("flights.csv").display().to_string();
        config.paths.airports_file = dir.path().join("does_not_exist.dat").display().to_string();
        config.git.push = false;
        let output = dir.path().join(NETWORK_FILE);
        let chart_args = ChartArgs {
            output: Some(output.clone()),
            ..ChartArgs::default()
        };

        let err = build(&chart_args, &config, SpringConfig::default()).unwrap_err();
        assert!(err.starts_with('✗'));
        assert!(err.contains("does_not_exist.dat"));
        assert!(!output.exists());
    }
}
