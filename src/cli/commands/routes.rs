//! Routes command handler: delay route map on a world projection

use super::{resolve_output, write_and_publish};
use crate::args::ChartArgs;
use delay_atlas::config::Config;
use delay_atlas::core::aggregate::RouteMapData;
use delay_atlas::core::chart::{RouteMapChart, ROUTE_MAP_FILE};
use delay_atlas::core::loader::{load_airports, load_flights, CoordinatePolicy};
use delay_atlas::core::publish::PublishMode;
use delay_atlas::{error, info, verbose};
use std::path::Path;

/// Run the routes command
pub fn run(chart_args: &ChartArgs, config: &Config) {
    if let Err(e) = build(chart_args, config) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn build(chart_args: &ChartArgs, config: &Config) -> Result<(), String> {
    let flights_path = Path::new(&config.paths.flights_file);
    let airports_path = Path::new(&config.paths.airports_file);

    let flights = load_flights(flights_path).map_err(|e| {
        error!("Failed to load flights: {e}");
        format!("✗ {e}")
    })?;
    let airports = load_airports(airports_path, CoordinatePolicy::Required).map_err(|e| {
        error!("Failed to load airports: {e}");
        format!("✗ {e}")
    })?;
    info!(
        "Loaded {} flights and {} located airports",
        flights.len(),
        airports.len()
    );

    let data = RouteMapData::build(&flights, &airports, config.delay_window()).map_err(|e| {
        error!("Aggregation failed: {e}");
        format!("✗ {e}")
    })?;
    info!(
        "Route map: {} routes, {} airports from {} joined flights",
        data.summary.routes, data.summary.airports, data.summary.joined
    );
    verbose!("{}", data.summary);

    let output = resolve_output(chart_args, config, ROUTE_MAP_FILE);
    write_and_publish(
        &RouteMapChart::new(&data),
        &output,
        config,
        PublishMode::Force,
    )
}
