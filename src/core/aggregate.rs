//! Delay filtering, coordinate joins and per-route / per-airport aggregation

use crate::core::error::DataError;
use crate::core::models::flight::non_blank;
use crate::core::models::{
    AirportIndex, Coordinates, DelayWindow, FlightRecord, GeoFlight, NodeAggregate,
    RouteAggregate, UNKNOWN_COUNTRY,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Station code -> inferred country
pub type CountryByStation = HashMap<String, String>;

/// Row counts at each stage of the route-map pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateSummary {
    /// Records read from the flights file
    pub flights_read: usize,
    /// Records whose delay lies inside the window
    pub within_window: usize,
    /// Windowed records whose both stations have coordinates
    pub joined: usize,
    /// Distinct directed routes
    pub routes: usize,
    /// Distinct airports drawn
    pub airports: usize,
}

impl fmt::Display for AggregateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Flights read:       {}", self.flights_read)?;
        writeln!(f, "Within delay window: {}", self.within_window)?;
        writeln!(f, "Joined to airports: {}", self.joined)?;
        writeln!(f, "Routes:             {}", self.routes)?;
        write!(f, "Airports:           {}", self.airports)
    }
}

/// Everything the route map is drawn from
#[derive(Debug, Clone)]
pub struct RouteMapData {
    /// Routes sorted by (origin, destination)
    pub routes: Vec<RouteAggregate>,
    /// Airports in first-appearance order (all origins, then destinations)
    pub nodes: Vec<NodeAggregate>,
    /// Stage counts
    pub summary: AggregateSummary,
}

impl RouteMapData {
    /// Run filter → join → aggregate over raw records
    ///
    /// # Errors
    /// Returns [`DataError::NoRoutes`] when no flight survives the delay window
    /// and the coordinate join.
    pub fn build(
        flights: &[FlightRecord],
        airports: &AirportIndex,
        window: DelayWindow,
    ) -> Result<Self, DataError> {
        let windowed = filter_by_delay(flights, window);
        let joined = join_coordinates(&windowed, airports);
        let countries = infer_countries(joined.iter().map(|j| j.record));
        let geo: Vec<GeoFlight> = joined.into_iter().map(|j| j.geo).collect();

        let routes = aggregate_routes(&geo);
        if routes.is_empty() {
            return Err(DataError::NoRoutes {
                flights: flights.len(),
            });
        }
        let nodes = aggregate_nodes(&geo, &routes, &countries);

        let summary = AggregateSummary {
            flights_read: flights.len(),
            within_window: windowed.len(),
            joined: geo.len(),
            routes: routes.len(),
            airports: nodes.len(),
        };

        Ok(Self {
            routes,
            nodes,
            summary,
        })
    }
}

/// A joined flight that still points at its source record (for country votes)
#[derive(Debug, Clone)]
pub struct JoinedFlight<'a> {
    /// Source row
    pub record: &'a FlightRecord,
    /// Row with both ends located
    pub geo: GeoFlight,
}

/// Keep records whose delay lies strictly inside `window`
#[must_use]
pub fn filter_by_delay(records: &[FlightRecord], window: DelayWindow) -> Vec<&FlightRecord> {
    records.iter().filter(|r| window.accepts(r)).collect()
}

/// Attach coordinates to both ends, dropping rows where either end is unknown
#[must_use]
pub fn join_coordinates<'a>(
    records: &[&'a FlightRecord],
    airports: &AirportIndex,
) -> Vec<JoinedFlight<'a>> {
    records
        .iter()
        .copied()
        .filter_map(|record| {
            let (origin, destination) = record.stations()?;
            let delay = record.delay?;
            let origin_coords = airports.coordinates(origin)?;
            let destination_coords = airports.coordinates(destination)?;
            Some(JoinedFlight {
                record,
                geo: GeoFlight {
                    origin: origin.to_string(),
                    destination: destination.to_string(),
                    origin_coords,
                    destination_coords,
                    delay,
                },
            })
        })
        .collect()
}

#[derive(Debug)]
struct RouteAccumulator {
    origin_coords: Coordinates,
    destination_coords: Coordinates,
    flights: usize,
    total_delay: f64,
}

/// Group flights by directed route and compute count and mean delay
///
/// The result is ordered by (origin, destination) and does not depend on the
/// order of `flights`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn aggregate_routes(flights: &[GeoFlight]) -> Vec<RouteAggregate> {
    let mut groups: BTreeMap<(&str, &str), RouteAccumulator> = BTreeMap::new();

    for flight in flights {
        let acc = groups
            .entry((flight.origin.as_str(), flight.destination.as_str()))
            .or_insert(RouteAccumulator {
                origin_coords: flight.origin_coords,
                destination_coords: flight.destination_coords,
                flights: 0,
                total_delay: 0.0,
            });
        acc.flights += 1;
        acc.total_delay += flight.delay;
    }

    groups
        .into_iter()
        .map(|((origin, destination), acc)| RouteAggregate {
            origin: origin.to_string(),
            destination: destination.to_string(),
            origin_coords: acc.origin_coords,
            destination_coords: acc.destination_coords,
            flights: acc.flights,
            mean_delay: acc.total_delay / acc.flights as f64,
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    total: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: f64) {
        self.total += value;
        self.count += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    fn value(self) -> Option<f64> {
        (self.count > 0).then(|| self.total / self.count as f64)
    }
}

/// Build one marker per airport that appears on a route
///
/// Each airport's delay is the mean of its mean departure delay and mean
/// arrival delay (or whichever of the two exists). Positions come from the
/// first route that mentions the code, scanning origins before destinations.
#[must_use]
pub fn aggregate_nodes(
    flights: &[GeoFlight],
    routes: &[RouteAggregate],
    countries: &CountryByStation,
) -> Vec<NodeAggregate> {
    let mut departures: HashMap<&str, Mean> = HashMap::new();
    let mut arrivals: HashMap<&str, Mean> = HashMap::new();
    for flight in flights {
        departures
            .entry(flight.origin.as_str())
            .or_default()
            .push(flight.delay);
        arrivals
            .entry(flight.destination.as_str())
            .or_default()
            .push(flight.delay);
    }

    let ends = routes
        .iter()
        .map(|r| (r.origin.as_str(), r.origin_coords))
        .chain(
            routes
                .iter()
                .map(|r| (r.destination.as_str(), r.destination_coords)),
        );

    let mut seen = HashSet::new();
    let mut nodes = Vec::new();
    for (code, coords) in ends {
        if !seen.insert(code) {
            continue;
        }
        let mut station = Mean::default();
        for side in [&departures, &arrivals] {
            if let Some(mean) = side.get(code).and_then(|m| m.value()) {
                station.push(mean);
            }
        }
        nodes.push(NodeAggregate {
            code: code.to_string(),
            coords,
            mean_delay: station.value().unwrap_or(f64::NAN),
            country: country_or_unknown(countries, code),
        });
    }
    nodes
}

/// Country for `code`, or [`UNKNOWN_COUNTRY`]
#[must_use]
pub fn country_or_unknown(countries: &CountryByStation, code: &str) -> String {
    countries
        .get(code)
        .cloned()
        .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string())
}

/// Vote counts for one station, in first-seen order
#[derive(Debug, Default)]
struct Ballot {
    votes: Vec<(String, usize)>,
}

impl Ballot {
    fn cast(&mut self, country: &str) {
        if let Some(entry) = self.votes.iter_mut().find(|(c, _)| c == country) {
            entry.1 += 1;
        } else {
            self.votes.push((country.to_string(), 1));
        }
    }

    /// Most frequent country; ties go to the one seen first
    fn winner(self) -> Option<String> {
        let mut best: Option<(String, usize)> = None;
        for (country, count) in self.votes {
            if best.as_ref().map_or(true, |(_, top)| count > *top) {
                best = Some((country, count));
            }
        }
        best.map(|(country, _)| country)
    }
}

/// Infer each station's country by majority vote
///
/// Every record votes `DEP_COUNTRY` for its origin and `ARR_COUNTRY` for its
/// destination; blank codes or countries are ignored. All departure votes are
/// counted before arrival votes, which decides ties.
#[must_use]
pub fn infer_countries<'a, I>(records: I) -> CountryByStation
where
    I: IntoIterator<Item = &'a FlightRecord>,
    I::IntoIter: Clone,
{
    let records = records.into_iter();
    let mut ballots: HashMap<&str, Ballot> = HashMap::new();

    let departures = records
        .clone()
        .map(|r| (r.origin.as_deref(), r.origin_country.as_deref()));
    let arrivals = records.map(|r| (r.destination.as_deref(), r.destination_country.as_deref()));

    for (code, country) in departures.chain(arrivals) {
        if let (Some(code), Some(country)) = (non_blank(code), non_blank(country)) {
            ballots.entry(code).or_default().cast(country);
        }
    }

    ballots
        .into_iter()
        .filter_map(|(code, ballot)| ballot.winner().map(|c| (code.to_string(), c)))
        .collect()
}
