//! Joined flights and the per-route / per-airport aggregates built from them

use super::Coordinates;

/// Country label for stations whose country could not be inferred
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// A delay-filtered flight whose both ends resolved to coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFlight {
    /// Departure station code
    pub origin: String,
    /// Arrival station code
    pub destination: String,
    /// Departure coordinates
    pub origin_coords: Coordinates,
    /// Arrival coordinates
    pub destination_coords: Coordinates,
    /// Delay value
    pub delay: f64,
}

/// Flights grouped by directed route
#[derive(Debug, Clone, PartialEq)]
pub struct RouteAggregate {
    /// Departure station code
    pub origin: String,
    /// Arrival station code
    pub destination: String,
    /// Departure coordinates
    pub origin_coords: Coordinates,
    /// Arrival coordinates
    pub destination_coords: Coordinates,
    /// Number of flights on the route
    pub flights: usize,
    /// Arithmetic mean delay over those flights
    pub mean_delay: f64,
}

impl RouteAggregate {
    /// Point halfway along the route
    #[must_use]
    pub fn midpoint(&self) -> Coordinates {
        self.origin_coords.midpoint(self.destination_coords)
    }
}

/// An airport as drawn on the route map
#[derive(Debug, Clone, PartialEq)]
pub struct NodeAggregate {
    /// Station code
    pub code: String,
    /// Marker position
    pub coords: Coordinates,
    /// Mean of the station's departure and arrival mean delays
    pub mean_delay: f64,
    /// Majority country, or [`UNKNOWN_COUNTRY`]
    pub country: String,
}
