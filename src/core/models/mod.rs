//! Data models for `delay-atlas`

pub mod airport;
pub mod flight;
pub mod route;

pub use airport::{Airport, AirportIndex, Coordinates};
pub use flight::{DelayWindow, FlightRecord};
pub use route::{GeoFlight, NodeAggregate, RouteAggregate, UNKNOWN_COUNTRY};
