//! Readers for the flight-delay CSV and the airport reference file

pub mod csv_parser;

pub use csv_parser::{load_airports, load_flights, parse_airports, parse_flights, CoordinatePolicy};
