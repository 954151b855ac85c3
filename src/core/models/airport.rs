//! Airport reference model

use std::collections::HashMap;

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

impl Coordinates {
    /// Create a coordinate pair
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Arithmetic midpoint between two points (used to anchor route hover markers)
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self {
            lat: (self.lat + other.lat) / 2.0,
            lon: (self.lon + other.lon) / 2.0,
        }
    }
}

/// An airport from the reference file
#[derive(Debug, Clone, PartialEq)]
pub struct Airport {
    /// IATA code (e.g. "TUN")
    pub code: String,
    /// ICAO code, when known
    pub icao: Option<String>,
    /// Airport name
    pub name: String,
    /// Location, when the row had usable coordinates
    pub coordinates: Option<Coordinates>,
}

/// Airports keyed by IATA code; the first row for a code wins
#[derive(Debug, Clone, Default)]
pub struct AirportIndex {
    by_code: HashMap<String, Airport>,
}

impl AirportIndex {
    /// Create an empty index
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an airport unless its code is already present.
    /// Returns `false` for a duplicate.
    pub fn insert(&mut self, airport: Airport) -> bool {
        if self.by_code.contains_key(&airport.code) {
            return false;
        }
        self.by_code.insert(airport.code.clone(), airport);
        true
    }

    /// Look up an airport by IATA code
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Airport> {
        self.by_code.get(code)
    }

    /// Coordinates for an IATA code, if the airport is known and located
    #[must_use]
    pub fn coordinates(&self, code: &str) -> Option<Coordinates> {
        self.get(code).and_then(|a| a.coordinates)
    }

    /// Number of distinct codes
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    /// Whether the index holds no airports
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl FromIterator<Airport> for AirportIndex {
    fn from_iter<I: IntoIterator<Item = Airport>>(iter: I) -> Self {
        let mut index = Self::new();
        for airport in iter {
            index.insert(airport);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport(code: &str, name: &str) -> Airport {
        Airport {
            code: code.to_string(),
            icao: None,
            name: name.to_string(),
            coordinates: Some(Coordinates::new(36.85, 10.22)),
        }
    }

    #[test]
    fn test_first_duplicate_wins() {
        let index: AirportIndex = vec![airport("TUN", "Carthage"), airport("TUN", "Other")]
            .into_iter()
            .collect();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("TUN").unwrap().name, "Carthage");
    }

    #[test]
    fn test_midpoint() {
        let mid = Coordinates::new(0.0, 10.0).midpoint(Coordinates::new(10.0, 20.0));
        assert_eq!(mid, Coordinates::new(5.0, 15.0));
    }
}
