//! Flight-delay record model

use serde::Deserialize;

/// One row of the flight-delay CSV
///
/// Only the columns used by the charts are mapped; any other column in the file
/// is ignored. Empty cells deserialize to `None`, and so does a `target` that is
/// not a number.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FlightRecord {
    /// Departure station (IATA code)
    #[serde(rename = "DEPSTN", default)]
    pub origin: Option<String>,

    /// Arrival station (IATA code)
    #[serde(rename = "ARRSTN", default)]
    pub destination: Option<String>,

    /// Delay value used for filtering and aggregation
    #[serde(rename = "target", default, deserialize_with = "csv::invalid_option")]
    pub delay: Option<f64>,

    /// Country of the departure station
    #[serde(rename = "DEP_COUNTRY", default)]
    pub origin_country: Option<String>,

    /// Country of the arrival station
    #[serde(rename = "ARR_COUNTRY", default)]
    pub destination_country: Option<String>,
}

impl FlightRecord {
    /// Create a record with every field present
    #[must_use]
    pub fn new(origin: &str, destination: &str, delay: f64) -> Self {
        Self {
            origin: Some(origin.to_string()),
            destination: Some(destination.to_string()),
            delay: Some(delay),
            origin_country: None,
            destination_country: None,
        }
    }

    /// Attach departure/arrival countries
    #[must_use]
    pub fn with_countries(mut self, origin_country: &str, destination_country: &str) -> Self {
        self.origin_country = Some(origin_country.to_string());
        self.destination_country = Some(destination_country.to_string());
        self
    }

    /// Origin and destination codes, when both are present and non-blank
    #[must_use]
    pub fn stations(&self) -> Option<(&str, &str)> {
        let origin = non_blank(self.origin.as_deref())?;
        let destination = non_blank(self.destination.as_deref())?;
        Some((origin, destination))
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Open interval of delays that are kept for charting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayWindow {
    /// Exclusive lower bound
    pub min: f64,
    /// Exclusive upper bound
    pub max: f64,
}

impl DelayWindow {
    /// Delays strictly between 15 and 500
    pub const DEFAULT: Self = Self::new(15.0, 500.0);

    /// Create a window with exclusive bounds
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `delay` lies strictly inside the window
    #[must_use]
    pub fn contains(&self, delay: f64) -> bool {
        delay > self.min && delay < self.max
    }

    /// Whether the record has a delay inside the window
    #[must_use]
    pub fn accepts(&self, record: &FlightRecord) -> bool {
        record.delay.is_some_and(|d| self.contains(d))
    }
}

impl Default for DelayWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_bounds_are_exclusive() {
        let window = DelayWindow::DEFAULT;
        assert!(!window.contains(15.0));
        assert!(window.contains(15.5));
        assert!(window.contains(499.0));
        assert!(!window.contains(500.0));
        assert!(!window.contains(f64::NAN));
    }

    #[test]
    fn test_missing_delay_is_rejected() {
        let mut record = FlightRecord::new("TUN", "CDG", 60.0);
        assert!(DelayWindow::DEFAULT.accepts(&record));
        record.delay = None;
        assert!(!DelayWindow::DEFAULT.accepts(&record));
    }

    #[test]
    fn test_stations_require_both_codes() {
        let mut record = FlightRecord::new("TUN", "CDG", 60.0);
        assert_eq!(record.stations(), Some(("TUN", "CDG")));
        record.destination = Some("  ".to_string());
        assert_eq!(record.stations(), None);
    }
}
