//! CSV parsing for flight records and `airports.dat`

use crate::core::error::DataError;
use crate::core::models::flight::non_blank;
use crate::core::models::{Airport, AirportIndex, Coordinates, FlightRecord};
use crate::{debug, info};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Marker used by `airports.dat` for a missing value
const MISSING: &str = "\\N";

/// Column positions in the headerless `airports.dat` layout:
/// `airport_id, name, city, country, IATA, ICAO, latitude, longitude, altitude,
/// timezone, dst, tz_db, type, source`
mod column {
    pub const NAME: usize = 1;
    pub const IATA: usize = 4;
    pub const ICAO: usize = 5;
    pub const LATITUDE: usize = 6;
    pub const LONGITUDE: usize = 7;
}

/// Whether airport rows without usable coordinates are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatePolicy {
    /// Drop rows with missing latitude or longitude (route map)
    Required,
    /// Keep every row with a code (network diagram, which only needs names)
    Optional,
}

/// Load the flight-delay CSV at `path`
///
/// # Errors
/// Returns an error if the file cannot be opened or a row is malformed
pub fn load_flights<P: AsRef<Path>>(path: P) -> Result<Vec<FlightRecord>, DataError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let flights = parse_flights(file, path)?;
    info!("Loaded {} flight records from {}", flights.len(), path.display());
    Ok(flights)
}

/// Parse headered flight-delay CSV from any reader
///
/// `origin` only labels errors.
///
/// # Errors
/// Returns an error if a row cannot be parsed
pub fn parse_flights<R: Read>(reader: R, origin: &Path) -> Result<Vec<FlightRecord>, DataError> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    csv_reader
        .deserialize::<FlightRecord>()
        .map(|row| {
            row.map_err(|source| DataError::Csv {
                path: origin.to_path_buf(),
                source,
            })
        })
        .collect()
}

/// Load the airport reference file at `path`
///
/// # Errors
/// Returns an error if the file cannot be opened or is not valid CSV
pub fn load_airports<P: AsRef<Path>>(
    path: P,
    policy: CoordinatePolicy,
) -> Result<AirportIndex, DataError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let index = parse_airports(file, path, policy)?;
    info!("Loaded {} airports from {}", index.len(), path.display());
    Ok(index)
}

/// Parse headerless `airports.dat` rows from any reader
///
/// Rows without an IATA code are skipped, as are rows without coordinates
/// under [`CoordinatePolicy::Required`]. The first row for a code wins.
///
/// # Errors
/// Returns an error if the input is not valid CSV
pub fn parse_airports<R: Read>(
    reader: R,
    origin: &Path,
    policy: CoordinatePolicy,
) -> Result<AirportIndex, DataError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut index = AirportIndex::new();
    let mut skipped = 0usize;
    let mut duplicates = 0usize;

    for row in csv_reader.records() {
        let row = row.map_err(|source| DataError::Csv {
            path: origin.to_path_buf(),
            source,
        })?;

        let Some(airport) = parse_airport_row(&row) else {
            skipped += 1;
            continue;
        };
        if policy == CoordinatePolicy::Required && airport.coordinates.is_none() {
            skipped += 1;
            continue;
        }
        if !index.insert(airport) {
            duplicates += 1;
        }
    }

    debug!(
        "Airport file {}: {} kept, {skipped} skipped, {duplicates} duplicate codes",
        origin.display(),
        index.len()
    );
    Ok(index)
}

fn parse_airport_row(row: &StringRecord) -> Option<Airport> {
    let code = field(row, column::IATA)?.to_string();
    let text = |idx| field(row, idx).unwrap_or_default().to_string();

    let coordinates = match (
        parse_degrees(field(row, column::LATITUDE)),
        parse_degrees(field(row, column::LONGITUDE)),
    ) {
        (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
        _ => None,
    };

    Some(Airport {
        code,
        icao: field(row, column::ICAO).map(str::to_string),
        name: text(column::NAME),
        coordinates,
    })
}

/// A present, non-blank field that is not the `\N` marker
fn field(row: &StringRecord, idx: usize) -> Option<&str> {
    non_blank(row.get(idx)).filter(|v| *v != MISSING)
}

fn parse_degrees(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
