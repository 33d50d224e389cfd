//! Argument parsers for the command line.

use carbon_tracker_footprint_models::{DietType, InputError, TransportMode, check_range};
use carbon_tracker_geography::GeoPoint;

/// A transport entry given as `mode:km:trips`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordArg {
    pub mode: TransportMode,
    pub distance_km: f64,
    pub trips: u32,
}

/// Parses `mode:km:trips`, e.g. `short_haul_flight:800:2`.
///
/// # Errors
///
/// Returns a message naming the part that failed to parse.
pub fn parse_record(s: &str) -> Result<RecordArg, String> {
    let parts: Vec<&str> = s.split(':').map(str::trim).collect();
    let [mode, km, trips] = parts.as_slice() else {
        return Err(format!("expected mode:km:trips, got '{s}'"));
    };

    let mode: TransportMode = mode.parse().map_err(|_| {
        let known: Vec<&str> = TransportMode::all().iter().map(AsRef::as_ref).collect();
        format!("unknown mode '{mode}', expected one of {}", known.join(", "))
    })?;
    let distance_km: f64 = km
        .parse()
        .map_err(|_| format!("invalid distance '{km}'"))?;
    let trips: u32 = trips
        .parse()
        .map_err(|_| format!("invalid trip count '{trips}'"))?;

    Ok(RecordArg {
        mode,
        distance_km,
        trips,
    })
}

/// Parses a diet name such as `meat_heavy`.
///
/// # Errors
///
/// Returns a message listing the known diets.
pub fn parse_diet(s: &str) -> Result<DietType, String> {
    s.trim().parse().map_err(|_| {
        let known: Vec<&str> = DietType::all().iter().map(AsRef::as_ref).collect();
        format!("unknown diet '{s}', expected one of {}", known.join(", "))
    })
}

/// Parses `lat,lon` into a validated point.
///
/// # Errors
///
/// Returns a message if the format is wrong or a coordinate is out of range.
pub fn parse_point(s: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected lat,lon, got '{s}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{lat}'"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{lon}'"))?;
    GeoPoint::new(lat, lon).map_err(|e| e.to_string())
}

/// Rejects negative or non-finite quantities.
///
/// # Errors
///
/// Returns [`InputError`] if the value is negative or not finite.
pub fn non_negative(field: &'static str, value: f64) -> Result<f64, InputError> {
    check_range(field, value, 0.0, f64::MAX)
}
