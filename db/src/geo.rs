//! Proximity validation for self-service attendance marking.
//!
//! Pure functions, no I/O. A student's reported position is admitted when its
//! great-circle distance to the classroom anchor is within the configured
//! radius (inclusive).

use crate::error::AttendanceError;

/// Mean Earth radius in metres, as used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Admission radius applied when no override is configured.
pub const DEFAULT_RADIUS_M: f64 = 20.0;

/// Outcome of a proximity check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    pub admitted: bool,
    pub distance_m: f64,
}

/// Rejects coordinates outside the valid latitude/longitude ranges.
pub fn check_coordinates(lat: f64, lon: f64) -> Result<(), AttendanceError> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(AttendanceError::InvalidCoordinates);
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(AttendanceError::InvalidCoordinates);
    }
    Ok(())
}

/// Great-circle distance in metres between two coordinate pairs (haversine).
pub fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Decides admit/reject for a reported position against a classroom anchor.
///
/// The boundary is inclusive: a position exactly `radius_m` away is admitted.
pub fn validate(
    class_lat: f64,
    class_lon: f64,
    reported_lat: f64,
    reported_lon: f64,
    radius_m: f64,
) -> Result<Proximity, AttendanceError> {
    check_coordinates(class_lat, class_lon)?;
    check_coordinates(reported_lat, reported_lon)?;

    let distance_m = haversine_distance_m(class_lat, class_lon, reported_lat, reported_lon);
    Ok(Proximity {
        admitted: distance_m <= radius_m,
        distance_m,
    })
}
