//! Great-circle distance on a spherical Earth.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Mean Earth radius used by [`distance_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A single latitude/longitude fix in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Builds coordinates without range checks.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds coordinates, rejecting values outside `[-90, 90]` / `[-180, 180]`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinates`] for out-of-range or NaN input.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        let coords = Self::new(latitude, longitude);
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::InvalidCoordinates {
                latitude,
                longitude,
                reason: "latitude must be within [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::InvalidCoordinates {
                latitude,
                longitude,
                reason: "longitude must be within [-180, 180]",
            });
        }
        Ok(coords)
    }
}

/// Haversine distance between two fixes in kilometres.
///
/// Inputs are not validated; NaN propagates to the result.
#[must_use]
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `h` just past 1 for near-antipodal points.
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}
