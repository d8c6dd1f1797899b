//! Geographic coordinate types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::proximity::distance_km;

use super::error::InvalidCoordinate;

/// A WGS84 position in decimal degrees.
///
/// `Coordinate::new` guarantees latitude in [-90, 90] and longitude in
/// [-180, 180]. The fields stay public so fixtures and tests can build
/// values directly; distance maths never validates its inputs.
///
/// # Examples
///
/// ```
/// use station_server::domain::Coordinate;
///
/// let taipei = Coordinate::new(25.0478, 121.5170).unwrap();
/// assert_eq!(taipei.latitude, 25.0478);
///
/// // Out of range is rejected
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// assert!(Coordinate::new(0.0, -181.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range degrees.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(InvalidCoordinate::NotFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidCoordinate::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinate::Longitude(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance_km(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    /// The box spanning `margin_degrees` on every side of this point.
    pub fn bounding_box(&self, margin_degrees: f64) -> BoundingBox {
        BoundingBox::around(*self, margin_degrees)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// Latitude/longitude rectangle used to narrow store queries.
///
/// Bounds are inclusive. The box does not wrap across the antimeridian;
/// longitudes are clamped to [-180, 180] instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    /// Build the box centred on `center` with the given margin in degrees.
    pub fn around(center: Coordinate, margin_degrees: f64) -> Self {
        let margin = margin_degrees.abs();
        Self {
            min_latitude: (center.latitude - margin).max(-90.0),
            max_latitude: (center.latitude + margin).min(90.0),
            min_longitude: (center.longitude - margin).max(-180.0),
            max_longitude: (center.longitude + margin).min(180.0),
        }
    }

    /// Whether `point` lies inside the box (edges included).
    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&point.latitude)
            && (self.min_longitude..=self.max_longitude).contains(&point.longitude)
    }
}
