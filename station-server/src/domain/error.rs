//! Domain error types.
//!
//! These errors represent validation failures in the domain layer.
//! They are distinct from store, push and credential errors.

/// Error returned when building a `Coordinate` from invalid degrees.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum InvalidCoordinate {
    /// Latitude outside [-90, 90]
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),

    /// Longitude outside [-180, 180]
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),

    /// NaN or infinite value
    #[error("coordinate must be finite")]
    NotFinite,
}
