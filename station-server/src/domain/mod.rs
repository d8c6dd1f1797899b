//! Domain types for the station finder.
//!
//! Coordinates are validated at construction time, so code that receives
//! them from the webhook or store adapters can trust their range.

mod coordinate;
mod error;
mod station;

pub use coordinate::{BoundingBox, Coordinate};
pub use error::InvalidCoordinate;
pub use station::{Station, VmType};
