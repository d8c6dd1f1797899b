//! Nearest-station matching.
//!
//! Answers "which stations are closest to where I am standing?" in two
//! phases: the store narrows candidates with a bounding box, then this
//! module re-ranks them by exact great-circle distance and keeps the
//! nearest few. Store order is never trusted as the final order.

mod config;
mod distance;
mod rank;

pub use config::{DEFAULT_MARGIN_DEGREES, DEFAULT_TOP_K, MatcherConfig};
pub use distance::{EARTH_RADIUS_KM, distance_km};
pub use rank::{MatchOutcome, RankedStation, nearest, rank_by_distance};
