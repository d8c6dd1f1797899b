//! Matcher configuration.

use crate::domain::{BoundingBox, Coordinate};

/// Default number of stations presented to the user.
pub const DEFAULT_TOP_K: usize = 3;

/// Default bounding-box margin in degrees (roughly 3.5–3.9 km).
pub const DEFAULT_MARGIN_DEGREES: f64 = 0.035;

/// Configuration parameters for nearest-station matching.
#[derive(Debug, Clone, PartialEq)]
pub struct MatcherConfig {
    /// How many stations a successful match returns.
    /// Fewer candidates than this produce the fallback reply.
    pub top_k: usize,

    /// Half-width of the retrieval box in degrees.
    /// Too small a margin can hide true nearest stations from the store query.
    pub margin_degrees: f64,
}

impl MatcherConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(top_k: usize, margin_degrees: f64) -> Self {
        Self {
            top_k,
            margin_degrees,
        }
    }

    /// Set a custom margin.
    pub fn with_margin(mut self, margin_degrees: f64) -> Self {
        self.margin_degrees = margin_degrees;
        self
    }

    /// The store query box around `origin`.
    pub fn bounding_box(&self, origin: Coordinate) -> BoundingBox {
        origin.bounding_box(self.margin_degrees)
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            margin_degrees: DEFAULT_MARGIN_DEGREES,
        }
    }
}
