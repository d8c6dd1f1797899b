//! Distance ranking for candidate stations.

use crate::domain::{Coordinate, Station};

use super::config::MatcherConfig;

/// A station paired with its distance from the query point.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedStation {
    /// The station snapshot.
    pub station: Station,
    /// Great-circle distance from the query point, in kilometres.
    pub distance_km: f64,
}

/// Result of matching a query point against store candidates.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// Exactly `top_k` stations, nearest first.
    Nearby(Vec<RankedStation>),

    /// Fewer than `top_k` candidates were available.
    ///
    /// This is a normal business outcome, answered with the fallback reply.
    NoNearbyStations {
        /// How many candidates the store returned.
        candidates: usize,
    },
}

impl MatchOutcome {
    /// The matched stations, or an empty slice for the fallback case.
    pub fn stations(&self) -> &[RankedStation] {
        match self {
            MatchOutcome::Nearby(stations) => stations,
            MatchOutcome::NoNearbyStations { .. } => &[],
        }
    }
}

/// Rank stations by distance from `origin`.
///
/// Returns every candidate sorted nearest-first. The sort is stable, so
/// equidistant stations keep the order the store returned them in.
pub fn rank_by_distance(origin: Coordinate, candidates: Vec<Station>) -> Vec<RankedStation> {
    let mut ranked: Vec<RankedStation> = candidates
        .into_iter()
        .map(|station| RankedStation {
            distance_km: origin.distance_to(&station.coordinate),
            station,
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

/// Pick the `config.top_k` stations nearest to `origin`.
///
/// Candidates are expected to be pre-filtered by the store. Anything short
/// of `top_k` candidates, including none, yields
/// [`MatchOutcome::NoNearbyStations`].
pub fn nearest(
    origin: Coordinate,
    candidates: Vec<Station>,
    config: &MatcherConfig,
) -> MatchOutcome {
    let count = candidates.len();
    if count < config.top_k {
        return MatchOutcome::NoNearbyStations { candidates: count };
    }

    let mut ranked = rank_by_distance(origin, candidates);
    ranked.truncate(config.top_k);
    MatchOutcome::Nearby(ranked)
}
