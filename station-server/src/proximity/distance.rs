//! Great-circle distance.

/// Mean Earth radius used by the haversine formula, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two points given in degrees.
///
/// Inputs are not validated: out-of-range degrees still produce a finite,
/// if meaningless, result.
///
/// ```
/// use station_server::proximity::distance_km;
///
/// let d = distance_km(19.427050, -99.127571, 20.673590, -103.343803);
/// assert!((d - 461.7).abs() < 0.1);
/// ```
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn latitude() -> impl Strategy<Value = f64> {
        -90.0..=90.0f64
    }

    fn longitude() -> impl Strategy<Value = f64> {
        -180.0..=180.0f64
    }

    proptest! {
        /// A point is zero kilometres from itself
        #[test]
        fn identity_is_zero(lat in latitude(), lon in longitude()) {
            prop_assert!(distance_km(lat, lon, lat, lon).abs() < 1e-9);
        }

        /// Distance does not depend on argument order
        #[test]
        fn symmetric(
            lat1 in latitude(), lon1 in longitude(),
            lat2 in latitude(), lon2 in longitude(),
        ) {
            let ab = distance_km(lat1, lon1, lat2, lon2);
            let ba = distance_km(lat2, lon2, lat1, lon1);
            prop_assert!((ab - ba).abs() < 1e-6);
        }

        /// Never negative, never beyond half the circumference
        #[test]
        fn bounded(
            lat1 in latitude(), lon1 in longitude(),
            lat2 in latitude(), lon2 in longitude(),
        ) {
            let d = distance_km(lat1, lon1, lat2, lon2);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        }
    }
}
