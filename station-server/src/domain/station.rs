//! Battery-swap station records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Vending machine type code as stored with each station.
///
/// The store keeps this as a plain integer. Code `3` marks the
/// high-capacity "Super" stations; every other code renders as a
/// regular station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VmType(pub i64);

impl VmType {
    /// Code used for Super GoStation® machines.
    pub const SUPER: VmType = VmType(3);

    /// Whether this is a Super GoStation®.
    pub fn is_super(&self) -> bool {
        *self == Self::SUPER
    }

    /// Label shown to users.
    pub fn display_name(&self) -> &'static str {
        if self.is_super() {
            "Super GoStation®"
        } else {
            "GoStation®"
        }
    }
}

impl fmt::Display for VmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A station snapshot read from the store.
///
/// Stations carry no distance of their own; see
/// [`RankedStation`](crate::proximity::RankedStation) for the per-request
/// pairing with a query point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Street address
    pub address: String,

    /// City name
    pub city: String,

    /// District within the city
    pub district: String,

    /// Display name of the site (e.g. "台北信義店")
    pub location: String,

    /// Where the station is
    #[serde(flatten)]
    pub coordinate: Coordinate,

    /// Machine type code
    pub vm_type: VmType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn super_type_label() {
        assert!(VmType(3).is_super());
        assert_eq!(VmType(3).display_name(), "Super GoStation®");
        assert_eq!(VmType(3).to_string(), "Super GoStation®");
    }

    #[test]
    fn other_codes_are_regular() {
        for code in [0, 1, 2, 4, 99, -1] {
            let vm = VmType(code);
            assert!(!vm.is_super());
            assert_eq!(vm.display_name(), "GoStation®");
        }
    }

    #[test]
    fn station_json_shape() {
        let json = r#"{
            "address": "台北市信義區松仁路100號",
            "city": "台北市",
            "district": "信義區",
            "location": "信義松仁站",
            "latitude": 25.0339,
            "longitude": 121.5680,
            "vmType": 3
        }"#;

        let station: Station = serde_json::from_str(json).unwrap();
        assert_eq!(station.city, "台北市");
        assert_eq!(station.coordinate.latitude, 25.0339);
        assert_eq!(station.coordinate.longitude, 121.5680);
        assert!(station.vm_type.is_super());

        let value = serde_json::to_value(&station).unwrap();
        assert_eq!(value["vmType"], 3);
        assert_eq!(value["latitude"], 25.0339);
    }
}
