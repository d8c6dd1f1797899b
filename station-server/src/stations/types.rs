//! Firestore REST DTOs.
//!
//! These types map directly to the `documents:runQuery` request and
//! response bodies. Field values arrive wrapped in a one-key object
//! naming their type (`{"doubleValue": 25.03}`), and 64-bit integers are
//! sent as strings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{BoundingBox, Coordinate, Station, VmType};

use super::error::StoreError;

/// A typed Firestore value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    StringValue(String),
    DoubleValue(f64),
    IntegerValue(String),
    BooleanValue(bool),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::StringValue(_) => "stringValue",
            Value::DoubleValue(_) => "doubleValue",
            Value::IntegerValue(_) => "integerValue",
            Value::BooleanValue(_) => "booleanValue",
        }
    }
}

/// Equality filter on the station's operational-status field.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusFilter {
    /// Document field holding the status code
    pub field: String,
    /// Code of operational stations
    pub value: i64,
}

impl StatusFilter {
    pub fn new(field: impl Into<String>, value: i64) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self::new("state", 1)
    }
}

/// Body of a `runQuery` request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRequest {
    pub structured_query: StructuredQuery,
}

#[derive(Debug, Serialize)]
pub struct StructuredQuery {
    pub from: Vec<CollectionSelector>,
    #[serde(rename = "where")]
    pub filter: Filter,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSelector {
    pub collection_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub composite_filter: CompositeFilter,
}

#[derive(Debug, Serialize)]
pub struct CompositeFilter {
    pub op: &'static str,
    pub filters: Vec<FieldFilterItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFilterItem {
    pub field_filter: FieldFilter,
}

#[derive(Debug, Serialize)]
pub struct FieldFilter {
    pub field: FieldReference,
    pub op: &'static str,
    pub value: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReference {
    pub field_path: String,
}

impl FieldFilterItem {
    fn new(field: &str, op: &'static str, value: Value) -> Self {
        Self {
            field_filter: FieldFilter {
                field: FieldReference {
                    field_path: field.to_string(),
                },
                op,
                value,
            },
        }
    }
}

impl RunQueryRequest {
    /// Stations in `collection` inside `bounds` whose status matches.
    pub fn stations_within(collection: &str, bounds: &BoundingBox, status: &StatusFilter) -> Self {
        let filters = vec![
            FieldFilterItem::new(
                "latitude",
                "GREATER_THAN_OR_EQUAL",
                Value::DoubleValue(bounds.min_latitude),
            ),
            FieldFilterItem::new(
                "latitude",
                "LESS_THAN_OR_EQUAL",
                Value::DoubleValue(bounds.max_latitude),
            ),
            FieldFilterItem::new(
                "longitude",
                "GREATER_THAN_OR_EQUAL",
                Value::DoubleValue(bounds.min_longitude),
            ),
            FieldFilterItem::new(
                "longitude",
                "LESS_THAN_OR_EQUAL",
                Value::DoubleValue(bounds.max_longitude),
            ),
            FieldFilterItem::new(
                &status.field,
                "EQUAL",
                Value::IntegerValue(status.value.to_string()),
            ),
        ];

        Self {
            structured_query: StructuredQuery {
                from: vec![CollectionSelector {
                    collection_id: collection.to_string(),
                }],
                filter: Filter {
                    composite_filter: CompositeFilter { op: "AND", filters },
                },
            },
        }
    }
}

/// One element of the streamed `runQuery` response array.
///
/// Progress-only elements carry no document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryResponseItem {
    pub document: Option<Document>,
}

/// A stored document.
///
/// Fields stay untyped until [`Document::into_station`] picks out the ones
/// a station needs, so unrelated fields of other types are ignored.
#[derive(Debug, Deserialize)]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, serde_json::Value>,
}

impl Document {
    /// Decode the station fields, failing on the first missing or mistyped one.
    pub fn into_station(self) -> Result<Station, StoreError> {
        let latitude = self.double("latitude")?;
        let longitude = self.double("longitude")?;
        let coordinate = Coordinate::new(latitude, longitude)
            .map_err(|e| self.field_error("latitude/longitude", e.to_string()))?;

        Ok(Station {
            address: self.string("address")?,
            city: self.string("city")?,
            district: self.string("district")?,
            location: self.string("location")?,
            coordinate,
            vm_type: VmType(self.integer("vmType")?),
        })
    }

    fn value(&self, field: &str) -> Result<Value, StoreError> {
        let raw = self
            .fields
            .get(field)
            .ok_or_else(|| self.field_error(field, "missing".to_string()))?;

        serde_json::from_value(raw.clone())
            .map_err(|e| self.field_error(field, format!("unsupported value: {e}")))
    }

    fn string(&self, field: &str) -> Result<String, StoreError> {
        match self.value(field)? {
            Value::StringValue(s) => Ok(s),
            other => Err(self.mismatch(field, "stringValue", &other)),
        }
    }

    fn double(&self, field: &str) -> Result<f64, StoreError> {
        match self.value(field)? {
            Value::DoubleValue(d) => Ok(d),
            other => Err(self.mismatch(field, "doubleValue", &other)),
        }
    }

    fn integer(&self, field: &str) -> Result<i64, StoreError> {
        match self.value(field)? {
            Value::IntegerValue(s) => s
                .parse()
                .map_err(|_| self.field_error(field, format!("invalid integer {s:?}"))),
            other => Err(self.mismatch(field, "integerValue", &other)),
        }
    }

    fn mismatch(&self, field: &str, expected: &str, found: &Value) -> StoreError {
        self.field_error(
            field,
            format!("expected {expected}, found {}", found.kind()),
        )
    }

    fn field_error(&self, field: &str, message: String) -> StoreError {
        StoreError::Field {
            document: self.name.clone(),
            field: field.to_string(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn document(fields: serde_json::Value) -> Document {
        serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/stations/s1",
            "fields": fields,
        }))
        .unwrap()
    }

    fn station_fields() -> serde_json::Value {
        json!({
            "address": {"stringValue": "台北市信義區松仁路100號"},
            "city": {"stringValue": "台北市"},
            "district": {"stringValue": "信義區"},
            "location": {"stringValue": "信義松仁站"},
            "latitude": {"doubleValue": 25.0339},
            "longitude": {"doubleValue": 121.568},
            "vmType": {"integerValue": "3"},
            "state": {"integerValue": "1"},
            "updatedAt": {"timestampValue": "2024-05-01T00:00:00Z"}
        })
    }

    #[test]
    fn decodes_station() {
        let station = document(station_fields()).into_station().unwrap();

        assert_eq!(station.location, "信義松仁站");
        assert_eq!(station.district, "信義區");
        assert_eq!(station.coordinate.latitude, 25.0339);
        assert_eq!(station.vm_type, VmType(3));
    }

    #[test]
    fn missing_field_fails() {
        let mut fields = station_fields();
        fields.as_object_mut().unwrap().remove("city");

        let err = document(fields).into_station().unwrap_err();
        assert!(matches!(err, StoreError::Field { ref field, .. } if field == "city"));
    }

    #[test]
    fn mistyped_field_fails() {
        let mut fields = station_fields();
        fields["latitude"] = json!({"stringValue": "25.03"});

        let err = document(fields).into_station().unwrap_err();
        assert_eq!(
            err.to_string(),
            "document projects/p/databases/(default)/documents/stations/s1: \
             field latitude: expected doubleValue, found stringValue"
        );
    }

    #[test]
    fn unparseable_integer_fails() {
        let mut fields = station_fields();
        fields["vmType"] = json!({"integerValue": "three"});

        let err = document(fields).into_station().unwrap_err();
        assert!(matches!(err, StoreError::Field { ref field, .. } if field == "vmType"));
    }

    #[test]
    fn out_of_range_coordinate_fails() {
        let mut fields = station_fields();
        fields["latitude"] = json!({"doubleValue": 125.0});

        assert!(document(fields).into_station().is_err());
    }

    #[test]
    fn query_body_shape() {
        let bounds = BoundingBox {
            min_latitude: 24.9,
            max_latitude: 25.1,
            min_longitude: 121.4,
            max_longitude: 121.6,
        };
        let status = StatusFilter::default();
        let request = RunQueryRequest::stations_within("stations", &bounds, &status);
        let body = serde_json::to_value(&request).unwrap();

        let query = &body["structuredQuery"];
        assert_eq!(query["from"][0]["collectionId"], "stations");
        assert_eq!(query["where"]["compositeFilter"]["op"], "AND");

        let filters = query["where"]["compositeFilter"]["filters"]
            .as_array()
            .unwrap();
        assert_eq!(filters.len(), 5);
        assert_eq!(
            filters[0],
            json!({"fieldFilter": {
                "field": {"fieldPath": "latitude"},
                "op": "GREATER_THAN_OR_EQUAL",
                "value": {"doubleValue": 24.9}
            }})
        );
        assert_eq!(filters[3]["fieldFilter"]["op"], "LESS_THAN_OR_EQUAL");
        assert_eq!(filters[3]["fieldFilter"]["value"]["doubleValue"], 121.6);
        assert_eq!(
            filters[4],
            json!({"fieldFilter": {
                "field": {"fieldPath": "state"},
                "op": "EQUAL",
                "value": {"integerValue": "1"}
            }})
        );
    }

    #[test]
    fn response_items_without_document() {
        let items: Vec<RunQueryResponseItem> =
            serde_json::from_str(r#"[{"readTime":"2024-05-01T00:00:00Z"}]"#).unwrap();
        assert!(items[0].document.is_none());
    }
}
