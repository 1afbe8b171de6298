//! GeoJSON feature collections for the choropleth panels.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::info;

use dash_model::{DashError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    #[serde(default)]
    pub properties: Map<String, JsonValue>,
    #[serde(default)]
    pub geometry: JsonValue,
}

fn feature_type() -> String {
    "Feature".to_string()
}

impl Feature {
    /// The `name` property used to join dataset rows onto the feature.
    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(JsonValue::as_str)
    }

    pub fn number(&self, property: &str) -> Option<f64> {
        self.properties.get(property).and_then(JsonValue::as_f64)
    }

    pub fn set_number(&mut self, property: &str, value: f64) {
        let json = serde_json::Number::from_f64(value).map_or(JsonValue::Null, JsonValue::Number);
        self.properties.insert(property.to_string(), json);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name() == Some(name))
    }
}

pub fn parse_feature_collection(text: &str) -> Result<FeatureCollection> {
    let collection: FeatureCollection =
        serde_json::from_str(text).map_err(|e| DashError::unavailable("<geojson>", e))?;
    if collection.kind != "FeatureCollection" {
        return Err(DashError::SchemaMismatch {
            field: "type".to_string(),
            detail: format!("expected FeatureCollection, found {}", collection.kind),
        });
    }
    Ok(collection)
}

pub fn load_feature_collection(path: &Path) -> Result<FeatureCollection> {
    let text = std::fs::read_to_string(path).map_err(|e| DashError::unavailable(path, e))?;
    let collection = parse_feature_collection(&text).map_err(|e| match e {
        DashError::DataUnavailable { reason, .. } => DashError::unavailable(path, reason),
        other => other,
    })?;
    info!(
        path = %path.display(),
        feature_count = collection.features.len(),
        "feature collection loaded"
    );
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "Ohio"}, "geometry": null},
            {"type": "Feature", "properties": {"name": "Utah", "density": 39.9}, "geometry": null}
        ]
    }"#;

    #[test]
    fn parses_features_by_name() {
        let collection = parse_feature_collection(SAMPLE).expect("parse");
        assert_eq!(collection.features.len(), 2);
        let utah = collection.feature("Utah").expect("utah");
        assert_eq!(utah.number("density"), Some(39.9));
        assert!(collection.feature("Iowa").is_none());
    }

    #[test]
    fn rejects_non_collections() {
        let err = parse_feature_collection(r#"{"type": "Feature", "features": []}"#)
            .expect_err("not a collection");
        assert!(matches!(err, DashError::SchemaMismatch { .. }));
    }

    #[test]
    fn numbers_round_trip_through_properties() {
        let mut collection = parse_feature_collection(SAMPLE).expect("parse");
        collection.features[0].set_number("unemployment2024", 4.2);
        assert_eq!(collection.features[0].number("unemployment2024"), Some(4.2));
    }
}
