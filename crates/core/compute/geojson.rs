//! GeoJSON glue: region bounding boxes, travel paths and grid cell output.

use crate::compute::area::approx_area_km2;
use crate::compute::densify::densify;
use crate::compute::validation::bounding_box;
use crate::error::{CellpathError, Result};
use cellpath_types::bbox::{BoundingBox, GridCell};
use cellpath_types::geo::GeoPoint;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use serde_json::Map;

/// Reads the top-level `bbox` member, `[min_lon, min_lat, max_lon, max_lat]`.
///
/// Any JSON object is accepted; only the `bbox` member is inspected.
///
/// # Errors
///
/// `MissingBoundingBox` if there is no `bbox`, `InvalidInput` if it does not
/// hold exactly four numbers or describes an invalid box.
pub fn bbox_from_geojson(geojson: &str) -> Result<BoundingBox> {
    let doc: serde_json::Value = serde_json::from_str(geojson)
        .map_err(|e| CellpathError::GeoJson(format!("Failed to parse GeoJSON: {}", e)))?;

    let raw = doc.get("bbox").ok_or(CellpathError::MissingBoundingBox)?;
    let values = raw
        .as_array()
        .ok_or_else(|| CellpathError::InvalidInput("bbox must be an array".to_string()))?;

    if values.len() != 4 {
        return Err(CellpathError::InvalidInput(format!(
            "bbox must have 4 values, got {}",
            values.len()
        )));
    }

    let mut corners = [0.0; 4];
    for (slot, value) in corners.iter_mut().zip(values) {
        *slot = value.as_f64().ok_or_else(|| {
            CellpathError::InvalidInput(format!("bbox value is not a number: {}", value))
        })?;
    }

    let [min_lon, min_lat, max_lon, max_lat] = corners;
    bounding_box(min_lon, min_lat, max_lon, max_lat)
}

/// The first LineString in a document, as a path.
///
/// Accepts a bare LineString geometry, a Feature, or a FeatureCollection (the
/// first feature carrying a LineString wins).
pub fn path_from_geojson(geojson: &str) -> Result<Vec<GeoPoint>> {
    let doc = parse(geojson)?;
    let positions = linestring_geometries(&doc)
        .into_iter()
        .next()
        .ok_or_else(|| CellpathError::GeoJson("No LineString geometry found".to_string()))?;
    positions_to_path(positions)
}

/// Every LineString in a document, in document order.
pub fn linestrings_from_geojson(geojson: &str) -> Result<Vec<Vec<GeoPoint>>> {
    let doc = parse(geojson)?;
    linestring_geometries(&doc)
        .into_iter()
        .map(|positions| positions_to_path(positions))
        .collect()
}

/// Densify every LineString geometry in place and re-serialize the document.
///
/// Rewritten LineStrings are 2D: positions come back as `[lon, lat]` and any
/// altitude or other extra ordinate is dropped. Other geometries,
/// properties and foreign members are left untouched.
pub fn densify_geojson(geojson: &str, interval_meters: f64) -> Result<String> {
    let mut doc = parse(geojson)?;

    match &mut doc {
        GeoJson::Geometry(geometry) => densify_geometry(geometry, interval_meters)?,
        GeoJson::Feature(feature) => {
            if let Some(geometry) = feature.geometry.as_mut() {
                densify_geometry(geometry, interval_meters)?;
            }
        }
        GeoJson::FeatureCollection(collection) => {
            for feature in collection.features.iter_mut() {
                if let Some(geometry) = feature.geometry.as_mut() {
                    densify_geometry(geometry, interval_meters)?;
                }
            }
        }
    }

    serde_json::to_string_pretty(&doc).map_err(|e| {
        CellpathError::Serialization(format!("Failed to serialize densified GeoJSON: {}", e))
    })
}

/// Converts a path to a LineString geometry.
pub fn path_to_geometry(path: &[GeoPoint]) -> Geometry {
    Geometry::new(Value::LineString(
        path.iter().map(|p| vec![p.lon(), p.lat()]).collect(),
    ))
}

/// Grid cells as a FeatureCollection of rectangles.
///
/// Each feature carries its `bbox` plus `index`, `depth` and `area_km2`
/// properties.
pub fn cells_to_feature_collection(cells: &[GridCell]) -> Result<String> {
    let features: Vec<Feature> = cells
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let b = &cell.bbox;
            let polygon: geo::Polygon<f64> = b.rect.to_polygon();
            let ring: Vec<Vec<f64>> = polygon
                .exterior()
                .coords()
                .map(|c| vec![c.x, c.y])
                .collect();

            let mut props = Map::new();
            props.insert("index".to_string(), index.into());
            props.insert("depth".to_string(), cell.depth.into());
            props.insert("area_km2".to_string(), approx_area_km2(b).into());

            Feature {
                bbox: Some(b.to_geojson_bbox().to_vec()),
                geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
                id: None,
                properties: Some(props),
                foreign_members: None,
            }
        })
        .collect();

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    serde_json::to_string(&collection).map_err(|e| {
        CellpathError::Serialization(format!("Failed to serialize grid cells: {}", e))
    })
}

fn parse(geojson: &str) -> Result<GeoJson> {
    geojson
        .parse::<GeoJson>()
        .map_err(|e| CellpathError::GeoJson(format!("Failed to parse GeoJSON: {}", e)))
}

fn linestring_geometries(doc: &GeoJson) -> Vec<&Vec<Vec<f64>>> {
    fn positions(geometry: Option<&Geometry>) -> Option<&Vec<Vec<f64>>> {
        match geometry.map(|g| &g.value) {
            Some(Value::LineString(positions)) => Some(positions),
            _ => None,
        }
    }

    match doc {
        GeoJson::Geometry(geometry) => positions(Some(geometry)).into_iter().collect(),
        GeoJson::Feature(feature) => positions(feature.geometry.as_ref()).into_iter().collect(),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .iter()
            .filter_map(|f| positions(f.geometry.as_ref()))
            .collect(),
    }
}

fn positions_to_path(positions: &[Vec<f64>]) -> Result<Vec<GeoPoint>> {
    positions
        .iter()
        .enumerate()
        .map(|(idx, coords)| {
            if coords.len() < 2 {
                return Err(CellpathError::InvalidInput(format!(
                    "Position at index {} must have at least 2 coordinates, got {}",
                    idx,
                    coords.len()
                )));
            }
            Ok(GeoPoint::new(coords[0], coords[1]))
        })
        .collect()
}

fn densify_geometry(geometry: &mut Geometry, interval_meters: f64) -> Result<()> {
    if let Value::LineString(positions) = &geometry.value {
        let path = positions_to_path(positions)?;
        let dense = densify(&path, interval_meters)?;
        geometry.value = path_to_geometry(&dense).value;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTE: &str = r#"{
        "type": "FeatureCollection",
        "bbox": [77.50, 12.90, 77.70, 13.05],
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "marker"},
                "geometry": {"type": "Point", "coordinates": [77.6, 12.95]}
            },
            {
                "type": "Feature",
                "properties": {"name": "commute"},
                "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [0.0, 0.01]]}
            }
        ]
    }"#;

    #[test]
    fn test_bbox_from_geojson() {
        let bbox = bbox_from_geojson(ROUTE).unwrap();
        assert_eq!(bbox.min_lon(), 77.50);
        assert_eq!(bbox.min_lat(), 12.90);
        assert_eq!(bbox.max_lon(), 77.70);
        assert_eq!(bbox.max_lat(), 13.05);
    }

    #[test]
    fn test_bbox_missing() {
        let err = bbox_from_geojson(r#"{"type":"FeatureCollection","features":[]}"#).unwrap_err();
        assert!(matches!(err, CellpathError::MissingBoundingBox));
    }

    #[test]
    fn test_bbox_wrong_length_or_type() {
        assert!(matches!(
            bbox_from_geojson(r#"{"bbox":[1.0, 2.0, 3.0]}"#),
            Err(CellpathError::InvalidInput(_))
        ));
        assert!(matches!(
            bbox_from_geojson(r#"{"bbox":[1.0, "2", 3.0, 4.0]}"#),
            Err(CellpathError::InvalidInput(_))
        ));
        assert!(bbox_from_geojson("not json").is_err());
    }

    #[test]
    fn test_path_from_feature_collection_skips_non_lines() {
        let path = path_from_geojson(ROUTE).unwrap();
        assert_eq!(path, vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.01)]);
    }

    #[test]
    fn test_path_from_bare_geometry() {
        let path = path_from_geojson(
            r#"{"type":"LineString","coordinates":[[1.0,2.0],[3.0,4.0,100.0]]}"#,
        )
        .unwrap();
        assert_eq!(path, vec![GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)]);
    }

    #[test]
    fn test_path_without_linestring() {
        let err = path_from_geojson(r#"{"type":"Point","coordinates":[1.0,2.0]}"#).unwrap_err();
        assert!(matches!(err, CellpathError::GeoJson(_)));
    }

    #[test]
    fn test_positions_need_two_values() {
        let positions = vec![vec![1.0, 2.0], vec![3.0]];
        let err = positions_to_path(&positions).unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_densify_geojson_keeps_other_features() {
        let out = densify_geojson(ROUTE, 500.0).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&out).unwrap();

        let features = doc["features"].as_array().unwrap();
        assert_eq!(features[0]["geometry"]["type"], "Point");
        assert_eq!(features[1]["properties"]["name"], "commute");
        let coords = features[1]["geometry"]["coordinates"].as_array().unwrap();
        assert_eq!(coords.len(), 4);
        assert_eq!(coords[3], serde_json::json!([0.0, 0.01]));
    }

    #[test]
    fn test_densify_geojson_output_is_2d() {
        let doc = r#"{"type":"LineString","coordinates":[[0.0,0.0,120.0],[0.0,0.01,135.0]]}"#;
        let out: serde_json::Value =
            serde_json::from_str(&densify_geojson(doc, 500.0).unwrap()).unwrap();
        let coords = out["coordinates"].as_array().unwrap();

        assert_eq!(coords.len(), 4);
        assert!(coords.iter().all(|c| c.as_array().unwrap().len() == 2));
        assert_eq!(coords[0], serde_json::json!([0.0, 0.0]));
        assert_eq!(coords[3], serde_json::json!([0.0, 0.01]));
    }

    #[test]
    fn test_linestrings_in_order() {
        let doc = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type":"Feature","properties":null,"geometry":{"type":"LineString","coordinates":[[0,0],[1,1]]}},
                {"type":"Feature","properties":null,"geometry":null},
                {"type":"Feature","properties":null,"geometry":{"type":"LineString","coordinates":[[2,2]]}}
            ]
        }"#;
        let lines = linestrings_from_geojson(doc).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], vec![GeoPoint::new(2.0, 2.0)]);
    }

    #[test]
    fn test_cells_to_feature_collection() {
        let cells = vec![
            GridCell::new(BoundingBox::new(0.0, 0.0, 0.01, 0.01), 0),
            GridCell::new(BoundingBox::new(0.01, 0.0, 0.02, 0.01), 2),
        ];
        let json = cells_to_feature_collection(&cells).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(doc["type"], "FeatureCollection");
        let features = doc["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[1]["properties"]["depth"], 2);
        assert_eq!(features[1]["bbox"], serde_json::json!([0.01, 0.0, 0.02, 0.01]));
        assert_eq!(
            features[0]["geometry"]["coordinates"][0].as_array().unwrap().len(),
            5
        );
    }
}
