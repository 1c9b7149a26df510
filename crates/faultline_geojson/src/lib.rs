//! Substation extraction from OSM GeoJSON exports.
//!
//! Keeps only features tagged `power=substation` and anchors polygonal
//! geometries at their first vertex, which is enough precision for
//! straight-line dispatch distances.

use std::{fs::File, io::BufReader, path::Path};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("could not read GeoJSON file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse GeoJSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("feature {index} has a position with fewer than 2 components")]
    ShortPosition { index: usize },
}

/// A facility location extracted from the feature set.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Value,
}

/// Positions are kept loose (`Vec<f64>`) because exports may carry a third
/// elevation component.
#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Point { coordinates: Vec<f64> },
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Unsupported,
}

impl Geometry {
    /// The anchor position of the geometry: the point itself, or the first
    /// vertex of the first (outer) ring.
    fn anchor(&self) -> Option<&[f64]> {
        match self {
            Geometry::Point { coordinates } => Some(coordinates.as_slice()),
            Geometry::Polygon { coordinates } => {
                coordinates.first()?.first().map(Vec::as_slice)
            }
            Geometry::MultiPolygon { coordinates } => {
                coordinates.first()?.first()?.first().map(Vec::as_slice)
            }
            Geometry::Unsupported => None,
        }
    }
}

fn is_substation(properties: &Value) -> bool {
    properties
        .get("power")
        .and_then(Value::as_str)
        .is_some_and(|tag| tag == "substation")
}

/// Every `power=substation` feature in the collection, as `Substation_{n}`
/// in encounter order. Features with unsupported geometry are skipped.
pub fn load_substations(path: impl AsRef<Path>) -> Result<Vec<Site>, IngestError> {
    let file = File::open(path)?;
    let collection: FeatureCollection = serde_json::from_reader(BufReader::new(file))?;

    sites_from_collection(collection)
}

/// Same extraction from an in-memory GeoJSON string.
pub fn parse_substations(geojson: &str) -> Result<Vec<Site>, IngestError> {
    let collection: FeatureCollection = serde_json::from_str(geojson)?;

    sites_from_collection(collection)
}

fn sites_from_collection(collection: FeatureCollection) -> Result<Vec<Site>, IngestError> {
    let mut sites = Vec::new();
    let mut counter = 1;

    for (index, feature) in collection.features.into_iter().enumerate() {
        if !is_substation(&feature.properties) {
            continue;
        }

        let Some(anchor) = feature.geometry.as_ref().and_then(Geometry::anchor) else {
            continue;
        };

        if anchor.len() < 2 {
            return Err(IngestError::ShortPosition { index });
        }

        // GeoJSON positions are (lon, lat).
        sites.push(Site {
            id: format!("Substation_{counter}"),
            lat: anchor[1],
            lon: anchor[0],
        });
        counter += 1;
    }

    Ok(sites)
}
