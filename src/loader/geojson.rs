//! GeoJSON feature collection reader for area unit boundaries.
//!
//! Only `Polygon` and `MultiPolygon` geometries are accepted. A feature that
//! cannot be decoded is skipped and recorded; it never fails the load.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::LoadError;
use crate::spatial::{AreaUnit, AreaUnitIndex};

type Ring = Vec<Vec<f64>>;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    #[serde(other)]
    Unsupported,
}

/// Area units read from one file, plus what was skipped.
#[derive(Debug, Clone, Default)]
pub struct LoadedUnits {
    pub index: AreaUnitIndex,
    pub diagnostics: Diagnostics,
}

fn ring(positions: &[Vec<f64>]) -> LineString<f64> {
    positions
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| Coord { x: p[0], y: p[1] })
        .collect::<Vec<_>>()
        .into()
}

fn polygon(rings: &[Ring]) -> Option<Polygon<f64>> {
    let (exterior, interiors) = rings.split_first()?;
    Some(Polygon::new(
        ring(exterior),
        interiors.iter().map(|r| ring(r)).collect(),
    ))
}

fn geometry(value: Value) -> Result<MultiPolygon<f64>, String> {
    let parsed: Geometry = serde_json::from_value(value).map_err(|e| e.to_string())?;
    let polygons: Vec<Polygon<f64>> = match parsed {
        Geometry::Polygon { coordinates } => polygon(&coordinates).into_iter().collect(),
        Geometry::MultiPolygon { coordinates } => {
            coordinates.iter().filter_map(|p| polygon(p)).collect()
        }
        Geometry::Unsupported => return Err("unsupported geometry type".to_string()),
    };
    if polygons.is_empty() {
        return Err("geometry has no rings".to_string());
    }
    Ok(MultiPolygon::new(polygons))
}

/// Identifier property as text. Numeric identifiers are accepted.
fn identifier(properties: Option<&Map<String, Value>>, id_property: &str) -> Option<String> {
    let value = properties?.get(id_property)?;
    let id = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!id.is_empty()).then_some(id)
}

/// Decode a GeoJSON `FeatureCollection`.
pub fn parse_units(text: &str, id_property: &str) -> Result<LoadedUnits, LoadError> {
    let collection: FeatureCollection = serde_json::from_str(text)?;
    let mut diagnostics = Diagnostics::new();
    let mut units = Vec::with_capacity(collection.features.len());

    for (position, value) in collection.features.into_iter().enumerate() {
        let feature: Feature = match serde_json::from_value(value) {
            Ok(f) => f,
            Err(e) => {
                diagnostics.record(
                    DiagnosticKind::InvalidGeometry,
                    None,
                    format!("feature {}: {}", position, e),
                );
                continue;
            }
        };

        let Some(id) = identifier(feature.properties.as_ref(), id_property) else {
            diagnostics.record(
                DiagnosticKind::MissingIdentifier,
                None,
                format!("feature {} has no '{}' property", position, id_property),
            );
            continue;
        };

        let Some(geometry_value) = feature.geometry else {
            diagnostics.record(DiagnosticKind::InvalidGeometry, Some(&id), "feature has no geometry");
            continue;
        };

        match geometry(geometry_value) {
            Ok(g) => units.push(AreaUnit::new(id, g)),
            Err(e) => diagnostics.record(DiagnosticKind::InvalidGeometry, Some(&id), e),
        }
    }

    Ok(LoadedUnits {
        index: AreaUnitIndex::new(units),
        diagnostics,
    })
}

/// Read area units from a GeoJSON file.
pub fn load_units(path: &Path, id_property: &str) -> Result<LoadedUnits, LoadError> {
    let text = fs::read_to_string(path)?;
    let loaded = parse_units(&text, id_property)?;
    info!(
        "Loaded {} area units from {} ({} skipped)",
        loaded.index.len(),
        path.display(),
        loaded.diagnostics.len()
    );
    Ok(loaded)
}
