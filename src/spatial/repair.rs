//! Geometry cleanup applied before predicate evaluation.
//!
//! Boundary files in the wild carry open rings, repeated vertices, NaN
//! coordinates and degenerate slivers. Self-intersecting (bowtie) rings are
//! kept as they are, not rebuilt into valid polygons: intersection tests
//! walk ring edges and vertices, so a bowtie still matches a circle that
//! touches any of its lobes. Repair only has to produce rings the
//! predicates can walk.

use geo::{Coord, LineString, MultiPolygon, Polygon};

use crate::error::GeometryError;

/// Return a cleaned copy of `geometry`.
///
/// Non-finite coordinates and consecutive duplicates are dropped, open rings
/// are closed, rings with fewer than four coordinates are discarded, and a
/// polygon whose exterior was discarded is dropped with its holes.
pub fn repair_geometry(geometry: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>, GeometryError> {
    let polygons: Vec<Polygon<f64>> = geometry.0.iter().filter_map(repair_polygon).collect();

    if polygons.is_empty() {
        return Err(GeometryError::Empty);
    }
    Ok(MultiPolygon::new(polygons))
}

fn repair_polygon(polygon: &Polygon<f64>) -> Option<Polygon<f64>> {
    let exterior = repair_ring(polygon.exterior())?;
    let interiors = polygon.interiors().iter().filter_map(repair_ring).collect();
    Some(Polygon::new(exterior, interiors))
}

fn repair_ring(ring: &LineString<f64>) -> Option<LineString<f64>> {
    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(ring.0.len() + 1);
    for coord in ring.0.iter() {
        if !(coord.x.is_finite() && coord.y.is_finite()) {
            continue;
        }
        if coords.last() == Some(coord) {
            continue;
        }
        coords.push(*coord);
    }

    let mut repaired = LineString::new(coords);
    repaired.close();

    // closed ring needs three distinct vertices plus the closing one
    if repaired.0.len() < 4 {
        return None;
    }
    Some(repaired)
}
