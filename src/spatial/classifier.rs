//! One-pass radius classification.
//!
//! Every unit is tested against the largest circle first. Units outside it
//! are skipped without touching any other circle; units inside it join the
//! union and are then tested against each smaller circle.

use geo::{BoundingRect, Intersects, MultiPolygon, Polygon, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

use super::{circle_polygon, repair_geometry, AreaUnitIndex};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::EngineError;
use crate::models::{radius_label, Center};

/// Radii used when the caller supplies none that are valid.
pub const DEFAULT_RADII: [f64; 3] = [1.0, 3.0, 5.0];

/// Identifiers whose geometry intersects one radius circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadiusMembers {
    pub radius: f64,
    pub label: String,
    pub identifiers: Vec<String>,
}

/// Result of classifying the index against a set of radii.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// One entry per normalized radius, ascending.
    pub by_radius: Vec<RadiusMembers>,
    /// Every identifier within the largest radius, in index order.
    pub all_identifiers: Vec<String>,
}

impl Classification {
    /// Members of the radius with the given label.
    pub fn members(&self, label: &str) -> Option<&[String]> {
        self.by_radius
            .iter()
            .find(|m| m.label == label)
            .map(|m| m.identifiers.as_slice())
    }

    pub fn radii(&self) -> Vec<f64> {
        self.by_radius.iter().map(|m| m.radius).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.all_identifiers.is_empty()
    }
}

/// Sort ascending, drop duplicates and anything non-finite or non-positive.
///
/// Returns [`DEFAULT_RADII`] when nothing valid remains.
pub fn normalize_radii(radii: &[f64]) -> Vec<f64> {
    let mut clean: Vec<f64> = radii
        .iter()
        .copied()
        .filter(|r| r.is_finite() && *r > 0.0)
        .collect();
    clean.sort_by(|a, b| a.total_cmp(b));
    clean.dedup();

    if clean.is_empty() {
        DEFAULT_RADII.to_vec()
    } else {
        clean
    }
}

/// Circle for one radius, with its bounding box for a cheap pre-check.
struct RadiusCircle {
    radius: f64,
    polygon: Polygon<f64>,
    bounds: Option<Rect<f64>>,
}

impl RadiusCircle {
    fn new(center: Center, radius: f64) -> Self {
        let polygon = circle_polygon(center, radius);
        let bounds = polygon.bounding_rect();
        Self {
            radius,
            polygon,
            bounds,
        }
    }

    fn intersects(&self, geometry: &MultiPolygon<f64>, geometry_bounds: &Rect<f64>) -> bool {
        if let Some(bounds) = self.bounds {
            if !bounds.intersects(geometry_bounds) {
                return false;
            }
        }
        geometry.intersects(&self.polygon)
    }
}

/// Classify every unit in `index` by membership in each radius around `center`.
///
/// Radii are normalized first. Units whose geometry cannot be evaluated are
/// skipped and recorded in `diagnostics`; they never abort the pass.
pub fn classify(
    index: &AreaUnitIndex,
    center: Center,
    radii: &[f64],
    diagnostics: &mut Diagnostics,
) -> Result<Classification, EngineError> {
    if !(center.lat.is_finite() && center.lng.is_finite()) {
        return Err(EngineError::InvalidCenter {
            lat: center.lat,
            lng: center.lng,
        });
    }

    let radii = normalize_radii(radii);
    let circles: Vec<RadiusCircle> = radii.iter().map(|r| RadiusCircle::new(center, *r)).collect();
    let mut by_radius: Vec<RadiusMembers> = radii
        .iter()
        .map(|r| RadiusMembers {
            radius: *r,
            label: radius_label(*r),
            identifiers: Vec::new(),
        })
        .collect();

    // normalize_radii never returns an empty list
    let Some((gate, inner)) = circles.split_last() else {
        return Ok(Classification {
            by_radius,
            all_identifiers: Vec::new(),
        });
    };
    let gate_slot = inner.len();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut all_identifiers = Vec::new();

    for unit in index.units() {
        if unit.identifier.trim().is_empty() {
            diagnostics.record(DiagnosticKind::MissingIdentifier, None, "unit without identifier");
            continue;
        }

        let geometry = match repair_geometry(&unit.geometry) {
            Ok(g) => g,
            Err(e) => {
                diagnostics.record(
                    DiagnosticKind::InvalidGeometry,
                    Some(&unit.identifier),
                    e.to_string(),
                );
                continue;
            }
        };
        let Some(bounds) = geometry.bounding_rect() else {
            diagnostics.record(
                DiagnosticKind::InvalidGeometry,
                Some(&unit.identifier),
                crate::error::GeometryError::Unbounded.to_string(),
            );
            continue;
        };

        if !gate.intersects(&geometry, &bounds) {
            continue;
        }

        if !seen.insert(unit.identifier.as_str()) {
            debug!("Duplicate identifier {} ignored", unit.identifier);
            continue;
        }
        all_identifiers.push(unit.identifier.clone());
        by_radius[gate_slot].identifiers.push(unit.identifier.clone());

        for (slot, circle) in inner.iter().enumerate() {
            if circle.intersects(&geometry, &bounds) {
                by_radius[slot].identifiers.push(unit.identifier.clone());
            }
        }
    }

    info!(
        "Classified {} of {} units within {} miles",
        all_identifiers.len(),
        index.len(),
        gate.radius
    );
    for members in &by_radius {
        debug!("  {}: {} units", members.label, members.identifiers.len());
    }

    Ok(Classification {
        by_radius,
        all_identifiers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::circle::miles_to_lat_degrees;
    use crate::spatial::AreaUnit;
    use geo::{LineString, Polygon};

    /// Small square (side ~0.2 mi) centered `north_miles` north of the origin.
    fn square_at(id: &str, north_miles: f64) -> AreaUnit {
        let y = miles_to_lat_degrees(north_miles);
        let h = miles_to_lat_degrees(0.1);
        let ring = LineString::from(vec![
            (-h, y - h),
            (h, y - h),
            (h, y + h),
            (-h, y + h),
            (-h, y - h),
        ]);
        AreaUnit::new(id, MultiPolygon::new(vec![Polygon::new(ring, vec![])]))
    }

    #[test]
    fn test_normalize_radii() {
        assert_eq!(normalize_radii(&[5.0, 1.0, 3.0, 3.0]), vec![1.0, 3.0, 5.0]);
        assert_eq!(normalize_radii(&[]), vec![1.0, 3.0, 5.0]);
        assert_eq!(normalize_radii(&[-1.0, 0.0, f64::NAN]), vec![1.0, 3.0, 5.0]);
        assert_eq!(normalize_radii(&[2.5, 10.0]), vec![2.5, 10.0]);
    }

    #[test]
    fn test_classify_by_distance() {
        let index = AreaUnitIndex::new(vec![
            square_at("near", 0.5),
            square_at("mid", 2.0),
            square_at("far", 4.0),
            square_at("outside", 8.0),
        ]);
        let mut diag = Diagnostics::new();
        let result = classify(&index, Center::new(0.0, 0.0), &[1.0, 3.0, 5.0], &mut diag).unwrap();

        assert_eq!(result.members("1mile").unwrap(), ["near"]);
        assert_eq!(result.members("3mile").unwrap(), ["near", "mid"]);
        assert_eq!(result.members("5mile").unwrap(), ["near", "mid", "far"]);
        assert_eq!(result.all_identifiers, vec!["near", "mid", "far"]);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_partial_overlap_counts_as_member() {
        // centered at 1.05 mi with half-width 0.1 mi: straddles the 1-mile circle
        let index = AreaUnitIndex::new(vec![square_at("edge", 1.05)]);
        let mut diag = Diagnostics::new();
        let result = classify(&index, Center::new(0.0, 0.0), &[1.0, 2.0], &mut diag).unwrap();
        assert_eq!(result.members("1mile").unwrap(), ["edge"]);
    }

    #[test]
    fn test_concave_unit_around_center_stays_nested() {
        // C-shaped band 1.5..2 mi from the center, open to the east; its
        // bounding box covers the 1-mile circle but its body does not.
        let d = miles_to_lat_degrees;
        let ring = LineString::from(vec![
            (d(2.0), d(0.5)),
            (d(2.0), d(2.0)),
            (d(-2.0), d(2.0)),
            (d(-2.0), d(-2.0)),
            (d(2.0), d(-2.0)),
            (d(2.0), d(-0.5)),
            (d(1.5), d(-0.5)),
            (d(1.5), d(-1.5)),
            (d(-1.5), d(-1.5)),
            (d(-1.5), d(1.5)),
            (d(1.5), d(1.5)),
            (d(1.5), d(0.5)),
            (d(2.0), d(0.5)),
        ]);
        let unit = AreaUnit::new("c", MultiPolygon::new(vec![Polygon::new(ring, vec![])]));
        let index = AreaUnitIndex::new(vec![unit]);
        let mut diag = Diagnostics::new();
        let result = classify(&index, Center::new(0.0, 0.0), &[1.0, 3.0, 5.0], &mut diag).unwrap();

        assert!(result.members("1mile").unwrap().is_empty());
        assert_eq!(result.members("3mile").unwrap(), ["c"]);
        assert_eq!(result.members("5mile").unwrap(), ["c"]);
    }

    /// Self-intersecting ring: two triangles meeting at (0, `north_miles`).
    fn bowtie_at(id: &str, north_miles: f64, half_miles: f64) -> AreaUnit {
        let d = miles_to_lat_degrees;
        let (lo, hi) = (north_miles - half_miles, north_miles + half_miles);
        let ring = LineString::from(vec![
            (d(-half_miles), d(lo)),
            (d(half_miles), d(hi)),
            (d(half_miles), d(lo)),
            (d(-half_miles), d(hi)),
            (d(-half_miles), d(lo)),
        ]);
        AreaUnit::new(id, MultiPolygon::new(vec![Polygon::new(ring, vec![])]))
    }

    #[test]
    fn test_bowtie_units_classified_by_their_lobes() {
        // lobe corners at 0.85 mi reach into the 1-mile circle
        let straddling = bowtie_at("straddling", 1.1, 0.3);
        // nearest corner is about 1.58 mi out
        let outer = bowtie_at("outer", 2.0, 0.5);
        let index = AreaUnitIndex::new(vec![straddling, outer]);
        let mut diag = Diagnostics::new();
        let result = classify(&index, Center::new(0.0, 0.0), &[1.0, 3.0, 5.0], &mut diag).unwrap();

        assert_eq!(result.members("1mile").unwrap(), ["straddling"]);
        assert_eq!(result.members("3mile").unwrap(), ["straddling", "outer"]);
        assert_eq!(result.members("5mile").unwrap(), ["straddling", "outer"]);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_bad_geometry_is_skipped_not_fatal() {
        let broken = AreaUnit::new(
            "broken",
            MultiPolygon::new(vec![Polygon::new(
                LineString::from(vec![(f64::NAN, f64::NAN)]),
                vec![],
            )]),
        );
        let index = AreaUnitIndex::new(vec![broken, square_at("ok", 0.5)]);
        let mut diag = Diagnostics::new();
        let result = classify(&index, Center::new(0.0, 0.0), &[1.0], &mut diag).unwrap();

        assert_eq!(result.all_identifiers, vec!["ok"]);
        assert_eq!(diag.count(DiagnosticKind::InvalidGeometry), 1);
        assert_eq!(diag.identifiers(DiagnosticKind::InvalidGeometry), vec!["broken"]);
    }

    #[test]
    fn test_invalid_center_is_error() {
        let index = AreaUnitIndex::new(vec![]);
        let mut diag = Diagnostics::new();
        let err = classify(&index, Center::new(f64::NAN, 0.0), &[1.0], &mut diag);
        assert!(matches!(err, Err(EngineError::InvalidCenter { .. })));
    }

    #[test]
    fn test_duplicate_identifier_counted_once() {
        let index = AreaUnitIndex::new(vec![square_at("dup", 0.5), square_at("dup", 0.6)]);
        let mut diag = Diagnostics::new();
        let result = classify(&index, Center::new(0.0, 0.0), &[1.0, 3.0], &mut diag).unwrap();
        assert_eq!(result.all_identifiers, vec!["dup"]);
        assert_eq!(result.members("1mile").unwrap().len(), 1);
    }
}
