//! Spatial side of the engine: the area unit index, circle construction,
//! geometry repair and the one-pass radius classifier.

pub mod circle;
pub mod classifier;
pub mod repair;

pub use circle::{circle_polygon, EARTH_RADIUS_MILES};
pub use classifier::{classify, normalize_radii, Classification, RadiusMembers, DEFAULT_RADII};
pub use repair::repair_geometry;

use geo::MultiPolygon;

/// A small fixed-boundary region with a unique identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaUnit {
    /// Fixed-width geographic code (e.g. a 12-digit block group GEOID).
    pub identifier: String,
    /// Boundary in (lon, lat) coordinates.
    pub geometry: MultiPolygon<f64>,
}

impl AreaUnit {
    pub fn new(identifier: impl Into<String>, geometry: MultiPolygon<f64>) -> Self {
        Self {
            identifier: identifier.into(),
            geometry,
        }
    }
}

/// Immutable, ordered collection of area units.
///
/// Built once by the host and shared read-only by every classification.
#[derive(Debug, Clone, Default)]
pub struct AreaUnitIndex {
    units: Vec<AreaUnit>,
}

impl AreaUnitIndex {
    pub fn new(units: Vec<AreaUnit>) -> Self {
        Self { units }
    }

    pub fn units(&self) -> &[AreaUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, identifier: &str) -> Option<&AreaUnit> {
        self.units.iter().find(|u| u.identifier == identifier)
    }
}

impl FromIterator<AreaUnit> for AreaUnitIndex {
    fn from_iter<I: IntoIterator<Item = AreaUnit>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
