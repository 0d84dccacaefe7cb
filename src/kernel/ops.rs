//! Boolean and offset operations over areas
//!
//! Thin wrapper around geo-clipper. Coordinates are nanometres stored as f64;
//! the clipping library rounds them onto its integer grid at `CLIPPER_SCALE`.

use super::area::Area;
use crate::geometry::{Length, Path, PositiveLength};
use geo::algorithm::orient::{Direction, Orient};
use geo::{Area as _, Coord, LineString, MultiPolygon, Polygon};
use geo_clipper::{Clipper, EndType, JoinType};

/// Nanometres are already integral, no further scaling needed
const CLIPPER_SCALE: f64 = 1.0;

/// Arc flattening tolerance used by the rule check engine (5 µm)
pub const DEFAULT_ARC_TOLERANCE_NM: i64 = 5_000;

/// Polygon clipping front-end with a fixed arc tolerance
#[derive(Clone, Copy, Debug)]
pub struct PolygonKernel {
    max_arc_tolerance: PositiveLength,
}

impl PolygonKernel {
    pub fn new(max_arc_tolerance: PositiveLength) -> Self {
        PolygonKernel { max_arc_tolerance }
    }

    pub fn max_arc_tolerance(&self) -> PositiveLength {
        self.max_arc_tolerance
    }

    /// Filled area of one closed path; degenerate paths give an empty area
    pub fn area_of_path(&self, path: &Path) -> Area {
        match self.to_polygon(path) {
            Some(poly) => Area::from_geo(MultiPolygon::new(vec![poly])),
            None => Area::empty(),
        }
    }

    /// Union of the filled areas of several closed paths
    pub fn area_of_paths(&self, paths: &[Path]) -> Area {
        let polys: Vec<Polygon<f64>> = paths.iter().filter_map(|p| self.to_polygon(p)).collect();
        match polys.len() {
            0 => Area::empty(),
            1 => Area::from_geo(MultiPolygon::new(polys)),
            _ => self.normalize(MultiPolygon::new(polys)),
        }
    }

    /// Grows (positive) or shrinks (negative) with round joins
    pub fn offset(&self, area: &Area, delta: Length) -> Area {
        if delta.0 == 0 || area.is_empty() {
            return area.clone();
        }
        let tolerance = self.max_arc_tolerance.get().0 as f64;
        let result = area.as_geo().offset(
            delta.0 as f64,
            JoinType::Round(tolerance),
            EndType::ClosedPolygon,
            CLIPPER_SCALE,
        );
        Area::from_geo(result)
    }

    pub fn unite(&self, a: &Area, b: &Area) -> Area {
        if a.is_empty() {
            return b.clone();
        }
        if b.is_empty() {
            return a.clone();
        }
        Area::from_geo(a.as_geo().union(b.as_geo(), CLIPPER_SCALE))
    }

    /// Union of many areas in a single clipping pass
    pub fn unite_all<'a>(&self, areas: impl IntoIterator<Item = &'a Area>) -> Area {
        let polys: Vec<Polygon<f64>> = areas
            .into_iter()
            .flat_map(|a| a.as_geo().0.iter().cloned())
            .collect();
        match polys.len() {
            0 => Area::empty(),
            1 => Area::from_geo(MultiPolygon::new(polys)),
            _ => self.normalize(MultiPolygon::new(polys)),
        }
    }

    pub fn intersect(&self, a: &Area, b: &Area) -> Area {
        if a.is_empty() || b.is_empty() {
            return Area::empty();
        }
        Area::from_geo(a.as_geo().intersection(b.as_geo(), CLIPPER_SCALE))
    }

    /// Region covered by every area; empty input gives an empty area
    pub fn intersect_all(&self, areas: &[Area]) -> Area {
        let Some((first, rest)) = areas.split_first() else {
            return Area::empty();
        };
        let mut result = first.clone();
        for area in rest {
            if result.is_empty() {
                break;
            }
            result = self.intersect(&result, area);
        }
        result
    }

    /// Part of `a` not covered by `b`
    pub fn subtract(&self, a: &Area, b: &Area) -> Area {
        if a.is_empty() || b.is_empty() {
            return a.clone();
        }
        Area::from_geo(a.as_geo().difference(b.as_geo(), CLIPPER_SCALE))
    }

    /// Merges overlapping polygons of one set
    fn normalize(&self, multi: MultiPolygon<f64>) -> Area {
        let none: MultiPolygon<f64> = MultiPolygon::new(Vec::new());
        Area::from_geo(multi.union(&none, CLIPPER_SCALE))
    }

    fn to_polygon(&self, path: &Path) -> Option<Polygon<f64>> {
        let mut points = path.flattened(self.max_arc_tolerance);
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            return None;
        }
        let mut coords: Vec<Coord<f64>> = points.iter().map(|p| Coord { x: p[0], y: p[1] }).collect();
        coords.push(coords[0]);
        let poly = Polygon::new(LineString::new(coords), Vec::new());
        if poly.unsigned_area() == 0.0 {
            return None;
        }
        Some(poly.orient(Direction::Default))
    }
}

impl Default for PolygonKernel {
    fn default() -> Self {
        PolygonKernel::new(PositiveLength::at_least_one(Length(DEFAULT_ARC_TOLERANCE_NM)))
    }
}
