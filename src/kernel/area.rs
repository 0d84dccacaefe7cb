//! Area: a set of polygons with holes produced by the kernel

use crate::geometry::{Path, Point};
use geo::algorithm::orient::{Direction, Orient};
use geo::{Area as _, BoundingRect, Contains, LineString, MultiPolygon};
use serde::Serialize;

/// Filled region made of disjoint polygons, each with optional holes
#[derive(Clone, Debug)]
pub struct Area(MultiPolygon<f64>);

/// One polygon of an area with the holes it contains
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AreaNode {
    pub outline: Path,
    pub holes: Vec<Path>,
}

impl Area {
    pub fn empty() -> Self {
        Area(MultiPolygon::new(Vec::new()))
    }

    /// Wraps a kernel result, exteriors counter-clockwise and holes clockwise
    pub(crate) fn from_geo(multi: MultiPolygon<f64>) -> Self {
        Area(multi.orient(Direction::Default))
    }

    pub(crate) fn as_geo(&self) -> &MultiPolygon<f64> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 .0.is_empty()
    }

    /// Covered surface in square nanometres
    pub fn size(&self) -> f64 {
        self.0.unsigned_area()
    }

    pub fn polygon_count(&self) -> usize {
        self.0 .0.len()
    }

    /// Bounding box as [[min_x, min_y], [max_x, max_y]]
    pub fn bounds(&self) -> Option<[[f64; 2]; 2]> {
        self.0
            .bounding_rect()
            .map(|r| [[r.min().x, r.min().y], [r.max().x, r.max().y]])
    }

    /// True if the point lies strictly inside the filled region
    pub fn contains(&self, p: Point) -> bool {
        let [x, y] = p.to_f64();
        self.0.contains(&geo::Point::new(x, y))
    }

    /// Containment tree: every polygon with its holes
    pub fn tree(&self) -> Vec<AreaNode> {
        self.0
            .iter()
            .map(|poly| AreaNode {
                outline: ring_to_path(poly.exterior()),
                holes: poly.interiors().iter().map(ring_to_path).collect(),
            })
            .collect()
    }

    /// Outer and hole rings as closed paths, for highlighting
    pub fn to_paths(&self) -> Vec<Path> {
        self.tree()
            .into_iter()
            .flat_map(|node| std::iter::once(node.outline).chain(node.holes))
            .collect()
    }
}

impl Default for Area {
    fn default() -> Self {
        Area::empty()
    }
}

fn ring_to_path(ring: &LineString<f64>) -> Path {
    let points: Vec<Point> = ring.coords().map(|c| Point::from_f64([c.x, c.y])).collect();
    Path::from_points(&points)
}
