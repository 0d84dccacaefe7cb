//! Polygon kernel: offset and boolean operations on filled areas
//!
//! Check code only ever sees `Area` values; the clipping library stays behind
//! `PolygonKernel`. Degenerate input never fails, it just yields an empty area.
//!
//! # Submodules
//! - `area` - Area result type, containment tree, conversion to paths
//! - `ops` - PolygonKernel with offset/unite/intersect/subtract

mod area;
mod ops;

pub use area::{Area, AreaNode};
pub use ops::{PolygonKernel, DEFAULT_ARC_TOLERANCE_NM};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Length, Path, Point, PositiveLength};

    fn pl(nm: i64) -> PositiveLength {
        PositiveLength::new(Length(nm)).unwrap()
    }

    fn square(x: i64, y: i64, size: i64) -> Path {
        Path::from_points(&[
            Point::nm(x, y),
            Point::nm(x + size, y),
            Point::nm(x + size, y + size),
            Point::nm(x, y + size),
        ])
        .to_closed_path()
    }

    #[test]
    fn test_degenerate_path_is_empty() {
        let kernel = PolygonKernel::default();
        let line = Path::from_points(&[Point::nm(0, 0), Point::nm(1000, 0), Point::nm(2000, 0)]);
        assert!(kernel.area_of_path(&line).is_empty());
        assert!(kernel.area_of_path(&Path::default()).is_empty());
    }

    #[test]
    fn test_intersect_overlapping_and_disjoint() {
        let kernel = PolygonKernel::default();
        let a = kernel.area_of_path(&square(0, 0, 1000));
        let b = kernel.area_of_path(&square(500, 500, 1000));
        let c = kernel.area_of_path(&square(5000, 5000, 1000));
        let ab = kernel.intersect(&a, &b);
        assert_eq!(ab.polygon_count(), 1);
        let bounds = ab.bounds().unwrap();
        assert_eq!(bounds, [[500.0, 500.0], [1000.0, 1000.0]]);
        assert!(kernel.intersect(&a, &c).is_empty());
    }

    #[test]
    fn test_unite_all_merges() {
        let kernel = PolygonKernel::default();
        let parts = [
            kernel.area_of_path(&square(0, 0, 1000)),
            kernel.area_of_path(&square(500, 0, 1000)),
            kernel.area_of_path(&square(5000, 0, 1000)),
        ];
        assert_eq!(kernel.unite_all(parts.iter()).polygon_count(), 2);
    }

    #[test]
    fn test_subtract_identical_circles_is_empty() {
        let kernel = PolygonKernel::default();
        let circle = Path::circle(pl(700_000)).translated(Point::nm(1_000_000, 2_000_000));
        let a = kernel.area_of_path(&circle);
        let b = kernel.area_of_path(&circle);
        assert!(kernel.subtract(&a, &b).is_empty());
    }

    #[test]
    fn test_subtract_smaller_circle_leaves_ring() {
        let kernel = PolygonKernel::default();
        let ring = kernel.area_of_path(&Path::circle(pl(700_000)));
        let copper = kernel.area_of_path(&Path::circle(pl(699_998)));
        assert!(!kernel.subtract(&ring, &copper).is_empty());
    }

    #[test]
    fn test_offset_grows_square() {
        let kernel = PolygonKernel::default();
        let a = kernel.area_of_path(&square(0, 0, 1000));
        let grown = kernel.offset(&a, Length(100));
        let b = grown.bounds().unwrap();
        assert!((b[0][0] + 100.0).abs() < 1.0);
        assert!((b[1][1] - 1100.0).abs() < 1.0);
        let shrunk = kernel.offset(&a, Length(-600));
        assert!(shrunk.is_empty());
    }

    #[test]
    fn test_contains_and_paths() {
        let kernel = PolygonKernel::default();
        let outer = kernel.area_of_path(&square(0, 0, 3000));
        let inner = kernel.area_of_path(&square(1000, 1000, 1000));
        let frame = kernel.subtract(&outer, &inner);
        assert!(frame.contains(Point::nm(500, 500)));
        assert!(!frame.contains(Point::nm(1500, 1500)));
        let tree = frame.tree();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].holes.len(), 1);
        assert_eq!(frame.to_paths().len(), 2);
    }
}
