//! Plane refill
//!
//! Fills every plane with its outline clipped to the board area. Clearances
//! to foreign copper and thermal reliefs are left to a real pour engine.

use super::items::{Plane, PlaneFragment};
use super::layers::BOARD_OUTLINES;
use super::Board;
use crate::kernel::{Area, PolygonKernel};
use std::time::Instant;
use tracing::debug;

impl Board {
    /// Largest board outline minus all other outlines (cutouts)
    pub fn board_area(&self, kernel: &PolygonKernel) -> Area {
        let mut outlines: Vec<Area> = self
            .polygons
            .iter()
            .filter(|p| p.layer == BOARD_OUTLINES)
            .map(|p| kernel.area_of_path(&p.path.to_closed_path()))
            .filter(|a| !a.is_empty())
            .collect();
        let Some(outer_index) = outlines
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.size().total_cmp(&b.size()))
            .map(|(i, _)| i)
        else {
            return Area::empty();
        };
        let outer = outlines.swap_remove(outer_index);
        let cutouts = kernel.unite_all(outlines.iter());
        kernel.subtract(&outer, &cutouts)
    }

    /// Recomputes the fill fragments of all planes
    pub fn rebuild_planes(&mut self, kernel: &PolygonKernel) {
        let start = Instant::now();
        let board_area = self.board_area(kernel);
        for plane in &mut self.planes {
            let outline = kernel.area_of_path(&plane.outline.to_closed_path());
            let fill = if board_area.is_empty() {
                outline
            } else {
                kernel.intersect(&outline, &board_area)
            };
            plane.fragments = fill
                .tree()
                .into_iter()
                .map(|node| PlaneFragment {
                    outline: node.outline,
                    holes: node.holes,
                })
                .collect();
        }
        debug!(
            "[Planes] Rebuilt {} plane(s) in {:.2}ms",
            self.planes.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
    }
}

impl Plane {
    /// Filled area of the current fragments
    pub fn fill_area(&self, kernel: &PolygonKernel) -> Area {
        let parts: Vec<Area> = self
            .fragments
            .iter()
            .map(|f| {
                let outline = kernel.area_of_path(&f.outline);
                let holes = kernel.area_of_paths(&f.holes);
                kernel.subtract(&outline, &holes)
            })
            .collect();
        kernel.unite_all(parts.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{NetSignalId, Polygon};
    use crate::geometry::{Path, Point, UnsignedLength};

    fn rect(x0: i64, y0: i64, x1: i64, y1: i64) -> Path {
        Path::from_points(&[Point::nm(x0, y0), Point::nm(x1, y0), Point::nm(x1, y1), Point::nm(x0, y1)])
            .to_closed_path()
    }

    fn outline(id: u64, path: Path) -> Polygon {
        Polygon {
            id,
            layer: BOARD_OUTLINES.into(),
            line_width: UnsignedLength::ZERO,
            filled: false,
            path,
        }
    }

    #[test]
    fn test_rebuild_clips_to_board_and_keeps_cutout() {
        let kernel = PolygonKernel::default();
        let mut board = Board::default();
        board.polygons.push(outline(1, rect(0, 0, 10_000_000, 10_000_000)));
        board.polygons.push(outline(2, rect(4_000_000, 4_000_000, 6_000_000, 6_000_000)));
        board.planes.push(Plane {
            id: 1,
            layer: "top_cu".into(),
            net_signal: NetSignalId(1),
            outline: rect(-5_000_000, -5_000_000, 15_000_000, 15_000_000),
            min_width: UnsignedLength::ZERO,
            fragments: Vec::new(),
        });
        board.rebuild_planes(&kernel);
        let plane = &board.planes[0];
        assert_eq!(plane.fragments.len(), 1);
        assert_eq!(plane.fragments[0].holes.len(), 1);
        let fill = plane.fill_area(&kernel);
        assert_eq!(fill.bounds().unwrap(), [[0.0, 0.0], [10_000_000.0, 10_000_000.0]]);
        assert!(!fill.contains(Point::nm(5_000_000, 5_000_000)));
        assert!(fill.contains(Point::nm(1_000_000, 1_000_000)));
    }

    #[test]
    fn test_rebuild_without_outline_uses_plane_outline() {
        let kernel = PolygonKernel::default();
        let mut board = Board::default();
        board.planes.push(Plane {
            id: 1,
            layer: "bot_cu".into(),
            net_signal: NetSignalId(1),
            outline: rect(0, 0, 1_000_000, 1_000_000),
            min_width: UnsignedLength::ZERO,
            fragments: Vec::new(),
        });
        board.rebuild_planes(&kernel);
        assert_eq!(board.planes[0].fragments.len(), 1);
    }
}
