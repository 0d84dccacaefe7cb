//! Board object to polygon area conversion
//!
//! `BoardPathGenerator` collects the areas of board objects, optionally grown
//! or shrunk by a signed offset, and unites them on request. Each `add_*`
//! call handles one object type; `add_copper` gathers everything on a copper
//! layer that passes a net filter.
//!
//! # Submodules
//! - `traces` - Vias, net lines and planes
//! - `graphics` - Polygons, circles, stroke texts and holes
//! - `pads` - Footprint pads on a given layer
//! - `copper` - Per-layer copper with a net filter

mod copper;
mod graphics;
mod pads;
mod traces;

pub use copper::NetFilter;

use crate::board::Board;
use crate::geometry::{Length, Path, PositiveLength};
use crate::kernel::{Area, PolygonKernel};

pub struct BoardPathGenerator<'a> {
    board: &'a Board,
    kernel: &'a PolygonKernel,
    areas: Vec<Area>,
}

impl<'a> BoardPathGenerator<'a> {
    pub fn new(board: &'a Board, kernel: &'a PolygonKernel) -> Self {
        BoardPathGenerator {
            board,
            kernel,
            areas: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.areas.iter().all(Area::is_empty)
    }

    /// Union of everything added so far
    pub fn into_area(self) -> Area {
        self.kernel.unite_all(self.areas.iter())
    }

    fn push(&mut self, area: Area) {
        if !area.is_empty() {
            self.areas.push(area);
        }
    }

    fn push_paths(&mut self, paths: &[Path]) {
        let area = self.kernel.area_of_paths(paths);
        self.push(area);
    }

    /// Adds closed paths grown or shrunk by `offset` with the kernel
    fn push_paths_offset(&mut self, paths: &[Path], offset: Length) {
        let area = self.kernel.area_of_paths(paths);
        let area = self.kernel.offset(&area, offset);
        self.push(area);
    }
}

/// `base + 2·offset` as a stroke width, or `None` when nothing is left
pub(crate) fn grown_width(base: Length, offset: Length) -> Option<PositiveLength> {
    PositiveLength::new(base + offset * 2).ok()
}

/// `max(base + 2·offset, 1)`
pub(crate) fn grown_width_at_least_one(base: Length, offset: Length) -> PositiveLength {
    PositiveLength::at_least_one(base + offset * 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grown_width() {
        assert_eq!(grown_width(Length(100), Length(-50)), None);
        assert_eq!(grown_width(Length(100), Length(10)).map(|w| w.get()), Some(Length(120)));
        assert_eq!(grown_width_at_least_one(Length(100), Length(-80)).get(), Length(1));
    }

    #[test]
    fn test_empty_generator() {
        let board = Board::default();
        let kernel = PolygonKernel::default();
        let generator = BoardPathGenerator::new(&board, &kernel);
        assert!(generator.is_empty());
        assert!(generator.into_area().is_empty());
    }
}
