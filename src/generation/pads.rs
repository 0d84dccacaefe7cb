//! Footprint pads on a given layer

use super::BoardPathGenerator;
use crate::board::BoardPad;
use crate::geometry::{Length, Path};

impl<'a> BoardPathGenerator<'a> {
    /// Copper of the pad on `layer` in board coordinates, kernel-offset
    pub fn add_pad(&mut self, pad: &BoardPad<'_>, layer: &str, offset: Length) {
        let paths: Vec<Path> = self
            .board
            .pad_geometry_on_layer(pad, layer)
            .iter()
            .flat_map(|g| g.outlines())
            .map(|outline| pad.map_path(&outline))
            .collect();
        if !paths.is_empty() {
            self.push_paths_offset(&paths, offset);
        }
    }
}
