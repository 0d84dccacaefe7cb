//! Polygons, circles, stroke texts and holes

use super::{grown_width, grown_width_at_least_one, BoardPathGenerator};
use crate::board::{Circle, Hole, Polygon, StrokeText};
use crate::geometry::{Length, Path, PositiveLength, Transform};

impl<'a> BoardPathGenerator<'a> {
    /// Fill (if filled and closed) plus outline strokes, kernel-offset
    pub fn add_polygon(&mut self, polygon: &Polygon, transform: &Transform, offset: Length) {
        let path = transform.map_path(&polygon.path);
        let mut paths = Vec::new();
        if polygon.filled && path.is_closed() {
            paths.push(path.clone());
        }
        if let Ok(width) = PositiveLength::new(polygon.line_width.get()) {
            paths.extend(path.to_outline_strokes(width));
        }
        if !paths.is_empty() {
            self.push_paths_offset(&paths, offset);
        }
    }

    /// Disc of `diameter + line width + 2·offset`, or a ring of `line width + 2·offset`
    pub fn add_circle(&mut self, circle: &Circle, transform: &Transform, offset: Length) {
        let center = transform.map_point(circle.center);
        if circle.filled {
            if let Some(diameter) = grown_width(circle.diameter.get() + circle.line_width.get(), offset) {
                self.push_paths(&[Path::circle(diameter).translated(center)]);
            }
        } else if let Some(width) = grown_width(circle.line_width.get(), offset) {
            let outline = Path::circle(circle.diameter).translated(center);
            self.push_paths(&outline.to_outline_strokes(width));
        }
    }

    /// Glyph strokes of `max(stroke width + 2·offset, 1)`
    pub fn add_stroke_text(&mut self, text: &StrokeText, offset: Length) {
        let width = grown_width_at_least_one(text.stroke_width.get(), offset);
        let paths: Vec<Path> = text
            .board_paths()
            .iter()
            .flat_map(|p| p.to_outline_strokes(width))
            .collect();
        self.push_paths(&paths);
    }

    /// Hole path stroked at `max(diameter + 2·offset, 1)`
    pub fn add_hole(&mut self, hole: &Hole, transform: &Transform, offset: Length) {
        let width = grown_width_at_least_one(hole.diameter.get(), offset);
        let paths = transform.map_path(&hole.path).to_outline_strokes(width);
        self.push_paths(&paths);
    }
}
