//! Vias, net lines and planes

use super::{grown_width, BoardPathGenerator};
use crate::board::{NetLine, NetSegment, Plane, Via};
use crate::error::Result;
use crate::geometry::{Length, Path};

impl<'a> BoardPathGenerator<'a> {
    /// Filled circle of `size + 2·offset`
    pub fn add_via(&mut self, via: &Via, offset: Length) {
        if let Some(diameter) = grown_width(via.size.get(), offset) {
            self.push_paths(&[Path::circle(diameter).translated(via.position)]);
        }
    }

    /// Obround of `width + 2·offset` between the anchor positions
    pub fn add_net_line(&mut self, segment: &NetSegment, line: &NetLine, offset: Length) -> Result<()> {
        let (p1, p2) = self.board.net_line_positions(segment, line)?;
        if let Some(width) = grown_width(line.width.get(), offset) {
            self.push_paths(&[Path::obround(p1, p2, width)]);
        }
        Ok(())
    }

    /// Current fill of the plane
    pub fn add_plane(&mut self, plane: &Plane) {
        let area = plane.fill_area(self.kernel);
        self.push(area);
    }
}
