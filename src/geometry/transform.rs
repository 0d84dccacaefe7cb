//! Placement transform from library-local to board coordinates

use super::path::Path;
use super::point::{Angle, Point};
use serde::{Deserialize, Serialize};

/// Mirror about the Y axis, then rotate, then translate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub rotation: Angle,
    #[serde(default)]
    pub mirrored: bool,
}

impl Transform {
    pub fn new(position: Point, rotation: Angle, mirrored: bool) -> Self {
        Transform { position, rotation, mirrored }
    }

    pub fn identity() -> Self {
        Transform::default()
    }

    pub fn map_point(&self, p: Point) -> Point {
        let p = if self.mirrored { p.mirrored_horizontal(Point::ORIGIN) } else { p };
        p.rotated(self.rotation, Point::ORIGIN) + self.position
    }

    pub fn map_path(&self, path: &Path) -> Path {
        let path = if self.mirrored {
            path.mirrored_horizontal(Point::ORIGIN)
        } else {
            path.clone()
        };
        path.rotated(self.rotation, Point::ORIGIN).translated(self.position)
    }

    pub fn map_paths(&self, paths: &[Path]) -> Vec<Path> {
        paths.iter().map(|p| self.map_path(p)).collect()
    }

    /// Layer name as seen on the board; mirroring swaps top and bottom
    pub fn map_layer(&self, layer: &str) -> String {
        if self.mirrored {
            mirrored_layer_name(layer)
        } else {
            layer.to_string()
        }
    }
}

/// Swaps the `top_` and `bot_` prefixes, inner layers are unchanged
pub fn mirrored_layer_name(layer: &str) -> String {
    if let Some(rest) = layer.strip_prefix("top_") {
        format!("bot_{}", rest)
    } else if let Some(rest) = layer.strip_prefix("bot_") {
        format!("top_{}", rest)
    } else {
        layer.to_string()
    }
}
