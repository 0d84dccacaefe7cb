//! Footprint pads and their per-layer copper geometry

use super::items::{Hole, NetSignalId};
use super::layers::{is_copper_layer, is_inner_layer, BOT_COPPER, TOP_COPPER};
use super::rules::BoardDesignRules;
use crate::geometry::{Angle, Length, Path, Point, PositiveLength, Ratio, Transform};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadShape {
    RoundedRect,
    RoundedOctagon,
    Custom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentSide {
    Top,
    Bottom,
}

impl ComponentSide {
    pub fn flipped(self) -> Self {
        match self {
            ComponentSide::Top => ComponentSide::Bottom,
            ComponentSide::Bottom => ComponentSide::Top,
        }
    }

    pub fn copper_layer(self) -> &'static str {
        match self {
            ComponentSide::Top => TOP_COPPER,
            ComponentSide::Bottom => BOT_COPPER,
        }
    }
}

/// Copper shape of a pad on one layer, in pad coordinates
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PadGeometry {
    RoundedRect {
        width: PositiveLength,
        height: PositiveLength,
        radius: Length,
    },
    RoundedOctagon {
        width: PositiveLength,
        height: PositiveLength,
        radius: Length,
    },
    Custom(Path),
    /// Annular ring around a hole path
    Stroke { width: PositiveLength, path: Path },
}

impl PadGeometry {
    /// Closed outlines whose union is the copper area
    pub fn outlines(&self) -> Vec<Path> {
        match self {
            PadGeometry::RoundedRect { width, height, radius } => {
                vec![Path::centered_rect(*width, *height, *radius)]
            }
            PadGeometry::RoundedOctagon { width, height, radius } => {
                vec![Path::octagon(*width, *height, *radius)]
            }
            PadGeometry::Custom(outline) => vec![outline.to_closed_path()],
            PadGeometry::Stroke { width, path } => path.to_outline_strokes(*width),
        }
    }
}

/// Library pad as placed within its footprint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootprintPad {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub position: Point,
    #[serde(default)]
    pub rotation: Angle,
    pub shape: PadShape,
    pub width: PositiveLength,
    pub height: PositiveLength,
    /// Corner radius as a fraction of half the smaller side
    #[serde(default)]
    pub radius: Ratio,
    #[serde(default)]
    pub custom_outline: Path,
    pub component_side: ComponentSide,
    #[serde(default)]
    pub holes: Vec<Hole>,
    #[serde(default)]
    pub net_signal: Option<NetSignalId>,
}

impl FootprintPad {
    pub fn is_tht(&self) -> bool {
        !self.holes.is_empty()
    }

    /// Placement within the footprint
    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.rotation, false)
    }

    /// Component side after device mirroring
    pub fn board_side(&self, device_mirrored: bool) -> ComponentSide {
        if device_mirrored {
            self.component_side.flipped()
        } else {
            self.component_side
        }
    }

    /// THT pads are on every copper layer, SMT pads only on their side
    pub fn is_on_layer(&self, layer: &str, device_mirrored: bool) -> bool {
        if self.is_tht() {
            is_copper_layer(layer)
        } else {
            layer == self.board_side(device_mirrored).copper_layer()
        }
    }

    pub fn full_geometry(&self) -> PadGeometry {
        let min = self.width.get().0.min(self.height.get().0);
        let radius = self.radius.apply(Length(min / 2));
        match self.shape {
            PadShape::RoundedRect => PadGeometry::RoundedRect {
                width: self.width,
                height: self.height,
                radius,
            },
            PadShape::RoundedOctagon => PadGeometry::RoundedOctagon {
                width: self.width,
                height: self.height,
                radius,
            },
            PadShape::Custom => PadGeometry::Custom(self.custom_outline.clone()),
        }
    }

    /// Copper geometry on a board copper layer
    ///
    /// `connected` tells whether a net line on this layer is attached to the pad.
    pub fn geometry_on_layer(
        &self,
        layer: &str,
        device_mirrored: bool,
        connected: bool,
        rules: &BoardDesignRules,
    ) -> Vec<PadGeometry> {
        if !is_copper_layer(layer) || !self.is_on_layer(layer, device_mirrored) {
            return Vec::new();
        }
        let side = self.board_side(device_mirrored);
        if !self.is_tht() {
            return vec![self.full_geometry()];
        }

        let component_side_layer = side.copper_layer();
        let solder_side_layer = side.flipped().copper_layer();
        let full_shape = layer == solder_side_layer
            || (!rules.pad_cmp_side_auto_annular_ring && layer == component_side_layer)
            || (!rules.pad_inner_auto_annular_ring && is_inner_layer(layer));
        if full_shape {
            return vec![self.full_geometry()];
        }

        self.holes
            .iter()
            .map(|hole| {
                let ring = if connected {
                    rules.calc_pad_annular_ring(hole.diameter.get())
                } else {
                    rules.pad_annular_ring_min
                };
                PadGeometry::Stroke {
                    width: PositiveLength::at_least_one(hole.diameter.get() + ring.get() * 2),
                    path: hole.path.clone(),
                }
            })
            .collect()
    }
}
