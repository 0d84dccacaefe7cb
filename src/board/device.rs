//! Placed devices, their footprints and circuit components

use super::items::{Circle, Hole, NetLineAnchor, NetSignalId, Polygon, StrokeText};
use super::pads::FootprintPad;
use crate::geometry::{Angle, Path, Point, Transform};
use serde::{Deserialize, Serialize};

/// Library footprint geometry in footprint coordinates
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Footprint {
    pub pads: Vec<FootprintPad>,
    pub polygons: Vec<Polygon>,
    pub circles: Vec<Circle>,
    pub holes: Vec<Hole>,
}

/// Footprint instance placed on the board
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: u64,
    /// Circuit component this device realizes
    pub component: u64,
    #[serde(default)]
    pub name: String,
    pub position: Point,
    #[serde(default)]
    pub rotation: Angle,
    #[serde(default)]
    pub mirrored: bool,
    #[serde(default)]
    pub footprint: Footprint,
    /// Texts already in board coordinates
    #[serde(default)]
    pub stroke_texts: Vec<StrokeText>,
}

impl Device {
    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.rotation, self.mirrored)
    }

    pub fn pad(&self, id: u64) -> Option<BoardPad<'_>> {
        self.footprint
            .pads
            .iter()
            .find(|p| p.id == id)
            .map(|pad| BoardPad { device: self, pad })
    }

    pub fn pads(&self) -> impl Iterator<Item = BoardPad<'_>> {
        self.footprint.pads.iter().map(move |pad| BoardPad { device: self, pad })
    }
}

/// Pad seen in board coordinates
#[derive(Clone, Copy, Debug)]
pub struct BoardPad<'a> {
    pub device: &'a Device,
    pub pad: &'a FootprintPad,
}

impl<'a> BoardPad<'a> {
    pub fn position(&self) -> Point {
        self.device.transform().map_point(self.pad.position)
    }

    /// Pad coordinates to board coordinates
    pub fn map_path(&self, path: &Path) -> Path {
        self.device.transform().map_path(&self.pad.transform().map_path(path))
    }

    pub fn is_on_layer(&self, layer: &str) -> bool {
        self.pad.is_on_layer(layer, self.device.mirrored)
    }

    pub fn net_signal(&self) -> Option<NetSignalId> {
        self.pad.net_signal
    }

    pub fn anchor(&self) -> NetLineAnchor {
        NetLineAnchor::Pad {
            device: self.device.id,
            pad: self.pad.id,
        }
    }
}

/// Component of the circuit, with or without a device on the board
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInstance {
    pub id: u64,
    pub name: String,
    /// Schematic-only components never need a device
    #[serde(default)]
    pub schematic_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::pads::{ComponentSide, PadShape};
    use crate::geometry::{Length, PositiveLength, Ratio};

    #[test]
    fn test_pad_position_follows_device() {
        let pad = FootprintPad {
            id: 7,
            name: "1".into(),
            position: Point::nm(1_000_000, 0),
            rotation: Angle::ZERO,
            shape: PadShape::RoundedRect,
            width: PositiveLength::new(Length(500_000)).unwrap(),
            height: PositiveLength::new(Length(500_000)).unwrap(),
            radius: Ratio::default(),
            custom_outline: Path::default(),
            component_side: ComponentSide::Top,
            holes: Vec::new(),
            net_signal: None,
        };
        let device = Device {
            id: 1,
            component: 1,
            name: "R1".into(),
            position: Point::nm(10_000_000, 0),
            rotation: Angle::deg(90),
            mirrored: true,
            footprint: Footprint {
                pads: vec![pad],
                ..Default::default()
            },
            stroke_texts: Vec::new(),
        };
        let bp = device.pad(7).unwrap();
        assert_eq!(bp.position(), Point::nm(10_000_000, -1_000_000));
        assert!(bp.is_on_layer("bot_cu"));
        assert!(!bp.is_on_layer("top_cu"));
        assert_eq!(bp.anchor(), NetLineAnchor::Pad { device: 1, pad: 7 });
    }
}
