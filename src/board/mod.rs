//! Board model read by the rule check engine
//!
//! A `Board` is a self-contained snapshot: layer stack, nets, net segments,
//! planes, board graphics, holes and placed devices with their footprints.
//! It deserializes from JSON so embedding applications can hand it over as-is.
//!
//! # Submodules
//! - `layers` - Layer stack and well-known layer names
//! - `items` - Net segments, vias, net lines, planes, polygons, texts, holes
//! - `pads` - Footprint pads and per-layer pad geometry
//! - `device` - Devices, footprints, circuit components
//! - `rules` - Board design rules for pad annular rings
//! - `planes` - Plane refill
//! - `airwires` - Air wire (ratsnest) computation

mod airwires;
mod device;
mod items;
mod layers;
mod pads;
mod planes;
mod rules;

pub use airwires::{AirWire, AirWireAnchor};
pub use device::{BoardPad, ComponentInstance, Device, Footprint};
pub use items::{
    Circle, Hole, NetLine, NetLineAnchor, NetPoint, NetSegment, NetSignal, NetSignalId, Plane,
    PlaneFragment, Polygon, StrokeText, Via,
};
pub use layers::{
    inner_copper_layer_name, is_copper_layer, is_inner_layer, Layer, LayerStack, BOARD_OUTLINES,
    BOT_COPPER, BOT_COURTYARD, TOP_COPPER, TOP_COURTYARD,
};
pub use pads::{ComponentSide, FootprintPad, PadGeometry, PadShape};
pub use rules::BoardDesignRules;

use crate::error::{DrcError, Result};
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Board {
    pub name: String,
    pub layers: LayerStack,
    pub design_rules: BoardDesignRules,
    pub net_signals: Vec<NetSignal>,
    pub net_segments: Vec<NetSegment>,
    pub planes: Vec<Plane>,
    pub polygons: Vec<Polygon>,
    pub circles: Vec<Circle>,
    pub stroke_texts: Vec<StrokeText>,
    pub holes: Vec<Hole>,
    pub devices: Vec<Device>,
    /// Components of the circuit, placed or not
    pub components: Vec<ComponentInstance>,
}

impl Board {
    pub fn device(&self, id: u64) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    pub fn device_by_component(&self, component: u64) -> Option<&Device> {
        self.devices.iter().find(|d| d.component == component)
    }

    pub fn net_signal(&self, id: NetSignalId) -> Option<&NetSignal> {
        self.net_signals.iter().find(|n| n.id == id)
    }

    pub fn pad(&self, device: u64, pad: u64) -> Option<BoardPad<'_>> {
        self.device(device).and_then(|d| d.pad(pad))
    }

    /// Board position of a net line endpoint
    pub fn anchor_position(&self, segment: &NetSegment, net_line: &NetLine, anchor: NetLineAnchor) -> Result<Point> {
        let position = match anchor {
            NetLineAnchor::NetPoint { id } => segment.net_point(id).map(|p| p.position),
            NetLineAnchor::Via { id } => segment.via(id).map(|v| v.position),
            NetLineAnchor::Pad { device, pad } => self.pad(device, pad).map(|p| p.position()),
        };
        position.ok_or_else(|| DrcError::UnknownAnchor {
            segment: segment.id,
            net_line: net_line.id,
            anchor: format!("{:?}", anchor),
        })
    }

    pub fn net_line_positions(&self, segment: &NetSegment, net_line: &NetLine) -> Result<(Point, Point)> {
        Ok((
            self.anchor_position(segment, net_line, net_line.start)?,
            self.anchor_position(segment, net_line, net_line.end)?,
        ))
    }

    /// Net lines attached to a pad, across all segments
    pub fn pad_net_lines<'a>(&'a self, pad: &BoardPad<'_>) -> impl Iterator<Item = &'a NetLine> + 'a {
        let anchor = pad.anchor();
        self.net_segments
            .iter()
            .flat_map(|s| s.net_lines.iter())
            .filter(move |l| l.is_attached_to(anchor))
    }

    pub fn is_pad_connected_on_layer(&self, pad: &BoardPad<'_>, layer: &str) -> bool {
        self.pad_net_lines(pad).any(|l| l.layer == layer)
    }

    /// Copper geometry of a pad on a layer, in pad coordinates
    pub fn pad_geometry_on_layer(&self, pad: &BoardPad<'_>, layer: &str) -> Vec<PadGeometry> {
        let connected = self.is_pad_connected_on_layer(pad, layer);
        pad.pad
            .geometry_on_layer(layer, pad.device.mirrored, connected, &self.design_rules)
    }
}
