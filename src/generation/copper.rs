//! Per-layer copper with a net filter

use super::BoardPathGenerator;
use crate::board::{is_copper_layer, NetSignalId};
use crate::error::Result;
use crate::geometry::{Length, Transform};
use std::collections::BTreeSet;

/// Nets admitted into a copper area; empty admits everything.
/// `None` stands for copper without a net.
pub type NetFilter = BTreeSet<Option<NetSignalId>>;

fn admits(filter: &NetFilter, net: Option<NetSignalId>) -> bool {
    filter.is_empty() || filter.contains(&net)
}

impl<'a> BoardPathGenerator<'a> {
    /// Adds all copper on `layer` whose net passes `filter`
    pub fn add_copper(&mut self, layer: &str, filter: &NetFilter, ignore_planes: bool) -> Result<()> {
        let board = self.board;
        let with_vias = is_copper_layer(layer);

        for segment in &board.net_segments {
            if !admits(filter, segment.net_signal) {
                continue;
            }
            if with_vias {
                for via in &segment.vias {
                    self.add_via(via, Length::ZERO);
                }
            }
            for line in segment.net_lines.iter().filter(|l| l.layer == layer) {
                self.add_net_line(segment, line, Length::ZERO)?;
            }
        }

        if !ignore_planes {
            for plane in &board.planes {
                if plane.layer == layer && admits(filter, Some(plane.net_signal)) {
                    self.add_plane(plane);
                }
            }
        }

        if admits(filter, None) {
            let identity = Transform::identity();
            for polygon in board.polygons.iter().filter(|p| p.layer == layer) {
                self.add_polygon(polygon, &identity, Length::ZERO);
            }
            for circle in board.circles.iter().filter(|c| c.layer == layer) {
                self.add_circle(circle, &identity, Length::ZERO);
            }
            for text in board.stroke_texts.iter().filter(|t| t.layer == layer) {
                self.add_stroke_text(text, Length::ZERO);
            }
        }

        for device in &board.devices {
            for pad in device.pads() {
                if pad.is_on_layer(layer) && admits(filter, pad.net_signal()) {
                    self.add_pad(&pad, layer, Length::ZERO);
                }
            }
            if !admits(filter, None) {
                continue;
            }
            let transform = device.transform();
            for polygon in &device.footprint.polygons {
                if transform.map_layer(&polygon.layer) == layer {
                    self.add_polygon(polygon, &transform, Length::ZERO);
                }
            }
            for circle in &device.footprint.circles {
                if transform.map_layer(&circle.layer) == layer {
                    self.add_circle(circle, &transform, Length::ZERO);
                }
            }
            for text in device.stroke_texts.iter().filter(|t| t.layer == layer) {
                self.add_stroke_text(text, Length::ZERO);
            }
        }
        Ok(())
    }
}
