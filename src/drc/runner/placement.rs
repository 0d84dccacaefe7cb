//! Pad connection, courtyard, completeness and stale object checks

use super::BoardDesignRuleCheck;
use crate::board::{Board, Device, BOT_COURTYARD, TOP_COURTYARD};
use crate::drc::messages::{DrcMessage, Violation};
use crate::error::Result;
use crate::geometry::{Length, Path, Point, PositiveLength};
use crate::kernel::Area;

const PAD_LOCATION_DIAMETER: Length = Length(500_000);
const JUNCTION_LOCATION_DIAMETER: Length = Length(300_000);
const AIR_WIRE_LOCATION_WIDTH: Length = Length(50_000);

impl<'a> BoardDesignRuleCheck<'a> {
    pub(super) fn check_invalid_pad_connections(&mut self, board: &Board, progress_end: u8) -> Result<()> {
        self.emit_status("Check pad connections...");

        for device in &board.devices {
            for pad in device.pads() {
                let connected: Vec<&str> = board.pad_net_lines(&pad).map(|l| l.layer.as_str()).collect();
                if connected.is_empty() {
                    continue;
                }
                for layer in board.layers.layers().iter().filter(|l| connected.contains(&l.name.as_str())) {
                    let outlines: Vec<Path> = board
                        .pad_geometry_on_layer(&pad, &layer.name)
                        .iter()
                        .flat_map(|g| g.outlines())
                        .collect();
                    // Pad coordinates: the origin is where traces attach
                    if self.kernel.area_of_paths(&outlines).contains(Point::ORIGIN) {
                        continue;
                    }
                    let diameter = PositiveLength::at_least_one(PAD_LOCATION_DIAMETER);
                    self.emit_message(DrcMessage::new(
                        Violation::InvalidPadConnection {
                            device: device.id,
                            pad: pad.pad.id,
                            layer: layer.name.clone(),
                        },
                        vec![Path::circle(diameter).translated(pad.position())],
                    ));
                }
            }
        }

        self.emit_progress(progress_end);
        Ok(())
    }

    fn device_courtyard(&self, device: &Device, layer: &str) -> Area {
        let transform = device.transform();
        let mut paths: Vec<Path> = device
            .footprint
            .polygons
            .iter()
            .filter(|p| transform.map_layer(&p.layer) == layer)
            .map(|p| transform.map_path(&p.path))
            .collect();
        paths.extend(
            device
                .footprint
                .circles
                .iter()
                .filter(|c| transform.map_layer(&c.layer) == layer)
                .map(|c| Path::circle(c.diameter).translated(transform.map_point(c.center))),
        );
        self.kernel.area_of_paths(&paths)
    }

    pub(super) fn check_courtyard_clearances(&mut self, board: &Board, progress_end: u8) -> Result<()> {
        self.emit_status("Check courtyard clearances...");

        for layer in board.layers.layers_named(&[TOP_COURTYARD, BOT_COURTYARD]) {
            let courtyards: Vec<Area> = board
                .devices
                .iter()
                .map(|d| self.device_courtyard(d, &layer.name))
                .collect();
            for i in 0..courtyards.len() {
                for k in (i + 1)..courtyards.len() {
                    let overlap = self.kernel.intersect(&courtyards[i], &courtyards[k]);
                    if !overlap.is_empty() {
                        self.emit_message(DrcMessage::new(
                            Violation::CourtyardOverlap {
                                device1: board.devices[i].id,
                                device2: board.devices[k].id,
                            },
                            overlap.to_paths(),
                        ));
                    }
                }
            }
        }

        self.emit_progress(progress_end);
        Ok(())
    }

    pub(super) fn check_for_unplaced_components(&mut self, board: &Board, progress_end: u8) -> Result<()> {
        self.emit_status("Check for unplaced components...");

        for component in &board.components {
            if !component.schematic_only && board.device_by_component(component.id).is_none() {
                self.emit_message(DrcMessage::new(
                    Violation::MissingDevice {
                        component: component.id,
                        name: component.name.clone(),
                    },
                    Vec::new(),
                ));
            }
        }

        self.emit_progress(progress_end);
        Ok(())
    }

    pub(super) fn check_for_missing_connections(&mut self, board: &Board, progress_end: u8) -> Result<()> {
        self.emit_status("Check for missing connections...");

        let width = PositiveLength::at_least_one(AIR_WIRE_LOCATION_WIDTH);
        for wire in board.air_wires(&self.kernel)? {
            self.emit_message(DrcMessage::new(
                Violation::MissingConnection {
                    net_signal: wire.net_signal,
                    p1: wire.p1,
                    p2: wire.p2,
                },
                vec![Path::obround(wire.p1_position, wire.p2_position, width)],
            ));
        }

        self.emit_progress(progress_end);
        Ok(())
    }

    pub(super) fn check_for_stale_objects(&mut self, board: &Board, progress_end: u8) -> Result<()> {
        self.emit_status("Check for stale objects...");

        let diameter = PositiveLength::at_least_one(JUNCTION_LOCATION_DIAMETER);
        for segment in &board.net_segments {
            if !segment.is_used() {
                self.emit_message(DrcMessage::new(
                    Violation::EmptyNetSegment { segment: segment.id },
                    Vec::new(),
                ));
            }
            for point in &segment.net_points {
                if !segment.is_net_point_used(point.id) {
                    self.emit_message(DrcMessage::new(
                        Violation::UnconnectedJunction {
                            segment: segment.id,
                            net_point: point.id,
                        },
                        vec![Path::circle(diameter).translated(point.position)],
                    ));
                }
            }
        }

        self.emit_progress(progress_end);
        Ok(())
    }
}
