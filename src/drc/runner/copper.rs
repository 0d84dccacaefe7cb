//! Copper width and clearance checks

use super::BoardDesignRuleCheck;
use crate::board::{Board, NetSignalId, StrokeText, BOARD_OUTLINES};
use crate::drc::messages::{CopperItemRef, DrcMessage, ObjectRef, Violation};
use crate::error::Result;
use crate::generation::BoardPathGenerator;
use crate::geometry::{Length, Path, PositiveLength, Transform};
use crate::kernel::Area;
use rstar::{RTree, RTreeObject, AABB};
use tracing::debug;

/// Narrowest stroke used to highlight thin texts
const TEXT_LOCATION_MIN_WIDTH: Length = Length(50_000);
const PLANE_LOCATION_WIDTH: Length = Length(200_000);

/// Grown copper object taking part in the clearance scan
struct CopperItem {
    object: ObjectRef,
    /// `None` = through-hole
    layer: Option<String>,
    net_signal: Option<NetSignalId>,
    area: Area,
}

impl CopperItem {
    fn to_ref(&self) -> CopperItemRef {
        CopperItemRef {
            object: self.object.clone(),
            layer: self.layer.clone(),
            net_signal: self.net_signal,
        }
    }

    fn may_conflict_with(&self, other: &CopperItem) -> bool {
        let nets_differ = match (self.net_signal, other.net_signal) {
            (Some(a), Some(b)) => a != b,
            _ => true,
        };
        let layers_overlap = match (&self.layer, &other.layer) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        };
        nets_differ && layers_overlap
    }
}

/// Bounding box of one item in the candidate index
struct IndexedItem {
    index: usize,
    bounds: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedItem {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

fn text_locations(text: &StrokeText) -> Vec<Path> {
    let width = PositiveLength::at_least_one(text.stroke_width.get().max(TEXT_LOCATION_MIN_WIDTH));
    text.board_paths()
        .iter()
        .flat_map(|p| p.to_outline_strokes(width))
        .collect()
}

impl<'a> BoardDesignRuleCheck<'a> {
    /// Area built by one generator call
    fn item_area<F>(&self, board: &Board, add: F) -> Result<Area>
    where
        F: FnOnce(&mut BoardPathGenerator<'_>) -> Result<()>,
    {
        let mut generator = BoardPathGenerator::new(board, &self.kernel);
        add(&mut generator)?;
        Ok(generator.into_area())
    }

    pub(super) fn check_minimum_copper_width(&mut self, board: &Board, progress_end: u8) -> Result<()> {
        let min_width = self.settings.min_copper_width;
        if min_width.is_zero() {
            return Ok(());
        }
        self.emit_status("Check minimum copper width...");
        let min = Length::from(min_width);

        for text in &board.stroke_texts {
            if board.layers.is_enabled_copper(&text.layer) && text.stroke_width.get() < min {
                self.emit_message(DrcMessage::new(
                    Violation::MinimumWidth {
                        object: ObjectRef::StrokeText { device: None, text: text.id },
                        min_width,
                    },
                    text_locations(text),
                ));
            }
        }

        for plane in &board.planes {
            if board.layers.is_enabled_copper(&plane.layer) && plane.min_width.get() < min {
                let locations = plane
                    .outline
                    .to_closed_path()
                    .to_outline_strokes(PositiveLength::at_least_one(PLANE_LOCATION_WIDTH));
                self.emit_message(DrcMessage::new(
                    Violation::MinimumWidth {
                        object: ObjectRef::Plane { plane: plane.id },
                        min_width,
                    },
                    locations,
                ));
            }
        }

        for device in &board.devices {
            // Device texts are already on their final layer
            for text in &device.stroke_texts {
                if board.layers.is_enabled_copper(&text.layer) && text.stroke_width.get() < min {
                    self.emit_message(DrcMessage::new(
                        Violation::MinimumWidth {
                            object: ObjectRef::StrokeText { device: Some(device.id), text: text.id },
                            min_width,
                        },
                        text_locations(text),
                    ));
                }
            }
        }

        for segment in &board.net_segments {
            for line in &segment.net_lines {
                if board.layers.is_enabled_copper(&line.layer) && line.width.get() < min {
                    let (p1, p2) = board.net_line_positions(segment, line)?;
                    self.emit_message(DrcMessage::new(
                        Violation::MinimumWidth {
                            object: ObjectRef::NetLine { segment: segment.id, net_line: line.id },
                            min_width,
                        },
                        vec![Path::obround(p1, p2, line.width)],
                    ));
                }
            }
        }

        self.emit_progress(progress_end);
        Ok(())
    }

    pub(super) fn check_copper_copper_clearances(&mut self, board: &Board, progress_end: u8) -> Result<()> {
        let clearance = self.settings.min_copper_copper_clearance;
        if clearance.is_zero() {
            return Ok(());
        }
        self.emit_status("Check copper clearances...");

        // Each side grows by half the clearance
        let tolerance = self.kernel.max_arc_tolerance().get();
        let offset = ((Length::from(clearance) - tolerance) / 2 - Length(1)).max(Length::ZERO);
        let layers = Self::enabled_copper_layers(board);
        let is_layer = |name: &str| layers.iter().any(|l| l == name);
        let identity = Transform::identity();
        let mut items: Vec<CopperItem> = Vec::new();

        for segment in &board.net_segments {
            for via in &segment.vias {
                items.push(CopperItem {
                    object: ObjectRef::Via { segment: segment.id, via: via.id },
                    layer: None,
                    net_signal: segment.net_signal,
                    area: self.item_area(board, |g| {
                        g.add_via(via, offset);
                        Ok(())
                    })?,
                });
            }
            for line in segment.net_lines.iter().filter(|l| is_layer(&l.layer)) {
                items.push(CopperItem {
                    object: ObjectRef::NetLine { segment: segment.id, net_line: line.id },
                    layer: Some(line.layer.clone()),
                    net_signal: segment.net_signal,
                    area: self.item_area(board, |g| g.add_net_line(segment, line, offset))?,
                });
            }
        }

        if !self.quick {
            for plane in board.planes.iter().filter(|p| is_layer(&p.layer)) {
                let fill = plane.fill_area(&self.kernel);
                items.push(CopperItem {
                    object: ObjectRef::Plane { plane: plane.id },
                    layer: Some(plane.layer.clone()),
                    net_signal: Some(plane.net_signal),
                    area: self.kernel.offset(&fill, offset),
                });
            }
        }

        for polygon in board.polygons.iter().filter(|p| is_layer(&p.layer)) {
            items.push(CopperItem {
                object: ObjectRef::Polygon { device: None, polygon: polygon.id },
                layer: Some(polygon.layer.clone()),
                net_signal: None,
                area: self.item_area(board, |g| {
                    g.add_polygon(polygon, &identity, offset);
                    Ok(())
                })?,
            });
        }

        for circle in board.circles.iter().filter(|c| is_layer(&c.layer)) {
            items.push(CopperItem {
                object: ObjectRef::Circle { device: None, circle: circle.id },
                layer: Some(circle.layer.clone()),
                net_signal: None,
                area: self.item_area(board, |g| {
                    g.add_circle(circle, &identity, offset);
                    Ok(())
                })?,
            });
        }

        for text in board.stroke_texts.iter().filter(|t| is_layer(&t.layer)) {
            items.push(CopperItem {
                object: ObjectRef::StrokeText { device: None, text: text.id },
                layer: Some(text.layer.clone()),
                net_signal: None,
                area: self.item_area(board, |g| {
                    g.add_stroke_text(text, offset);
                    Ok(())
                })?,
            });
        }

        for device in &board.devices {
            let transform = device.transform();
            for pad in device.pads() {
                for layer in layers.iter().filter(|l| pad.is_on_layer(l)) {
                    items.push(CopperItem {
                        object: ObjectRef::Pad { device: device.id, pad: pad.pad.id },
                        layer: Some(layer.clone()),
                        net_signal: pad.net_signal(),
                        area: self.item_area(board, |g| {
                            g.add_pad(&pad, layer, offset);
                            Ok(())
                        })?,
                    });
                }
            }
            for polygon in &device.footprint.polygons {
                let layer = transform.map_layer(&polygon.layer);
                if is_layer(&layer) {
                    items.push(CopperItem {
                        object: ObjectRef::Polygon { device: Some(device.id), polygon: polygon.id },
                        layer: Some(layer),
                        net_signal: None,
                        area: self.item_area(board, |g| {
                            g.add_polygon(polygon, &transform, offset);
                            Ok(())
                        })?,
                    });
                }
            }
            for circle in &device.footprint.circles {
                let layer = transform.map_layer(&circle.layer);
                if is_layer(&layer) {
                    items.push(CopperItem {
                        object: ObjectRef::Circle { device: Some(device.id), circle: circle.id },
                        layer: Some(layer),
                        net_signal: None,
                        area: self.item_area(board, |g| {
                            g.add_circle(circle, &transform, offset);
                            Ok(())
                        })?,
                    });
                }
            }
            for text in device.stroke_texts.iter().filter(|t| is_layer(&t.layer)) {
                items.push(CopperItem {
                    object: ObjectRef::StrokeText { device: Some(device.id), text: text.id },
                    layer: Some(text.layer.clone()),
                    net_signal: None,
                    area: self.item_area(board, |g| {
                        g.add_stroke_text(text, offset);
                        Ok(())
                    })?,
                });
            }
        }

        // Index bounding boxes; empty areas can never intersect
        let indexed: Vec<IndexedItem> = items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                item.area.bounds().map(|[min, max]| IndexedItem {
                    index,
                    bounds: AABB::from_corners(min, max),
                })
            })
            .collect();
        let tree = RTree::bulk_load(indexed);

        let mut candidates = 0usize;
        for (i, first) in items.iter().enumerate() {
            let Some([min, max]) = first.area.bounds() else {
                continue;
            };
            let search_bounds = AABB::from_corners(min, max);
            let mut neighbors: Vec<usize> = tree
                .locate_in_envelope_intersecting(&search_bounds)
                .map(|n| n.index)
                .filter(|&j| j > i)
                .collect();
            neighbors.sort_unstable();
            for j in neighbors {
                let second = &items[j];
                if !first.may_conflict_with(second) {
                    continue;
                }
                candidates += 1;
                let intersection = self.kernel.intersect(&first.area, &second.area);
                if !intersection.is_empty() {
                    self.emit_message(DrcMessage::new(
                        Violation::CopperCopperClearance {
                            first: first.to_ref(),
                            second: second.to_ref(),
                            clearance,
                        },
                        intersection.to_paths(),
                    ));
                }
            }
        }
        debug!(
            "[DRC] Copper clearance: {} item(s), {} candidate pair(s)",
            items.len(),
            candidates
        );

        self.emit_progress(progress_end);
        Ok(())
    }

    pub(super) fn check_copper_board_clearances(&mut self, board: &Board, progress_end: u8) -> Result<()> {
        let clearance = self.settings.min_copper_board_clearance;
        if clearance.is_zero() {
            return Ok(());
        }
        self.emit_status("Check board clearances...");

        let tolerance = self.kernel.max_arc_tolerance().get();
        let c = Length::from(clearance);
        let width = PositiveLength::at_least_one(c + c - tolerance - Length(1));
        let mut outline_strokes: Vec<Path> = board
            .polygons
            .iter()
            .filter(|p| p.layer == BOARD_OUTLINES)
            .flat_map(|p| p.path.to_outline_strokes(width))
            .collect();
        for device in &board.devices {
            let transform = device.transform();
            for polygon in &device.footprint.polygons {
                if transform.map_layer(&polygon.layer) == BOARD_OUTLINES {
                    outline_strokes.extend(transform.map_path(&polygon.path).to_outline_strokes(width));
                }
            }
        }
        let restricted = self.kernel.area_of_paths(&outline_strokes);
        if restricted.is_empty() {
            self.emit_progress(progress_end);
            return Ok(());
        }

        let identity = Transform::identity();
        let mut violations: Vec<(ObjectRef, Area)> = Vec::new();
        let mut check = |object: ObjectRef, area: Area| {
            let intersection = self.kernel.intersect(&restricted, &area);
            if !intersection.is_empty() {
                violations.push((object, intersection));
            }
        };

        for segment in &board.net_segments {
            for via in &segment.vias {
                let mut g = BoardPathGenerator::new(board, &self.kernel);
                g.add_via(via, Length::ZERO);
                check(ObjectRef::Via { segment: segment.id, via: via.id }, g.into_area());
            }
            for line in &segment.net_lines {
                let mut g = BoardPathGenerator::new(board, &self.kernel);
                g.add_net_line(segment, line, Length::ZERO)?;
                check(ObjectRef::NetLine { segment: segment.id, net_line: line.id }, g.into_area());
            }
        }

        if !self.quick {
            for plane in &board.planes {
                check(ObjectRef::Plane { plane: plane.id }, plane.fill_area(&self.kernel));
            }
        }

        for polygon in board.polygons.iter().filter(|p| board.layers.is_enabled_copper(&p.layer)) {
            let mut g = BoardPathGenerator::new(board, &self.kernel);
            g.add_polygon(polygon, &identity, Length::ZERO);
            check(ObjectRef::Polygon { device: None, polygon: polygon.id }, g.into_area());
        }
        for circle in board.circles.iter().filter(|c| board.layers.is_enabled_copper(&c.layer)) {
            let mut g = BoardPathGenerator::new(board, &self.kernel);
            g.add_circle(circle, &identity, Length::ZERO);
            check(ObjectRef::Circle { device: None, circle: circle.id }, g.into_area());
        }
        for text in board.stroke_texts.iter().filter(|t| board.layers.is_enabled_copper(&t.layer)) {
            let mut g = BoardPathGenerator::new(board, &self.kernel);
            g.add_stroke_text(text, Length::ZERO);
            check(ObjectRef::StrokeText { device: None, text: text.id }, g.into_area());
        }

        for device in &board.devices {
            let transform = device.transform();
            for pad in device.pads() {
                for layer in board.layers.enabled_copper_layers().filter(|l| pad.is_on_layer(&l.name)) {
                    let mut g = BoardPathGenerator::new(board, &self.kernel);
                    g.add_pad(&pad, &layer.name, Length::ZERO);
                    check(ObjectRef::Pad { device: device.id, pad: pad.pad.id }, g.into_area());
                }
            }
            for polygon in &device.footprint.polygons {
                if board.layers.is_enabled_copper(&transform.map_layer(&polygon.layer)) {
                    let mut g = BoardPathGenerator::new(board, &self.kernel);
                    g.add_polygon(polygon, &transform, Length::ZERO);
                    check(ObjectRef::Polygon { device: Some(device.id), polygon: polygon.id }, g.into_area());
                }
            }
            for circle in &device.footprint.circles {
                if board.layers.is_enabled_copper(&transform.map_layer(&circle.layer)) {
                    let mut g = BoardPathGenerator::new(board, &self.kernel);
                    g.add_circle(circle, &transform, Length::ZERO);
                    check(ObjectRef::Circle { device: Some(device.id), circle: circle.id }, g.into_area());
                }
            }
            for text in device.stroke_texts.iter().filter(|t| board.layers.is_enabled_copper(&t.layer)) {
                let mut g = BoardPathGenerator::new(board, &self.kernel);
                g.add_stroke_text(text, Length::ZERO);
                check(ObjectRef::StrokeText { device: Some(device.id), text: text.id }, g.into_area());
            }
        }

        for (object, intersection) in violations {
            self.emit_message(DrcMessage::new(
                Violation::CopperBoardClearance { object, clearance },
                intersection.to_paths(),
            ));
        }
        self.emit_progress(progress_end);
        Ok(())
    }

    pub(super) fn check_copper_hole_clearances(&mut self, board: &Board, progress_end: u8) -> Result<()> {
        let clearance = self.settings.min_copper_npth_clearance;
        if clearance.is_zero() {
            return Ok(());
        }
        self.emit_status("Check hole clearances...");

        // Copper on any layer
        let mut layer_areas = Vec::new();
        for layer in Self::enabled_copper_layers(board) {
            layer_areas.push(self.copper_area(board, &layer)?);
        }
        let copper = self.kernel.unite_all(layer_areas.iter());

        let tolerance = self.kernel.max_arc_tolerance().get();
        let offset = Length::from(clearance) - tolerance - Length(1);
        let identity = Transform::identity();
        let mut violations: Vec<(ObjectRef, Area)> = Vec::new();

        for hole in &board.holes {
            let mut g = BoardPathGenerator::new(board, &self.kernel);
            g.add_hole(hole, &identity, offset);
            let intersection = self.kernel.intersect(&copper, &g.into_area());
            if !intersection.is_empty() {
                violations.push((ObjectRef::Hole { device: None, hole: hole.id }, intersection));
            }
        }
        for device in &board.devices {
            let transform = device.transform();
            for hole in &device.footprint.holes {
                let mut g = BoardPathGenerator::new(board, &self.kernel);
                g.add_hole(hole, &transform, offset);
                let intersection = self.kernel.intersect(&copper, &g.into_area());
                if !intersection.is_empty() {
                    violations.push((ObjectRef::Hole { device: Some(device.id), hole: hole.id }, intersection));
                }
            }
        }

        for (hole, intersection) in violations {
            self.emit_message(DrcMessage::new(
                Violation::CopperHoleClearance { hole, clearance },
                intersection.to_paths(),
            ));
        }
        self.emit_progress(progress_end);
        Ok(())
    }
}
