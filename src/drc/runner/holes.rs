//! Annular ring, drill diameter and slot checks

use super::BoardDesignRuleCheck;
use crate::board::{Board, Hole};
use crate::drc::messages::{DrcMessage, ObjectRef, Violation};
use crate::drc::settings::AllowedSlots;
use crate::error::Result;
use crate::geometry::{Length, Path, PositiveLength, Transform};

/// Hole path stroked at its diameter, mapped to board coordinates
fn hole_location(hole: &Hole, map: impl Fn(&Path) -> Path) -> Vec<Path> {
    map(&hole.path).to_outline_strokes(hole.diameter)
}

/// Which holes a minimum-size check looks at
#[derive(Clone, Copy, PartialEq, Eq)]
enum HoleKind {
    Round,
    Slot,
}

impl HoleKind {
    fn matches(self, hole: &Hole) -> bool {
        hole.is_slot() == (self == HoleKind::Slot)
    }
}

impl<'a> BoardDesignRuleCheck<'a> {
    pub(super) fn check_minimum_pth_annular_ring(&mut self, board: &Board, progress_end: u8) -> Result<()> {
        let annular_width = self.settings.min_pth_annular_ring;
        if annular_width.is_zero() {
            return Ok(());
        }
        self.emit_status("Check minimum PTH annular rings...");

        // Copper present on all layers
        let mut layer_areas = Vec::new();
        for layer in Self::enabled_copper_layers(board) {
            layer_areas.push(self.copper_area(board, &layer)?);
        }
        let tht_copper = self.kernel.intersect_all(&layer_areas);
        let ring = Length::from(annular_width);

        for segment in &board.net_segments {
            for via in &segment.vias {
                let Ok(diameter) = PositiveLength::new(via.drill_diameter.get() + ring * 2) else {
                    continue;
                };
                let required = self
                    .kernel
                    .area_of_path(&Path::circle(diameter).translated(via.position));
                let remaining = self.kernel.subtract(&required, &tht_copper);
                if !remaining.is_empty() {
                    self.emit_message(DrcMessage::new(
                        Violation::MinimumAnnularRing {
                            object: ObjectRef::Via { segment: segment.id, via: via.id },
                            annular_width,
                        },
                        remaining.to_paths(),
                    ));
                }
            }
        }

        for device in &board.devices {
            for pad in device.pads() {
                let mut outlines = Vec::new();
                for hole in &pad.pad.holes {
                    let Ok(diameter) = PositiveLength::new(hole.diameter.get() + ring * 2) else {
                        continue;
                    };
                    outlines.extend(
                        hole.path
                            .to_outline_strokes(diameter)
                            .iter()
                            .map(|p| pad.map_path(p)),
                    );
                }
                if outlines.is_empty() {
                    continue;
                }
                let required = self.kernel.area_of_paths(&outlines);
                let remaining = self.kernel.subtract(&required, &tht_copper);
                if !remaining.is_empty() {
                    self.emit_message(DrcMessage::new(
                        Violation::MinimumAnnularRing {
                            object: ObjectRef::Pad { device: device.id, pad: pad.pad.id },
                            annular_width,
                        },
                        remaining.to_paths(),
                    ));
                }
            }
        }

        self.emit_progress(progress_end);
        Ok(())
    }

    /// Board and footprint holes below a minimum size
    fn check_npth_size(&mut self, board: &Board, kind: HoleKind, progress_end: u8) {
        let (min, status) = match kind {
            HoleKind::Round => (self.settings.min_npth_drill_diameter, "Check minimum NPTH drill diameters..."),
            HoleKind::Slot => (self.settings.min_npth_slot_width, "Check minimum NPTH slot width..."),
        };
        if min.is_zero() {
            return;
        }
        self.emit_status(status);
        let violation = |object: ObjectRef| match kind {
            HoleKind::Round => Violation::MinimumDrillDiameter { object, min_diameter: min },
            HoleKind::Slot => Violation::MinimumSlotWidth { object, min_width: min },
        };

        for hole in &board.holes {
            if kind.matches(hole) && hole.diameter.get() < Length::from(min) {
                self.emit_message(DrcMessage::new(
                    violation(ObjectRef::Hole { device: None, hole: hole.id }),
                    hole_location(hole, Path::clone),
                ));
            }
        }
        for device in &board.devices {
            let transform = device.transform();
            for hole in &device.footprint.holes {
                if kind.matches(hole) && hole.diameter.get() < Length::from(min) {
                    self.emit_message(DrcMessage::new(
                        violation(ObjectRef::Hole { device: Some(device.id), hole: hole.id }),
                        hole_location(hole, |p| transform.map_path(p)),
                    ));
                }
            }
        }
        self.emit_progress(progress_end);
    }

    pub(super) fn check_minimum_npth_drill_diameter(&mut self, board: &Board, progress_end: u8) -> Result<()> {
        self.check_npth_size(board, HoleKind::Round, progress_end);
        Ok(())
    }

    pub(super) fn check_minimum_npth_slot_width(&mut self, board: &Board, progress_end: u8) -> Result<()> {
        self.check_npth_size(board, HoleKind::Slot, progress_end);
        Ok(())
    }

    pub(super) fn check_minimum_pth_drill_diameter(&mut self, board: &Board, progress_end: u8) -> Result<()> {
        let min_diameter = self.settings.min_pth_drill_diameter;
        if min_diameter.is_zero() {
            return Ok(());
        }
        self.emit_status("Check minimum PTH drill diameters...");
        let min = Length::from(min_diameter);

        for segment in &board.net_segments {
            for via in &segment.vias {
                if via.drill_diameter.get() < min {
                    self.emit_message(DrcMessage::new(
                        Violation::MinimumDrillDiameter {
                            object: ObjectRef::Via { segment: segment.id, via: via.id },
                            min_diameter,
                        },
                        vec![Path::circle(via.drill_diameter).translated(via.position)],
                    ));
                }
            }
        }
        self.check_pad_holes(board, HoleKind::Round, min, |object| Violation::MinimumDrillDiameter {
            object,
            min_diameter,
        });

        self.emit_progress(progress_end);
        Ok(())
    }

    pub(super) fn check_minimum_pth_slot_width(&mut self, board: &Board, progress_end: u8) -> Result<()> {
        let min_width = self.settings.min_pth_slot_width;
        if min_width.is_zero() {
            return Ok(());
        }
        self.emit_status("Check minimum PTH slot width...");
        self.check_pad_holes(board, HoleKind::Slot, Length::from(min_width), |object| {
            Violation::MinimumSlotWidth { object, min_width }
        });
        self.emit_progress(progress_end);
        Ok(())
    }

    /// Pad holes of one kind below `min`
    fn check_pad_holes(
        &mut self,
        board: &Board,
        kind: HoleKind,
        min: Length,
        violation: impl Fn(ObjectRef) -> Violation,
    ) {
        for device in &board.devices {
            for pad in device.pads() {
                for hole in &pad.pad.holes {
                    if kind.matches(hole) && hole.diameter.get() < min {
                        let object = ObjectRef::PadHole {
                            device: device.id,
                            pad: pad.pad.id,
                            hole: hole.id,
                        };
                        self.emit_message(DrcMessage::new(
                            violation(object),
                            hole_location(hole, |p| pad.map_path(p)),
                        ));
                    }
                }
            }
        }
    }

    pub(super) fn check_allowed_npth_slots(&mut self, board: &Board, progress_end: u8) -> Result<()> {
        let allowed = self.settings.allowed_npth_slots;
        if allowed == AllowedSlots::Any {
            return Ok(());
        }
        self.emit_status("Check for disallowed NPTH slots...");

        for hole in board.holes.iter().filter(|h| allowed.forbids(h)) {
            self.emit_message(DrcMessage::new(
                Violation::ForbiddenSlot {
                    hole: ObjectRef::Hole { device: None, hole: hole.id },
                    allowed,
                },
                hole_location(hole, Path::clone),
            ));
        }
        for device in &board.devices {
            let transform: Transform = device.transform();
            for hole in device.footprint.holes.iter().filter(|h| allowed.forbids(h)) {
                self.emit_message(DrcMessage::new(
                    Violation::ForbiddenSlot {
                        hole: ObjectRef::Hole { device: Some(device.id), hole: hole.id },
                        allowed,
                    },
                    hole_location(hole, |p| transform.map_path(p)),
                ));
            }
        }

        self.emit_progress(progress_end);
        Ok(())
    }

    pub(super) fn check_allowed_pth_slots(&mut self, board: &Board, progress_end: u8) -> Result<()> {
        let allowed = self.settings.allowed_pth_slots;
        if allowed == AllowedSlots::Any {
            return Ok(());
        }
        self.emit_status("Check for disallowed PTH slots...");

        for device in &board.devices {
            for pad in device.pads() {
                for hole in pad.pad.holes.iter().filter(|h| allowed.forbids(h)) {
                    self.emit_message(DrcMessage::new(
                        Violation::ForbiddenSlot {
                            hole: ObjectRef::PadHole {
                                device: device.id,
                                pad: pad.pad.id,
                                hole: hole.id,
                            },
                            allowed,
                        },
                        hole_location(hole, |p| pad.map_path(p)),
                    ));
                }
            }
        }

        self.emit_progress(progress_end);
        Ok(())
    }
}
