//! Rule check settings
//!
//! Every threshold of 0 disables its check. The slot policies disable their
//! check when set to `Any`.

use crate::board::Hole;
use crate::geometry::{Length, UnsignedLength};
use serde::{Deserialize, Serialize};

/// Permitted hole shapes, ordered from strictest to most permissive
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowedSlots {
    None,
    SingleSegmentStraight,
    MultiSegmentStraight,
    Any,
}

impl AllowedSlots {
    /// True if the hole shape exceeds this allowance
    pub fn forbids(self, hole: &Hole) -> bool {
        if hole.is_curved_slot() {
            self < AllowedSlots::Any
        } else if hole.is_multi_segment_slot() {
            self < AllowedSlots::MultiSegmentStraight
        } else if hole.is_slot() {
            self < AllowedSlots::SingleSegmentStraight
        } else {
            false
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrcSettings {
    pub min_copper_width: UnsignedLength,
    pub min_copper_copper_clearance: UnsignedLength,
    pub min_copper_board_clearance: UnsignedLength,
    pub min_copper_npth_clearance: UnsignedLength,
    pub min_pth_annular_ring: UnsignedLength,
    pub min_npth_drill_diameter: UnsignedLength,
    pub min_npth_slot_width: UnsignedLength,
    pub min_pth_drill_diameter: UnsignedLength,
    pub min_pth_slot_width: UnsignedLength,
    pub allowed_npth_slots: AllowedSlots,
    pub allowed_pth_slots: AllowedSlots,
}

impl DrcSettings {
    /// Settings with every check disabled
    pub fn disabled() -> Self {
        DrcSettings {
            min_copper_width: UnsignedLength::ZERO,
            min_copper_copper_clearance: UnsignedLength::ZERO,
            min_copper_board_clearance: UnsignedLength::ZERO,
            min_copper_npth_clearance: UnsignedLength::ZERO,
            min_pth_annular_ring: UnsignedLength::ZERO,
            min_npth_drill_diameter: UnsignedLength::ZERO,
            min_npth_slot_width: UnsignedLength::ZERO,
            min_pth_drill_diameter: UnsignedLength::ZERO,
            min_pth_slot_width: UnsignedLength::ZERO,
            allowed_npth_slots: AllowedSlots::Any,
            allowed_pth_slots: AllowedSlots::Any,
        }
    }

    /// Human-readable dump for logs
    pub fn summary(&self) -> String {
        let fmt = |l: UnsignedLength| -> String {
            if l.is_zero() {
                "off".to_string()
            } else {
                Length::from(l).format_mm()
            }
        };
        format!(
            "width={} cu-cu={} cu-board={} cu-npth={} ring={} npth-drill={} npth-slot={} pth-drill={} pth-slot={} npth-slots={:?} pth-slots={:?}",
            fmt(self.min_copper_width),
            fmt(self.min_copper_copper_clearance),
            fmt(self.min_copper_board_clearance),
            fmt(self.min_copper_npth_clearance),
            fmt(self.min_pth_annular_ring),
            fmt(self.min_npth_drill_diameter),
            fmt(self.min_npth_slot_width),
            fmt(self.min_pth_drill_diameter),
            fmt(self.min_pth_slot_width),
            self.allowed_npth_slots,
            self.allowed_pth_slots,
        )
    }
}

impl Default for DrcSettings {
    fn default() -> Self {
        Self {
            min_copper_width: UnsignedLength::from_nm(200_000),
            min_copper_copper_clearance: UnsignedLength::from_nm(200_000),
            min_copper_board_clearance: UnsignedLength::from_nm(300_000),
            min_copper_npth_clearance: UnsignedLength::from_nm(250_000),
            min_pth_annular_ring: UnsignedLength::from_nm(200_000),
            min_npth_drill_diameter: UnsignedLength::from_nm(300_000),
            min_npth_slot_width: UnsignedLength::from_nm(1_000_000),
            min_pth_drill_diameter: UnsignedLength::from_nm(300_000),
            min_pth_slot_width: UnsignedLength::from_nm(700_000),
            allowed_npth_slots: AllowedSlots::SingleSegmentStraight,
            allowed_pth_slots: AllowedSlots::Any,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Angle, Path, Point, PositiveLength, Vertex};

    fn hole(path: Path) -> Hole {
        Hole {
            id: 1,
            diameter: PositiveLength::new(Length(500_000)).unwrap(),
            path,
        }
    }

    #[test]
    fn test_allowed_slots_order() {
        assert!(AllowedSlots::None < AllowedSlots::SingleSegmentStraight);
        assert!(AllowedSlots::SingleSegmentStraight < AllowedSlots::MultiSegmentStraight);
        assert!(AllowedSlots::MultiSegmentStraight < AllowedSlots::Any);
    }

    #[test]
    fn test_forbids() {
        let round = hole(Path::from_points(&[Point::ORIGIN]));
        let single = hole(Path::line(Point::ORIGIN, Point::nm(1_000_000, 0)));
        let multi = hole(Path::from_points(&[
            Point::ORIGIN,
            Point::nm(1_000_000, 0),
            Point::nm(1_000_000, 1_000_000),
        ]));
        let curved = hole(Path::new(vec![
            Vertex::new(Point::ORIGIN, Angle::deg(90)),
            Vertex::straight(Point::nm(1_000_000, 0)),
        ]));

        assert!(!AllowedSlots::None.forbids(&round));
        assert!(AllowedSlots::None.forbids(&single));
        assert!(!AllowedSlots::SingleSegmentStraight.forbids(&single));
        assert!(AllowedSlots::SingleSegmentStraight.forbids(&multi));
        assert!(!AllowedSlots::MultiSegmentStraight.forbids(&multi));
        assert!(AllowedSlots::MultiSegmentStraight.forbids(&curved));
        assert!(!AllowedSlots::Any.forbids(&curved));
    }

    #[test]
    fn test_partial_settings_json() {
        let settings: DrcSettings = serde_json::from_str(r#"{"min_copper_width": 0}"#).unwrap();
        assert!(settings.min_copper_width.is_zero());
        assert_eq!(settings.min_copper_board_clearance, UnsignedLength::from_nm(300_000));
    }
}
