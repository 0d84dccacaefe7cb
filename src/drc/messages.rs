//! Rule check messages
//!
//! `Violation` is a closed set, one variant per rule kind. Each message also
//! carries location paths meant for highlighting only.

use super::settings::AllowedSlots;
use crate::board::{AirWireAnchor, NetSignalId};
use crate::geometry::{Length, Path, UnsignedLength};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Board object a message refers to; `device` is set for footprint items
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectRef {
    Via { segment: u64, via: u64 },
    NetLine { segment: u64, net_line: u64 },
    Plane { plane: u64 },
    Polygon { device: Option<u64>, polygon: u64 },
    Circle { device: Option<u64>, circle: u64 },
    StrokeText { device: Option<u64>, text: u64 },
    Hole { device: Option<u64>, hole: u64 },
    Pad { device: u64, pad: u64 },
    PadHole { device: u64, pad: u64, hole: u64 },
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let owner = |device: &Option<u64>| match device {
            Some(d) => format!(" of device {}", d),
            None => String::new(),
        };
        match self {
            ObjectRef::Via { via, .. } => write!(f, "via {}", via),
            ObjectRef::NetLine { net_line, .. } => write!(f, "trace {}", net_line),
            ObjectRef::Plane { plane } => write!(f, "plane {}", plane),
            ObjectRef::Polygon { device, polygon } => write!(f, "polygon {}{}", polygon, owner(device)),
            ObjectRef::Circle { device, circle } => write!(f, "circle {}{}", circle, owner(device)),
            ObjectRef::StrokeText { device, text } => write!(f, "text {}{}", text, owner(device)),
            ObjectRef::Hole { device, hole } => write!(f, "hole {}{}", hole, owner(device)),
            ObjectRef::Pad { device, pad } => write!(f, "pad {} of device {}", pad, device),
            ObjectRef::PadHole { device, pad, hole } => {
                write!(f, "hole {} of pad {} of device {}", hole, pad, device)
            }
        }
    }
}

/// One side of a copper clearance violation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopperItemRef {
    pub object: ObjectRef,
    /// `None` for through-hole items present on every copper layer
    pub layer: Option<String>,
    pub net_signal: Option<NetSignalId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    MinimumWidth {
        object: ObjectRef,
        min_width: UnsignedLength,
    },
    CopperCopperClearance {
        first: CopperItemRef,
        second: CopperItemRef,
        clearance: UnsignedLength,
    },
    CopperBoardClearance {
        object: ObjectRef,
        clearance: UnsignedLength,
    },
    CopperHoleClearance {
        hole: ObjectRef,
        clearance: UnsignedLength,
    },
    MinimumAnnularRing {
        object: ObjectRef,
        annular_width: UnsignedLength,
    },
    MinimumDrillDiameter {
        object: ObjectRef,
        min_diameter: UnsignedLength,
    },
    MinimumSlotWidth {
        object: ObjectRef,
        min_width: UnsignedLength,
    },
    ForbiddenSlot {
        hole: ObjectRef,
        allowed: AllowedSlots,
    },
    InvalidPadConnection {
        device: u64,
        pad: u64,
        layer: String,
    },
    CourtyardOverlap {
        device1: u64,
        device2: u64,
    },
    MissingDevice {
        component: u64,
        name: String,
    },
    MissingConnection {
        net_signal: NetSignalId,
        p1: AirWireAnchor,
        p2: AirWireAnchor,
    },
    EmptyNetSegment {
        segment: u64,
    },
    UnconnectedJunction {
        segment: u64,
        net_point: u64,
    },
}

/// Fieldless discriminant of `Violation`, for filtering and counting
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrcMessageKind {
    MinimumWidth,
    CopperCopperClearance,
    CopperBoardClearance,
    CopperHoleClearance,
    MinimumAnnularRing,
    MinimumDrillDiameter,
    MinimumSlotWidth,
    ForbiddenSlot,
    InvalidPadConnection,
    CourtyardOverlap,
    MissingDevice,
    MissingConnection,
    EmptyNetSegment,
    UnconnectedJunction,
}

impl DrcMessageKind {
    /// Kinds produced by the checks of a quick run
    pub fn is_quick_check(self) -> bool {
        matches!(
            self,
            DrcMessageKind::MinimumWidth
                | DrcMessageKind::CopperCopperClearance
                | DrcMessageKind::CopperBoardClearance
                | DrcMessageKind::CopperHoleClearance
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrcMessage {
    pub violation: Violation,
    pub locations: Vec<Path>,
}

impl DrcMessage {
    pub fn new(violation: Violation, locations: Vec<Path>) -> Self {
        DrcMessage { violation, locations }
    }

    pub fn kind(&self) -> DrcMessageKind {
        match &self.violation {
            Violation::MinimumWidth { .. } => DrcMessageKind::MinimumWidth,
            Violation::CopperCopperClearance { .. } => DrcMessageKind::CopperCopperClearance,
            Violation::CopperBoardClearance { .. } => DrcMessageKind::CopperBoardClearance,
            Violation::CopperHoleClearance { .. } => DrcMessageKind::CopperHoleClearance,
            Violation::MinimumAnnularRing { .. } => DrcMessageKind::MinimumAnnularRing,
            Violation::MinimumDrillDiameter { .. } => DrcMessageKind::MinimumDrillDiameter,
            Violation::MinimumSlotWidth { .. } => DrcMessageKind::MinimumSlotWidth,
            Violation::ForbiddenSlot { .. } => DrcMessageKind::ForbiddenSlot,
            Violation::InvalidPadConnection { .. } => DrcMessageKind::InvalidPadConnection,
            Violation::CourtyardOverlap { .. } => DrcMessageKind::CourtyardOverlap,
            Violation::MissingDevice { .. } => DrcMessageKind::MissingDevice,
            Violation::MissingConnection { .. } => DrcMessageKind::MissingConnection,
            Violation::EmptyNetSegment { .. } => DrcMessageKind::EmptyNetSegment,
            Violation::UnconnectedJunction { .. } => DrcMessageKind::UnconnectedJunction,
        }
    }

    /// Human-readable description, lengths in millimetres
    pub fn message(&self) -> String {
        let mm = |l: &UnsignedLength| Length::from(*l).format_mm();
        match &self.violation {
            Violation::MinimumWidth { object, min_width } => {
                format!("Minimum width of {} < {}", object, mm(min_width))
            }
            Violation::CopperCopperClearance { first, second, clearance } => format!(
                "Clearance between {} and {} < {}",
                copper_item_label(first),
                copper_item_label(second),
                mm(clearance)
            ),
            Violation::CopperBoardClearance { object, clearance } => {
                format!("Clearance between {} and board outline < {}", object, mm(clearance))
            }
            Violation::CopperHoleClearance { hole, clearance } => {
                format!("Clearance between {} and copper < {}", hole, mm(clearance))
            }
            Violation::MinimumAnnularRing { object, annular_width } => {
                format!("Annular ring of {} < {}", object, mm(annular_width))
            }
            Violation::MinimumDrillDiameter { object, min_diameter } => {
                format!("Drill diameter of {} < {}", object, mm(min_diameter))
            }
            Violation::MinimumSlotWidth { object, min_width } => {
                format!("Slot width of {} < {}", object, mm(min_width))
            }
            Violation::ForbiddenSlot { hole, allowed } => {
                format!("Slot shape of {} not allowed ({:?})", hole, allowed)
            }
            Violation::InvalidPadConnection { device, pad, layer } => {
                format!("Invalid connection of pad {} of device {} on '{}'", pad, device, layer)
            }
            Violation::CourtyardOverlap { device1, device2 } => {
                format!("Overlapping courtyards of devices {} and {}", device1, device2)
            }
            Violation::MissingDevice { name, .. } => format!("Missing device: '{}'", name),
            Violation::MissingConnection { net_signal, .. } => {
                format!("Missing connection in net {}", net_signal.0)
            }
            Violation::EmptyNetSegment { segment } => format!("Empty segment {}", segment),
            Violation::UnconnectedJunction { net_point, .. } => {
                format!("Unconnected junction {}", net_point)
            }
        }
    }
}

fn copper_item_label(item: &CopperItemRef) -> String {
    match &item.layer {
        Some(layer) => format!("{} on '{}'", item.object, layer),
        None => item.object.to_string(),
    }
}
