//! Board items: net segments, planes, polygons, circles, texts, holes

use crate::geometry::{Angle, Path, Point, PositiveLength, Transform, UnsignedLength};
use serde::{Deserialize, Serialize};

/// Net identity; equality is by id, never by name
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetSignalId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetSignal {
    pub id: NetSignalId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Via {
    pub id: u64,
    pub position: Point,
    /// Outer copper diameter
    pub size: PositiveLength,
    pub drill_diameter: PositiveLength,
}

/// Junction point of net lines
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetPoint {
    pub id: u64,
    pub position: Point,
}

/// Endpoint of a net line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NetLineAnchor {
    NetPoint { id: u64 },
    Via { id: u64 },
    Pad { device: u64, pad: u64 },
}

/// Straight copper trace between two anchors
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetLine {
    pub id: u64,
    pub start: NetLineAnchor,
    pub end: NetLineAnchor,
    pub layer: String,
    pub width: PositiveLength,
}

impl NetLine {
    pub fn is_attached_to(&self, anchor: NetLineAnchor) -> bool {
        self.start == anchor || self.end == anchor
    }
}

/// Connected group of vias, junctions and traces of one net
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetSegment {
    pub id: u64,
    #[serde(default)]
    pub net_signal: Option<NetSignalId>,
    #[serde(default)]
    pub vias: Vec<Via>,
    #[serde(default)]
    pub net_points: Vec<NetPoint>,
    #[serde(default)]
    pub net_lines: Vec<NetLine>,
}

impl NetSegment {
    /// A segment without vias and net lines is stale
    pub fn is_used(&self) -> bool {
        !self.vias.is_empty() || !self.net_lines.is_empty()
    }

    pub fn via(&self, id: u64) -> Option<&Via> {
        self.vias.iter().find(|v| v.id == id)
    }

    pub fn net_point(&self, id: u64) -> Option<&NetPoint> {
        self.net_points.iter().find(|p| p.id == id)
    }

    pub fn is_net_point_used(&self, id: u64) -> bool {
        let anchor = NetLineAnchor::NetPoint { id };
        self.net_lines.iter().any(|l| l.is_attached_to(anchor))
    }
}

/// Copper pour; `fragments` holds the current fill
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plane {
    pub id: u64,
    pub layer: String,
    pub net_signal: NetSignalId,
    pub outline: Path,
    pub min_width: UnsignedLength,
    #[serde(default)]
    pub fragments: Vec<PlaneFragment>,
}

/// One connected piece of a plane fill
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaneFragment {
    pub outline: Path,
    #[serde(default)]
    pub holes: Vec<Path>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygon {
    pub id: u64,
    pub layer: String,
    #[serde(default)]
    pub line_width: UnsignedLength,
    #[serde(default)]
    pub filled: bool,
    pub path: Path,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub id: u64,
    pub layer: String,
    #[serde(default)]
    pub line_width: UnsignedLength,
    #[serde(default)]
    pub filled: bool,
    pub center: Point,
    pub diameter: PositiveLength,
}

/// Text rendered with a stroke font; `paths` are glyph strokes in text coordinates
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeText {
    pub id: u64,
    pub layer: String,
    #[serde(default)]
    pub text: String,
    pub position: Point,
    #[serde(default)]
    pub rotation: Angle,
    #[serde(default)]
    pub mirrored: bool,
    pub stroke_width: UnsignedLength,
    #[serde(default)]
    pub paths: Vec<Path>,
}

impl StrokeText {
    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.rotation, self.mirrored)
    }

    /// Glyph strokes in board coordinates
    pub fn board_paths(&self) -> Vec<Path> {
        self.transform().map_paths(&self.paths)
    }
}

/// Drill: one vertex is a round hole, more vertices make a slot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hole {
    pub id: u64,
    pub diameter: PositiveLength,
    pub path: Path,
}

impl Hole {
    pub fn round(id: u64, position: Point, diameter: PositiveLength) -> Self {
        Hole {
            id,
            diameter,
            path: Path::from_points(&[position]),
        }
    }

    pub fn is_slot(&self) -> bool {
        self.path.len() > 1
    }

    pub fn is_multi_segment_slot(&self) -> bool {
        self.path.len() > 2
    }

    pub fn is_curved_slot(&self) -> bool {
        self.path.has_arcs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Length, Vertex};

    fn pl(nm: i64) -> PositiveLength {
        PositiveLength::new(Length(nm)).unwrap()
    }

    #[test]
    fn test_hole_classification() {
        let round = Hole::round(1, Point::nm(0, 0), pl(300_000));
        assert!(!round.is_slot());
        let single = Hole {
            id: 2,
            diameter: pl(1_000_000),
            path: Path::line(Point::nm(0, 0), Point::nm(2_000_000, 0)),
        };
        assert!(single.is_slot() && !single.is_multi_segment_slot() && !single.is_curved_slot());
        let curved = Hole {
            id: 3,
            diameter: pl(1_000_000),
            path: Path::new(vec![
                Vertex::new(Point::nm(0, 0), Angle::deg(90)),
                Vertex::straight(Point::nm(2_000_000, 2_000_000)),
            ]),
        };
        assert!(curved.is_curved_slot() && !curved.is_multi_segment_slot());
    }

    #[test]
    fn test_net_segment_usage() {
        let mut seg = NetSegment {
            id: 1,
            net_points: vec![NetPoint { id: 10, position: Point::ORIGIN }],
            ..Default::default()
        };
        assert!(!seg.is_used());
        assert!(!seg.is_net_point_used(10));
        seg.net_lines.push(NetLine {
            id: 20,
            start: NetLineAnchor::NetPoint { id: 10 },
            end: NetLineAnchor::Pad { device: 1, pad: 1 },
            layer: "top_cu".into(),
            width: pl(100_000),
        });
        assert!(seg.is_used());
        assert!(seg.is_net_point_used(10));
    }

    #[test]
    fn test_anchor_json_shape() {
        let a: NetLineAnchor = serde_json::from_str(r#"{"type":"pad","device":3,"pad":4}"#).unwrap();
        assert_eq!(a, NetLineAnchor::Pad { device: 3, pad: 4 });
    }
}
