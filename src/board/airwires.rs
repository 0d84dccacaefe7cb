//! Air wires: connections of a net that have no copper yet
//!
//! Anchors (pads, vias, used junctions) of each net are grouped into clusters
//! that are already joined by net lines or plane fills. The clusters are then
//! linked by a minimum spanning tree; every tree edge is one air wire.

use super::items::{NetLineAnchor, NetSignalId};
use super::Board;
use crate::error::Result;
use crate::geometry::Point;
use crate::kernel::PolygonKernel;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Endpoint of an air wire
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AirWireAnchor {
    Pad { device: u64, pad: u64 },
    Via { segment: u64, via: u64 },
    NetPoint { segment: u64, net_point: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AirWire {
    pub net_signal: NetSignalId,
    pub p1: AirWireAnchor,
    pub p2: AirWireAnchor,
    pub p1_position: Point,
    pub p2_position: Point,
}

/// Anchors of one net with union-find connectivity
#[derive(Default)]
struct NetGraph {
    nodes: Vec<(AirWireAnchor, Point)>,
    index: HashMap<AirWireAnchor, usize>,
    parent: Vec<usize>,
}

impl NetGraph {
    fn add(&mut self, anchor: AirWireAnchor, position: Point) -> usize {
        if let Some(&i) = self.index.get(&anchor) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push((anchor, position));
        self.index.insert(anchor, i);
        self.parent.push(i);
        i
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            // Keep the older node as root so cluster order stays stable
            let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[child] = root;
        }
    }

    /// Node indices grouped by cluster, clusters ordered by first node
    fn clusters(&mut self) -> Vec<Vec<usize>> {
        let mut by_root: IndexMap<usize, Vec<usize>> = IndexMap::new();
        for i in 0..self.nodes.len() {
            let root = self.find(i);
            by_root.entry(root).or_default().push(i);
        }
        by_root.into_values().collect()
    }
}

impl Board {
    /// Recomputes the air wires of all nets
    pub fn air_wires(&self, kernel: &PolygonKernel) -> Result<Vec<AirWire>> {
        let mut graphs: IndexMap<NetSignalId, NetGraph> = self
            .net_signals
            .iter()
            .map(|n| (n.id, NetGraph::default()))
            .collect();

        for device in &self.devices {
            for pad in device.pads() {
                if let Some(net) = pad.net_signal() {
                    let anchor = AirWireAnchor::Pad {
                        device: device.id,
                        pad: pad.pad.id,
                    };
                    graphs.entry(net).or_default().add(anchor, pad.position());
                }
            }
        }

        for segment in &self.net_segments {
            let Some(net) = segment.net_signal else {
                continue;
            };
            let graph = graphs.entry(net).or_default();
            for via in &segment.vias {
                let anchor = AirWireAnchor::Via {
                    segment: segment.id,
                    via: via.id,
                };
                graph.add(anchor, via.position);
            }
            for point in &segment.net_points {
                if segment.is_net_point_used(point.id) {
                    let anchor = AirWireAnchor::NetPoint {
                        segment: segment.id,
                        net_point: point.id,
                    };
                    graph.add(anchor, point.position);
                }
            }
            for line in &segment.net_lines {
                let (p1, p2) = self.net_line_positions(segment, line)?;
                let a = graph.add(to_air_wire_anchor(segment.id, line.start), p1);
                let b = graph.add(to_air_wire_anchor(segment.id, line.end), p2);
                graph.union(a, b);
            }
        }

        for plane in &self.planes {
            let Some(graph) = graphs.get_mut(&plane.net_signal) else {
                continue;
            };
            for fragment in plane.fill_area(kernel).tree() {
                let area = kernel.area_of_path(&fragment.outline);
                let area = kernel.subtract(&area, &kernel.area_of_paths(&fragment.holes));
                let inside: Vec<usize> = (0..graph.nodes.len())
                    .filter(|&i| area.contains(graph.nodes[i].1))
                    .collect();
                for pair in inside.windows(2) {
                    graph.union(pair[0], pair[1]);
                }
            }
        }

        let mut wires = Vec::new();
        for (net, graph) in graphs.iter_mut() {
            wires.extend(spanning_tree_wires(*net, graph));
        }
        Ok(wires)
    }
}

fn to_air_wire_anchor(segment: u64, anchor: NetLineAnchor) -> AirWireAnchor {
    match anchor {
        NetLineAnchor::NetPoint { id } => AirWireAnchor::NetPoint { segment, net_point: id },
        NetLineAnchor::Via { id } => AirWireAnchor::Via { segment, via: id },
        NetLineAnchor::Pad { device, pad } => AirWireAnchor::Pad { device, pad },
    }
}

/// Prim's algorithm over clusters, edge weight = closest anchor pair
fn spanning_tree_wires(net: NetSignalId, graph: &mut NetGraph) -> Vec<AirWire> {
    let clusters = graph.clusters();
    let k = clusters.len();
    if k < 2 {
        return Vec::new();
    }

    let closest = |a: &[usize], b: &[usize]| -> (i128, usize, usize) {
        let mut best = (i128::MAX, a[0], b[0]);
        for &i in a {
            for &j in b {
                let d = graph.nodes[i].1.distance_sq(graph.nodes[j].1);
                if d < best.0 {
                    best = (d, i, j);
                }
            }
        }
        best
    };

    let mut in_tree = vec![false; k];
    in_tree[0] = true;
    // Best connection of each outside cluster to the tree
    let mut best: Vec<(i128, usize, usize)> = (0..k).map(|c| closest(&clusters[0], &clusters[c])).collect();
    let mut wires = Vec::with_capacity(k - 1);
    for _ in 1..k {
        let Some(next) = (0..k)
            .filter(|&c| !in_tree[c])
            .min_by(|&a, &b| best[a].0.cmp(&best[b].0).then(a.cmp(&b)))
        else {
            break;
        };
        in_tree[next] = true;
        let (_, i, j) = best[next];
        let (a1, p1) = graph.nodes[i];
        let (a2, p2) = graph.nodes[j];
        wires.push(AirWire {
            net_signal: net,
            p1: a1,
            p2: a2,
            p1_position: p1,
            p2_position: p2,
        });
        for c in 0..k {
            if !in_tree[c] {
                let candidate = closest(&clusters[next], &clusters[c]);
                if candidate.0 < best[c].0 {
                    best[c] = candidate;
                }
            }
        }
    }
    wires
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{
        ComponentSide, Device, Footprint, FootprintPad, NetLine, NetSegment, NetSignal, PadShape,
    };
    use crate::geometry::{Angle, Length, Path, PositiveLength, Ratio};

    fn pl(nm: i64) -> PositiveLength {
        PositiveLength::new(Length(nm)).unwrap()
    }

    fn smd_pad(id: u64, x: i64, net: u64) -> FootprintPad {
        FootprintPad {
            id,
            name: id.to_string(),
            position: Point::nm(x, 0),
            rotation: Angle::ZERO,
            shape: PadShape::RoundedRect,
            width: pl(500_000),
            height: pl(500_000),
            radius: Ratio::default(),
            custom_outline: Path::default(),
            component_side: ComponentSide::Top,
            holes: Vec::new(),
            net_signal: Some(NetSignalId(net)),
        }
    }

    fn board_with_three_pads() -> Board {
        Board {
            net_signals: vec![NetSignal { id: NetSignalId(1), name: "GND".into() }],
            devices: vec![Device {
                id: 1,
                component: 1,
                name: "U1".into(),
                position: Point::ORIGIN,
                rotation: Angle::ZERO,
                mirrored: false,
                footprint: Footprint {
                    pads: vec![smd_pad(1, 0, 1), smd_pad(2, 1_000_000, 1), smd_pad(3, 5_000_000, 1)],
                    ..Default::default()
                },
                stroke_texts: Vec::new(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_unrouted_pads_form_spanning_tree() {
        let board = board_with_three_pads();
        let wires = board.air_wires(&PolygonKernel::default()).unwrap();
        assert_eq!(wires.len(), 2);
        assert_eq!(wires[0].p1, AirWireAnchor::Pad { device: 1, pad: 1 });
        assert_eq!(wires[0].p2, AirWireAnchor::Pad { device: 1, pad: 2 });
        assert_eq!(wires[1].p1, AirWireAnchor::Pad { device: 1, pad: 2 });
        assert_eq!(wires[1].p2, AirWireAnchor::Pad { device: 1, pad: 3 });
    }

    #[test]
    fn test_routed_connection_removes_air_wire() {
        let mut board = board_with_three_pads();
        board.net_segments.push(NetSegment {
            id: 1,
            net_signal: Some(NetSignalId(1)),
            net_lines: vec![NetLine {
                id: 1,
                start: NetLineAnchor::Pad { device: 1, pad: 2 },
                end: NetLineAnchor::Pad { device: 1, pad: 3 },
                layer: "top_cu".into(),
                width: pl(200_000),
            }],
            ..Default::default()
        });
        let wires = board.air_wires(&PolygonKernel::default()).unwrap();
        assert_eq!(wires.len(), 1);
        assert_eq!(wires[0].p2, AirWireAnchor::Pad { device: 1, pad: 2 });
    }
}
