//! Paths with optional arc segments
//!
//! A path is a list of vertices where each vertex carries the angle of the
//! arc leading to the next vertex. Closed paths repeat their first point as
//! the last vertex.

use super::length::{Length, PositiveLength};
use super::point::{Angle, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Path vertex with the arc angle of the following segment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    pub pos: Point,
    #[serde(default)]
    pub angle: Angle,
}

impl Vertex {
    pub fn new(pos: Point, angle: Angle) -> Self {
        Vertex { pos, angle }
    }

    pub fn straight(pos: Point) -> Self {
        Vertex { pos, angle: Angle::ZERO }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    vertices: Vec<Vertex>,
}

impl Path {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Path { vertices }
    }

    /// Straight segments through the given points
    pub fn from_points(points: &[Point]) -> Self {
        Path {
            vertices: points.iter().copied().map(Vertex::straight).collect(),
        }
    }

    pub fn line(p1: Point, p2: Point) -> Self {
        Path::from_points(&[p1, p2])
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        match (self.vertices.first(), self.vertices.last()) {
            (Some(first), Some(last)) => self.vertices.len() >= 2 && first.pos == last.pos,
            _ => false,
        }
    }

    /// True if any segment is an arc
    pub fn has_arcs(&self) -> bool {
        let segments = self.vertices.len().saturating_sub(1);
        self.vertices[..segments].iter().any(|v| !v.angle.is_zero())
    }

    pub fn to_closed_path(&self) -> Path {
        let mut path = self.clone();
        if !path.is_closed() {
            if let Some(first) = path.vertices.first().copied() {
                path.vertices.push(Vertex::straight(first.pos));
            }
        }
        path
    }

    pub fn translated(&self, offset: Point) -> Path {
        Path {
            vertices: self
                .vertices
                .iter()
                .map(|v| Vertex::new(v.pos + offset, v.angle))
                .collect(),
        }
    }

    pub fn rotated(&self, angle: Angle, center: Point) -> Path {
        Path {
            vertices: self
                .vertices
                .iter()
                .map(|v| Vertex::new(v.pos.rotated(angle, center), v.angle))
                .collect(),
        }
    }

    /// Mirrors about the vertical axis through `center`; arcs change direction
    pub fn mirrored_horizontal(&self, center: Point) -> Path {
        Path {
            vertices: self
                .vertices
                .iter()
                .map(|v| Vertex::new(v.pos.mirrored_horizontal(center), -v.angle))
                .collect(),
        }
    }

    /// Circle centered at the origin, starting at angle zero
    pub fn circle(diameter: PositiveLength) -> Path {
        let r = diameter.get().0 / 2;
        Path::new(vec![
            Vertex::new(Point::nm(r, 0), Angle::deg(180)),
            Vertex::new(Point::nm(-r, 0), Angle::deg(180)),
            Vertex::straight(Point::nm(r, 0)),
        ])
    }

    /// Stadium of the given width around the segment p1-p2
    pub fn obround(p1: Point, p2: Point, width: PositiveLength) -> Path {
        if p1 == p2 {
            return Path::circle(width).translated(p1);
        }
        let [x1, y1] = p1.to_f64();
        let [x2, y2] = p2.to_f64();
        let len = (x2 - x1).hypot(y2 - y1);
        let r = width.get().0 as f64 / 2.0;
        let n = Point::from_f64([-(y2 - y1) / len * r, (x2 - x1) / len * r]);
        Path::new(vec![
            Vertex::straight(p1 + n),
            Vertex::new(p2 + n, Angle::deg(-180)),
            Vertex::straight(p2 - n),
            Vertex::new(p1 - n, Angle::deg(-180)),
            Vertex::straight(p1 + n),
        ])
    }

    /// Outline of an arc segment stroked with round caps
    pub fn arc_obround(p1: Point, p2: Point, angle: Angle, width: PositiveLength) -> Vec<Path> {
        if angle.is_zero() || p1 == p2 {
            return vec![Path::obround(p1, p2, width)];
        }
        let (center, radius) = arc_center(p1, p2, angle);
        let r = width.get().0 as f64 / 2.0;
        if radius - r <= 0.0 {
            // Inner edge collapses; approximate the arc by chords instead
            let steps = ((angle.0.abs() as f64) / 15_000_000.0).ceil().max(1.0) as usize;
            let points = arc_points(p1, center, radius, angle.to_rad(), steps);
            return points
                .windows(2)
                .map(|w| Path::obround(Point::from_f64(w[0]), Point::from_f64(w[1]), width))
                .collect();
        }
        let scale_point = |p: Point, factor: f64| {
            let [x, y] = p.to_f64();
            Point::from_f64([
                center[0] + (x - center[0]) * factor,
                center[1] + (y - center[1]) * factor,
            ])
        };
        let outer = (radius + r) / radius;
        let inner = (radius - r) / radius;
        let cap = if angle.0 > 0 { Angle::deg(180) } else { Angle::deg(-180) };
        let start_outer = scale_point(p1, outer);
        vec![Path::new(vec![
            Vertex::new(start_outer, angle),
            Vertex::new(scale_point(p2, outer), cap),
            Vertex::new(scale_point(p2, inner), -angle),
            Vertex::new(scale_point(p1, inner), cap),
            Vertex::straight(start_outer),
        ])]
    }

    /// Rectangle centered at the origin with rounded corners
    pub fn centered_rect(width: PositiveLength, height: PositiveLength, radius: Length) -> Path {
        let w = width.get().0 / 2;
        let h = height.get().0 / 2;
        rounded_polygon(
            &[Point::nm(-w, -h), Point::nm(w, -h), Point::nm(w, h), Point::nm(-w, h)],
            radius,
        )
    }

    /// Octagon centered at the origin with 45° chamfers and rounded corners
    pub fn octagon(width: PositiveLength, height: PositiveLength, radius: Length) -> Path {
        let w = width.get().0 / 2;
        let h = height.get().0 / 2;
        let min = width.get().0.min(height.get().0) as f64;
        let c = (min / (2.0 + std::f64::consts::SQRT_2)).round() as i64;
        rounded_polygon(
            &[
                Point::nm(-w + c, -h),
                Point::nm(w - c, -h),
                Point::nm(w, -h + c),
                Point::nm(w, h - c),
                Point::nm(w - c, h),
                Point::nm(-w + c, h),
                Point::nm(-w, h - c),
                Point::nm(-w, -h + c),
            ],
            radius,
        )
    }

    /// One closed outline per segment; a single vertex becomes a circle
    pub fn to_outline_strokes(&self, width: PositiveLength) -> Vec<Path> {
        match self.vertices.len() {
            0 => Vec::new(),
            1 => vec![Path::circle(width).translated(self.vertices[0].pos)],
            _ => self
                .vertices
                .windows(2)
                .flat_map(|w| Path::arc_obround(w[0].pos, w[1].pos, w[0].angle, width))
                .collect(),
        }
    }

    /// Vertex coordinates with arcs replaced by inscribed chords
    pub fn flattened(&self, max_tolerance: PositiveLength) -> Vec<[f64; 2]> {
        let mut points = Vec::with_capacity(self.vertices.len());
        let tolerance = max_tolerance.get().0 as f64;
        for (i, v) in self.vertices.iter().enumerate() {
            points.push(v.pos.to_f64());
            let Some(next) = self.vertices.get(i + 1) else {
                break;
            };
            if v.angle.is_zero() || v.pos == next.pos {
                continue;
            }
            let (center, radius) = arc_center(v.pos, next.pos, v.angle);
            let sweep = v.angle.to_rad();
            let max_step = 2.0 * (1.0 - tolerance / radius).clamp(-1.0, 1.0).acos();
            let steps = if max_step > 0.0 {
                (sweep.abs() / max_step).ceil().max(1.0) as usize
            } else {
                1
            };
            let arc = arc_points(v.pos, center, radius, sweep, steps);
            points.extend_from_slice(&arc[1..arc.len() - 1]);
        }
        points
    }
}

/// Center and radius of the arc from p1 to p2 sweeping `angle`
fn arc_center(p1: Point, p2: Point, angle: Angle) -> ([f64; 2], f64) {
    let [x1, y1] = p1.to_f64();
    let [x2, y2] = p2.to_f64();
    let (dx, dy) = (x2 - x1, y2 - y1);
    let chord = dx.hypot(dy);
    let half = angle.to_rad() / 2.0;
    let d = (chord / 2.0) * half.cos() / half.sin();
    let center = [
        (x1 + x2) / 2.0 - dy / chord * d,
        (y1 + y2) / 2.0 + dx / chord * d,
    ];
    (center, (chord / 2.0) / half.sin().abs())
}

/// `steps + 1` points along an arc, both endpoints included
fn arc_points(start: Point, center: [f64; 2], radius: f64, sweep: f64, steps: usize) -> Vec<[f64; 2]> {
    let [sx, sy] = start.to_f64();
    let start_angle = (sy - center[1]).atan2(sx - center[0]);
    let mut points = Vec::with_capacity(steps + 1);
    points.push([sx, sy]);
    for k in 1..steps {
        let theta = start_angle + sweep * k as f64 / steps as f64;
        points.push([center[0] + radius * theta.cos(), center[1] + radius * theta.sin()]);
    }
    let end_angle = start_angle + sweep;
    points.push([center[0] + radius * end_angle.cos(), center[1] + radius * end_angle.sin()]);
    points
}

/// Closed path through convex corners, each rounded with `radius`
fn rounded_polygon(corners: &[Point], radius: Length) -> Path {
    if radius.0 <= 0 {
        return Path::from_points(corners).to_closed_path();
    }
    let n = corners.len();
    let r = radius.0 as f64;
    let mut vertices = Vec::with_capacity(2 * n + 1);
    for i in 0..n {
        let prev = corners[(i + n - 1) % n].to_f64();
        let cur = corners[i].to_f64();
        let next = corners[(i + 1) % n].to_f64();
        let din = normalize([cur[0] - prev[0], cur[1] - prev[1]]);
        let dout = normalize([next[0] - cur[0], next[1] - cur[1]]);
        let cross = din[0] * dout[1] - din[1] * dout[0];
        let dot = din[0] * dout[0] + din[1] * dout[1];
        let turn = cross.atan2(dot);
        let t = r * (turn / 2.0).tan();
        let a = Point::from_f64([cur[0] - din[0] * t, cur[1] - din[1] * t]);
        let b = Point::from_f64([cur[0] + dout[0] * t, cur[1] + dout[1] * t]);
        let micro_deg = (turn * 180.0 / PI * 1_000_000.0).round() as i64;
        vertices.push(Vertex::new(a, Angle(micro_deg)));
        vertices.push(Vertex::straight(b));
    }
    if let Some(first) = vertices.first().copied() {
        vertices.push(Vertex::straight(first.pos));
    }
    Path::new(vertices)
}

fn normalize(v: [f64; 2]) -> [f64; 2] {
    let len = v[0].hypot(v[1]);
    if len == 0.0 {
        [0.0, 0.0]
    } else {
        [v[0] / len, v[1] / len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pl(nm: i64) -> PositiveLength {
        PositiveLength::new(Length(nm)).unwrap()
    }

    #[test]
    fn test_circle_is_closed_with_arcs() {
        let c = Path::circle(pl(1000));
        assert!(c.is_closed());
        assert!(c.has_arcs());
        assert_eq!(c.vertices()[0].pos, Point::nm(500, 0));
    }

    #[test]
    fn test_obround_horizontal() {
        let o = Path::obround(Point::nm(0, 0), Point::nm(1000, 0), pl(200));
        assert_eq!(o.vertices()[0].pos, Point::nm(0, 100));
        assert_eq!(o.vertices()[1].pos, Point::nm(1000, 100));
        assert_eq!(o.vertices()[2].pos, Point::nm(1000, -100));
        assert!(o.is_closed());
    }

    #[test]
    fn test_flattened_circle_stays_on_circle() {
        let c = Path::circle(pl(600_000));
        let pts = c.flattened(pl(5_000));
        assert!(pts.len() > 8);
        for p in &pts {
            let r = p[0].hypot(p[1]);
            assert!((r - 300_000.0).abs() < 1.0, "radius {}", r);
        }
        // Starts exactly at angle zero
        assert_eq!(pts[0], [300_000.0, 0.0]);
    }

    #[test]
    fn test_arc_center_quarter() {
        let (c, r) = arc_center(Point::nm(1000, 0), Point::nm(0, 1000), Angle::deg(90));
        assert!(c[0].abs() < 1e-6 && c[1].abs() < 1e-6);
        assert!((r - 1000.0).abs() < 1e-6);
        let (c, _) = arc_center(Point::nm(1000, 0), Point::nm(0, 1000), Angle::deg(-90));
        assert!((c[0] - 1000.0).abs() < 1e-6 && (c[1] - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_outline_strokes_per_segment() {
        let p = Path::from_points(&[Point::nm(0, 0), Point::nm(1000, 0), Point::nm(1000, 1000)]);
        assert_eq!(p.to_outline_strokes(pl(100)).len(), 2);
        let single = Path::from_points(&[Point::nm(7, 7)]);
        let strokes = single.to_outline_strokes(pl(100));
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].vertices()[0].pos, Point::nm(57, 7));
    }

    #[test]
    fn test_rounded_rect_corners() {
        let r = Path::centered_rect(pl(1000), pl(600), Length(100));
        // 4 corners, 2 vertices each, plus closing vertex
        assert_eq!(r.len(), 9);
        assert_eq!(r.vertices()[0].pos, Point::nm(-500, -200));
        assert_eq!(r.vertices()[0].angle, Angle::deg(90));
        assert_eq!(r.vertices()[1].pos, Point::nm(-400, -300));
        let sharp = Path::centered_rect(pl(1000), pl(600), Length::ZERO);
        assert_eq!(sharp.len(), 5);
    }

    #[test]
    fn test_slot_shape_flags() {
        let curved = Path::new(vec![
            Vertex::new(Point::nm(0, 0), Angle::deg(90)),
            Vertex::straight(Point::nm(1000, 1000)),
        ]);
        assert!(curved.has_arcs());
        // Angle on the last vertex is not a segment
        let straight = Path::new(vec![
            Vertex::straight(Point::nm(0, 0)),
            Vertex::new(Point::nm(1000, 0), Angle::deg(90)),
        ]);
        assert!(!straight.has_arcs());
    }
}
