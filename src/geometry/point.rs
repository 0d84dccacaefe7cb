//! Points and angles

use super::length::Length;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg, Sub};

/// Angle in micro-degrees, counter-clockwise positive
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle(pub i64);

impl Angle {
    pub const ZERO: Angle = Angle(0);

    pub const fn deg(deg: i64) -> Self {
        Angle(deg * 1_000_000)
    }

    pub fn to_rad(self) -> f64 {
        (self.0 as f64 / 1_000_000.0).to_radians()
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Normalized into [0°, 360°)
    pub fn mapped_to_0_360(self) -> Angle {
        Angle(self.0.rem_euclid(360_000_000))
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0)
    }
}

impl Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

/// 2D point in nanometres
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: Length,
    pub y: Length,
}

impl Point {
    pub const ORIGIN: Point = Point { x: Length(0), y: Length(0) };

    pub const fn new(x: Length, y: Length) -> Self {
        Point { x, y }
    }

    pub const fn nm(x: i64, y: i64) -> Self {
        Point { x: Length(x), y: Length(y) }
    }

    pub fn to_f64(self) -> [f64; 2] {
        [self.x.0 as f64, self.y.0 as f64]
    }

    pub fn from_f64(p: [f64; 2]) -> Self {
        Point::nm(p[0].round() as i64, p[1].round() as i64)
    }

    /// Squared distance, exact in integer arithmetic
    pub fn distance_sq(self, other: Point) -> i128 {
        let dx = (self.x.0 - other.x.0) as i128;
        let dy = (self.y.0 - other.y.0) as i128;
        dx * dx + dy * dy
    }

    /// Rotates around `center`, exact for multiples of 90°
    pub fn rotated(self, angle: Angle, center: Point) -> Point {
        let a = angle.mapped_to_0_360();
        if a.is_zero() {
            return self;
        }
        let dx = self.x.0 - center.x.0;
        let dy = self.y.0 - center.y.0;
        let (rx, ry) = match a.0 {
            90_000_000 => (-dy, dx),
            180_000_000 => (-dx, -dy),
            270_000_000 => (dy, -dx),
            _ => {
                let (sin, cos) = a.to_rad().sin_cos();
                let fx = dx as f64 * cos - dy as f64 * sin;
                let fy = dx as f64 * sin + dy as f64 * cos;
                (fx.round() as i64, fy.round() as i64)
            }
        };
        Point::nm(center.x.0 + rx, center.y.0 + ry)
    }

    /// Mirrors about the vertical axis through `center`
    pub fn mirrored_horizontal(self, center: Point) -> Point {
        Point::nm(2 * center.x.0 - self.x.0, self.y.0)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_quadrants_exact() {
        let p = Point::nm(1000, 0);
        assert_eq!(p.rotated(Angle::deg(90), Point::ORIGIN), Point::nm(0, 1000));
        assert_eq!(p.rotated(Angle::deg(180), Point::ORIGIN), Point::nm(-1000, 0));
        assert_eq!(p.rotated(Angle::deg(-90), Point::ORIGIN), Point::nm(0, -1000));
        assert_eq!(p.rotated(Angle::deg(45), Point::ORIGIN), Point::nm(707, 707));
    }

    #[test]
    fn test_mirror() {
        assert_eq!(Point::nm(5, 3).mirrored_horizontal(Point::ORIGIN), Point::nm(-5, 3));
    }
}
