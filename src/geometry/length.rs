//! Integer lengths in nanometres and their refinement types

use crate::error::{DrcError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Signed length in nanometres
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Length(pub i64);

impl Length {
    pub const ZERO: Length = Length(0);

    pub const fn nm(nm: i64) -> Self {
        Length(nm)
    }

    pub const fn um(um: i64) -> Self {
        Length(um * 1_000)
    }

    pub const fn mm(mm: i64) -> Self {
        Length(mm * 1_000_000)
    }

    pub fn to_nm(self) -> i64 {
        self.0
    }

    pub fn to_mm(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    pub fn abs(self) -> Self {
        Length(self.0.abs())
    }

    /// Millimetre string with up to six decimals, trailing zeros removed
    pub fn format_mm(self) -> String {
        let s = format!("{:.6}", self.to_mm());
        let s = s.trim_end_matches('0').trim_end_matches('.');
        format!("{}mm", s)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_mm())
    }
}

impl Add for Length {
    type Output = Length;
    fn add(self, rhs: Length) -> Length {
        Length(self.0 + rhs.0)
    }
}

impl Sub for Length {
    type Output = Length;
    fn sub(self, rhs: Length) -> Length {
        Length(self.0 - rhs.0)
    }
}

impl Neg for Length {
    type Output = Length;
    fn neg(self) -> Length {
        Length(-self.0)
    }
}

impl Mul<i64> for Length {
    type Output = Length;
    fn mul(self, rhs: i64) -> Length {
        Length(self.0 * rhs)
    }
}

impl Div<i64> for Length {
    type Output = Length;
    fn div(self, rhs: i64) -> Length {
        Length(self.0 / rhs)
    }
}

impl From<i64> for Length {
    fn from(nm: i64) -> Self {
        Length(nm)
    }
}

/// Length strictly greater than zero
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PositiveLength(Length);

impl PositiveLength {
    pub fn new(length: Length) -> Result<Self> {
        if length.0 > 0 {
            Ok(PositiveLength(length))
        } else {
            Err(DrcError::RangeError {
                kind: "positive length",
                value: length.0,
            })
        }
    }

    /// Clamps to one nanometre so derived stroke widths stay valid
    pub fn at_least_one(length: Length) -> Self {
        PositiveLength(Length(length.0.max(1)))
    }

    pub fn get(self) -> Length {
        self.0
    }
}

impl TryFrom<i64> for PositiveLength {
    type Error = DrcError;
    fn try_from(nm: i64) -> Result<Self> {
        PositiveLength::new(Length(nm))
    }
}

impl From<PositiveLength> for i64 {
    fn from(l: PositiveLength) -> i64 {
        l.0 .0
    }
}

impl From<PositiveLength> for Length {
    fn from(l: PositiveLength) -> Length {
        l.0
    }
}

/// Length greater than or equal to zero
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UnsignedLength(Length);

impl UnsignedLength {
    pub const ZERO: UnsignedLength = UnsignedLength(Length(0));

    pub fn new(length: Length) -> Result<Self> {
        if length.0 >= 0 {
            Ok(UnsignedLength(length))
        } else {
            Err(DrcError::RangeError {
                kind: "unsigned length",
                value: length.0,
            })
        }
    }

    pub const fn from_nm(nm: u32) -> Self {
        UnsignedLength(Length(nm as i64))
    }

    pub fn get(self) -> Length {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 .0 == 0
    }
}

impl TryFrom<i64> for UnsignedLength {
    type Error = DrcError;
    fn try_from(nm: i64) -> Result<Self> {
        UnsignedLength::new(Length(nm))
    }
}

impl From<UnsignedLength> for i64 {
    fn from(l: UnsignedLength) -> i64 {
        l.0 .0
    }
}

impl From<UnsignedLength> for Length {
    fn from(l: UnsignedLength) -> Length {
        l.0
    }
}

impl From<PositiveLength> for UnsignedLength {
    fn from(l: PositiveLength) -> UnsignedLength {
        UnsignedLength(l.0)
    }
}

impl fmt::Display for UnsignedLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for PositiveLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Ratio in parts per million
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ratio(pub i64);

impl Ratio {
    pub const fn from_percent(percent: i64) -> Self {
        Ratio(percent * 10_000)
    }

    pub const fn ppm(self) -> i64 {
        self.0
    }

    /// Scales a length, rounding half away from zero
    pub fn apply(self, length: Length) -> Length {
        let scaled = length.0 as i128 * self.0 as i128;
        let rounded = if scaled >= 0 {
            (scaled + 500_000) / 1_000_000
        } else {
            (scaled - 500_000) / 1_000_000
        };
        Length(rounded as i64)
    }
}
