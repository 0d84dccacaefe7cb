//! Fixed-precision geometry primitives
//!
//! All coordinates are integer nanometres. Floating point only appears when
//! arcs are flattened or rotations are not multiples of 90°.
//!
//! # Submodules
//! - `length` - Length, PositiveLength, UnsignedLength, Ratio
//! - `point` - Point and Angle
//! - `path` - Paths with arc segments and shape constructors
//! - `transform` - Device/pad placement transform

mod length;
mod path;
mod point;
mod transform;

pub use length::{Length, PositiveLength, Ratio, UnsignedLength};
pub use path::{Path, Vertex};
pub use point::{Angle, Point};
pub use transform::{mirrored_layer_name, Transform};
