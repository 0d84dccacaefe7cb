//! Handler module declarations and re-exports

pub mod board;
pub mod drc;

pub use board::*;
pub use drc::*;
