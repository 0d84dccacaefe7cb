//! Design rule check engine for printed circuit boards
//!
//! Validates a board snapshot against manufacturing constraints: copper
//! widths and clearances, annular rings, drill and slot sizes, pad
//! connections, courtyard overlaps, unplaced components, missing connections
//! and stale objects. Each problem becomes a `DrcMessage` with a description
//! and the outlines marking where it is.
//!
//! ```ignore
//! let mut board: Board = serde_json::from_str(&json)?;
//! let report = BoardDesignRuleCheck::new(DrcSettings::default(), false)
//!     .with_observer(|e: &DrcEvent| eprintln!("{:?}", e))
//!     .execute(&mut board)?;
//! for message in &report.messages {
//!     println!("{}", message.message());
//! }
//! ```
//!
//! # Module Structure
//! - `geometry` - Nanometre lengths, points, angles, paths, transforms
//! - `kernel` - Polygon offset and boolean operations
//! - `board` - Board model, plane refill and air wires
//! - `generation` - Board objects to areas
//! - `drc` - Settings, messages, progress and the check engine
//! - `server` - JSON-RPC server used by the `drc_server` binary
//! - `error` - Error types

pub mod board;
pub mod drc;
pub mod error;
pub mod generation;
pub mod geometry;
pub mod kernel;
pub mod server;

pub use error::{DrcError, Result};
