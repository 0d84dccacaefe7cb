//! Board design rule check
//!
//! Runs an ordered pipeline of geometric and electrical checks over a board
//! and collects typed violation messages with highlight locations.
//!
//! # Submodules
//! - `settings` - Thresholds and slot policies
//! - `messages` - Violation variants and message texts
//! - `progress` - Progress events and the observer trait
//! - `cache` - Per-run copper area cache
//! - `runner` - The engine and its checks

mod cache;
mod messages;
mod progress;
mod runner;
mod settings;

pub use cache::CopperCache;
pub use messages::{CopperItemRef, DrcMessage, DrcMessageKind, ObjectRef, Violation};
pub use progress::{DrcEvent, DrcObserver};
pub use runner::{BoardDesignRuleCheck, DrcReport};
pub use settings::{AllowedSlots, DrcSettings};
