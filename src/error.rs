//! Error types for the board model and the rule check engine.

use thiserror::Error;

/// Errors that abort a design rule check.
#[derive(Error, Debug)]
pub enum DrcError {
    /// A refinement type was constructed from an out-of-range value.
    #[error("invalid {kind}: {value}")]
    RangeError { kind: &'static str, value: i64 },

    /// A net line endpoint references an object that does not exist.
    #[error("net line {net_line} in segment {segment} references unknown {anchor}")]
    UnknownAnchor {
        segment: u64,
        net_line: u64,
        anchor: String,
    },

    /// The run was cancelled between two checks.
    #[error("design rule check cancelled")]
    Cancelled,
}

/// Result type for board and DRC operations.
pub type Result<T> = std::result::Result<T, DrcError>;
