//! Server state management for the DRC server

use crate::board::Board;
use crate::drc::{DrcEvent, DrcMessage, DrcReport, DrcSettings};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// In-memory state: loaded board, settings and the latest results
pub struct ServerState {
    pub board_path: Option<String>,
    pub board: Option<Board>,
    /// Bumped on every load so stale DRC results can be told apart
    pub board_revision: u64,
    pub settings: DrcSettings,
    pub messages: Vec<DrcMessage>,
    pub last_run_quick: Option<bool>,
    pub cancel_flag: Option<Arc<AtomicBool>>,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            board_path: None,
            board: None,
            board_revision: 0,
            settings: DrcSettings::default(),
            messages: Vec::new(),
            last_run_quick: None,
            cancel_flag: None,
        }
    }

    pub fn is_board_loaded(&self) -> bool {
        self.board.is_some()
    }

    pub fn is_drc_running(&self) -> bool {
        self.cancel_flag.is_some()
    }

    /// Asks a running DRC to stop at its next checkpoint
    pub fn cancel_drc(&self) -> bool {
        match &self.cancel_flag {
            Some(flag) => {
                flag.store(true, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    pub fn set_board(&mut self, board: Board, path: Option<String>) {
        self.cancel_drc();
        self.board = Some(board);
        self.board_path = path;
        self.board_revision += 1;
        self.messages.clear();
        self.last_run_quick = None;
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Result from a background DRC run
pub struct DrcAsyncResult {
    pub revision: u64,
    pub quick: bool,
    /// The board after plane refill
    pub board: Board,
    pub report: std::result::Result<DrcReport, String>,
    pub elapsed_ms: f64,
}

/// Everything the main loop reacts to
pub enum ServerEvent {
    Line(String),
    InputClosed,
    DrcProgress(DrcEvent),
    DrcComplete(Box<DrcAsyncResult>),
}
