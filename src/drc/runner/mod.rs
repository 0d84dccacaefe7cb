//! The rule check engine
//!
//! `BoardDesignRuleCheck` runs a fixed pipeline of checks over a board. The
//! engine is built per run and consumed by `execute`, which drops its copper
//! cache together with it.
//!
//! # Submodules
//! - `copper` - Copper width and clearance checks
//! - `holes` - Annular rings, drill and slot checks
//! - `placement` - Pad connections, courtyards, unplaced parts, air wires, stale objects

mod copper;
mod holes;
mod placement;

use super::cache::CopperCache;
use super::messages::DrcMessage;
use super::progress::{DrcEvent, DrcObserver};
use super::settings::DrcSettings;
use crate::board::Board;
use crate::error::{DrcError, Result};
use crate::kernel::{Area, PolygonKernel};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of one run
#[derive(Clone, Debug, Default, Serialize)]
pub struct DrcReport {
    pub messages: Vec<DrcMessage>,
    /// Status texts in emission order
    pub status: Vec<String>,
    pub progress: u8,
}

type Check<'a> = fn(&mut BoardDesignRuleCheck<'a>, &Board, u8) -> Result<()>;

pub struct BoardDesignRuleCheck<'a> {
    settings: DrcSettings,
    quick: bool,
    kernel: PolygonKernel,
    observer: Option<Box<dyn DrcObserver + 'a>>,
    cancel: Option<Arc<AtomicBool>>,
    cache: CopperCache,
    report: DrcReport,
}

impl<'a> BoardDesignRuleCheck<'a> {
    /// `quick` skips plane refill and all checks after copper-hole clearance
    pub fn new(settings: DrcSettings, quick: bool) -> Self {
        BoardDesignRuleCheck {
            settings,
            quick,
            kernel: PolygonKernel::default(),
            observer: None,
            cancel: None,
            cache: CopperCache::new(),
            report: DrcReport::default(),
        }
    }

    pub fn with_observer(mut self, observer: impl DrcObserver + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Flag polled between checks; once set, `execute` returns `Cancelled`
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn settings(&self) -> &DrcSettings {
        &self.settings
    }

    pub fn is_quick(&self) -> bool {
        self.quick
    }

    /// Runs all checks. A full run refills the planes of `board` first.
    pub fn execute(mut self, board: &mut Board) -> Result<DrcReport> {
        let start = Instant::now();
        info!(
            "[DRC] Starting {} run on '{}' ({})",
            if self.quick { "quick" } else { "full" },
            board.name,
            self.settings.summary()
        );
        self.emit(DrcEvent::Started);
        self.emit_progress(2);

        if !self.quick {
            self.check_cancelled()?;
            self.emit_status("Rebuild planes...");
            board.rebuild_planes(&self.kernel);
            self.emit_progress(12);
        }
        let board: &Board = board;

        let mut checks: Vec<(&str, Check<'a>, u8)> = vec![
            ("minimum copper width", Self::check_minimum_copper_width as Check<'a>, 14),
            ("copper clearances", Self::check_copper_copper_clearances as Check<'a>, 34),
            ("board clearances", Self::check_copper_board_clearances as Check<'a>, 44),
            ("hole clearances", Self::check_copper_hole_clearances as Check<'a>, 54),
        ];
        if !self.quick {
            checks.extend_from_slice(&[
                ("PTH annular rings", Self::check_minimum_pth_annular_ring as Check<'a>, 64),
                ("NPTH drill diameters", Self::check_minimum_npth_drill_diameter as Check<'a>, 66),
                ("NPTH slot widths", Self::check_minimum_npth_slot_width as Check<'a>, 68),
                ("PTH drill diameters", Self::check_minimum_pth_drill_diameter as Check<'a>, 70),
                ("PTH slot widths", Self::check_minimum_pth_slot_width as Check<'a>, 72),
                ("allowed NPTH slots", Self::check_allowed_npth_slots as Check<'a>, 74),
                ("allowed PTH slots", Self::check_allowed_pth_slots as Check<'a>, 76),
                ("pad connections", Self::check_invalid_pad_connections as Check<'a>, 78),
                ("courtyards", Self::check_courtyard_clearances as Check<'a>, 91),
                ("unplaced components", Self::check_for_unplaced_components as Check<'a>, 93),
                ("missing connections", Self::check_for_missing_connections as Check<'a>, 95),
                ("stale objects", Self::check_for_stale_objects as Check<'a>, 97),
            ]);
        }

        for (name, check, progress_end) in checks {
            self.check_cancelled()?;
            let check_start = Instant::now();
            let before = self.report.messages.len();
            check(&mut self, board, progress_end)?;
            debug!(
                "[DRC] {}: {} message(s) in {:.2}ms",
                name,
                self.report.messages.len() - before,
                check_start.elapsed().as_secs_f64() * 1000.0
            );
        }

        let count = self.report.messages.len();
        self.emit_status(&format!("Finished with {} message(s)!", count));
        self.emit_progress(100);
        self.emit(DrcEvent::Finished { message_count: count });
        info!(
            "[DRC] Finished with {} message(s) in {:.2}ms ({} cached copper areas)",
            count,
            start.elapsed().as_secs_f64() * 1000.0,
            self.cache.len()
        );
        Ok(self.report)
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => {
                info!("[DRC] Cancelled at {}%", self.report.progress);
                Err(DrcError::Cancelled)
            }
            _ => Ok(()),
        }
    }

    fn emit(&mut self, event: DrcEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_event(&event);
        }
    }

    fn emit_progress(&mut self, percent: u8) {
        self.report.progress = percent;
        self.emit(DrcEvent::Progress { percent });
    }

    fn emit_status(&mut self, text: &str) {
        self.report.status.push(text.to_string());
        self.emit(DrcEvent::Status { text: text.to_string() });
    }

    fn emit_message(&mut self, message: DrcMessage) {
        let text = message.message();
        self.emit(DrcEvent::Message { text });
        self.report.messages.push(message);
    }

    /// Cached copper of one layer without net filter
    fn copper_area(&mut self, board: &Board, layer: &str) -> Result<Area> {
        let area = self.cache.copper(board, &self.kernel, layer, &Default::default(), self.quick)?;
        Ok(area.clone())
    }

    fn enabled_copper_layers(board: &Board) -> Vec<String> {
        board
            .layers
            .enabled_copper_layers()
            .map(|l| l.name.clone())
            .collect()
    }
}
