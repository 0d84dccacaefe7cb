//! DRC handlers: GetDrcSettings, SetDrcSettings, RunDrc, CancelDrc, GetDrcMessages

use super::board::no_board;
use crate::drc::{BoardDesignRuleCheck, DrcEvent, DrcMessageKind, DrcSettings};
use crate::server::protocol::{error_codes, Response};
use crate::server::state::{DrcAsyncResult, ServerEvent, ServerState};
use indexmap::IndexMap;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

/// Handle GetDrcSettings request
pub fn handle_get_drc_settings(state: &ServerState, id: Option<serde_json::Value>) -> Response {
    match serde_json::to_value(&state.settings) {
        Ok(value) => Response::success(id, value),
        Err(e) => Response::error(id, error_codes::INTERNAL_ERROR, e.to_string()),
    }
}

/// Handle SetDrcSettings request - fields not named keep their current value
pub fn handle_set_drc_settings(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    let Some(serde_json::Value::Object(changes)) = params else {
        return Response::error(
            id,
            error_codes::INVALID_PARAMS,
            "Invalid params: expected settings object".to_string(),
        );
    };

    let mut merged = match serde_json::to_value(&state.settings) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => {
            return Response::error(
                id,
                error_codes::INTERNAL_ERROR,
                "Failed to serialize settings".to_string(),
            )
        }
    };
    merged.extend(changes);

    match serde_json::from_value::<DrcSettings>(serde_json::Value::Object(merged)) {
        Ok(settings) => {
            info!("[Server] DRC settings: {}", settings.summary());
            state.settings = settings;
            handle_get_drc_settings(state, id)
        }
        Err(e) => Response::error(id, error_codes::INVALID_PARAMS, format!("Invalid settings: {}", e)),
    }
}

/// Handle RunDrc request - starts the check in a background thread
///
/// Progress and status events are forwarded over `tx` while the check runs;
/// the final result arrives as `ServerEvent::DrcComplete`.
pub fn handle_run_drc(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
    tx: &Sender<ServerEvent>,
) -> Response {
    #[derive(Deserialize, Default)]
    struct RunDrcParams {
        #[serde(default)]
        quick: bool,
    }

    let params: RunDrcParams = params
        .and_then(|p| serde_json::from_value(p).ok())
        .unwrap_or_default();

    let Some(board) = &state.board else {
        return no_board(id);
    };
    if state.is_drc_running() {
        return Response::error(id, error_codes::DRC_RUNNING, "DRC is already running".to_string());
    }

    let mut board = board.clone();
    let settings = state.settings.clone();
    let revision = state.board_revision;
    let quick = params.quick;
    let cancel = Arc::new(AtomicBool::new(false));
    state.cancel_flag = Some(cancel.clone());

    info!("[Server] Starting {} DRC", if quick { "quick" } else { "full" });
    let tx = tx.clone();
    thread::spawn(move || {
        let start = Instant::now();
        let progress_tx = tx.clone();
        let engine = BoardDesignRuleCheck::new(settings, quick)
            .with_cancel_flag(cancel)
            .with_observer(move |event: &DrcEvent| {
                if matches!(event, DrcEvent::Progress { .. } | DrcEvent::Status { .. }) {
                    let _ = progress_tx.send(ServerEvent::DrcProgress(event.clone()));
                }
            });
        let report = engine.execute(&mut board).map_err(|e| e.to_string());
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        let _ = tx.send(ServerEvent::DrcComplete(Box::new(DrcAsyncResult {
            revision,
            quick,
            board,
            report,
            elapsed_ms,
        })));
    });

    Response::success(
        id,
        serde_json::json!({
            "status": "started",
            "quick": quick,
        }),
    )
}

/// Handle CancelDrc request
pub fn handle_cancel_drc(state: &ServerState, id: Option<serde_json::Value>) -> Response {
    let cancelled = state.cancel_drc();
    Response::success(id, serde_json::json!({ "cancelled": cancelled }))
}

/// Stores a finished run and builds the `drcComplete` payload
///
/// Results for a board that was replaced in the meantime are reported but
/// not stored.
pub fn handle_drc_complete(state: &mut ServerState, result: DrcAsyncResult) -> serde_json::Value {
    state.cancel_flag = None;
    let stale = result.revision != state.board_revision;

    match result.report {
        Ok(report) => {
            let mut counts: IndexMap<DrcMessageKind, usize> = IndexMap::new();
            for message in &report.messages {
                *counts.entry(message.kind()).or_default() += 1;
            }
            info!(
                "[Server] DRC completed: {} message(s) in {:.2}ms",
                report.messages.len(),
                result.elapsed_ms
            );
            let message_count = report.messages.len();
            let counts: Vec<serde_json::Value> = counts
                .into_iter()
                .map(|(kind, count)| serde_json::json!({ "kind": kind, "count": count }))
                .collect();
            if !stale {
                state.messages = report.messages;
                state.last_run_quick = Some(result.quick);
                if !result.quick {
                    state.board = Some(result.board);
                }
            }
            serde_json::json!({
                "status": "ok",
                "quick": result.quick,
                "stale": stale,
                "message_count": message_count,
                "counts": counts,
                "elapsed_ms": result.elapsed_ms,
            })
        }
        Err(error) => {
            warn!("[Server] DRC failed: {}", error);
            serde_json::json!({
                "status": "error",
                "quick": result.quick,
                "stale": stale,
                "error": error,
                "elapsed_ms": result.elapsed_ms,
            })
        }
    }
}

/// Handle GetDrcMessages request - optional `kind` filter
pub fn handle_get_drc_messages(
    state: &ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize, Default)]
    struct GetMessagesParams {
        #[serde(default)]
        kind: Option<DrcMessageKind>,
    }

    let params: GetMessagesParams = match params {
        None | Some(serde_json::Value::Null) => GetMessagesParams::default(),
        Some(p) => match serde_json::from_value(p) {
            Ok(p) => p,
            Err(e) => return Response::error(id, error_codes::INVALID_PARAMS, e.to_string()),
        },
    };

    let messages: Vec<serde_json::Value> = state
        .messages
        .iter()
        .filter(|m| params.kind.map_or(true, |k| m.kind() == k))
        .map(|m| {
            serde_json::json!({
                "kind": m.kind(),
                "message": m.message(),
                "violation": m.violation,
                "locations": m.locations,
            })
        })
        .collect();

    Response::success(
        id,
        serde_json::json!({
            "quick": state.last_run_quick,
            "messages": messages,
        }),
    )
}
