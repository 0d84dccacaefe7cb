//! Board handlers: LoadBoard, GetBoardInfo

use crate::board::Board;
use crate::server::protocol::{error_codes, Response};
use crate::server::state::ServerState;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Reads a board snapshot from a JSON file
pub fn load_board_file(path: &Path) -> Result<Board> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read board file {}", path.display()))?;
    let board: Board = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse board JSON in {}", path.display()))?;
    Ok(board)
}

/// Handle LoadBoard request - takes either `file_path` or an inline `board`
pub fn handle_load_board(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct LoadBoardParams {
        #[serde(default)]
        file_path: Option<String>,
        #[serde(default)]
        board: Option<serde_json::Value>,
    }

    let params: LoadBoardParams = match params.map(serde_json::from_value::<LoadBoardParams>) {
        Some(Ok(p)) => p,
        _ => {
            return Response::error(
                id,
                error_codes::INVALID_PARAMS,
                "Invalid params: expected {file_path} or {board}".to_string(),
            )
        }
    };

    let start = Instant::now();
    let loaded = match (params.file_path, params.board) {
        (Some(path), None) => load_board_file(Path::new(&path)).map(|b| (b, Some(path))),
        (None, Some(value)) => serde_json::from_value::<Board>(value)
            .context("Failed to parse inline board")
            .map(|b| (b, None)),
        _ => {
            return Response::error(
                id,
                error_codes::INVALID_PARAMS,
                "Exactly one of file_path and board is required".to_string(),
            )
        }
    };

    let (board, path) = match loaded {
        Ok(v) => v,
        Err(e) => {
            warn!("[Server] Board load failed: {:#}", e);
            return Response::error(id, error_codes::LOAD_FAILED, format!("{:#}", e));
        }
    };

    let summary = board_summary(&board);
    info!(
        "[Server] Loaded board '{}' in {:.2}ms",
        board.name,
        start.elapsed().as_secs_f64() * 1000.0
    );
    state.set_board(board, path);
    Response::success(id, summary)
}

/// Handle GetBoardInfo request
pub fn handle_get_board_info(state: &ServerState, id: Option<serde_json::Value>) -> Response {
    match &state.board {
        Some(board) => {
            let mut summary = board_summary(board);
            summary["file_path"] = serde_json::json!(state.board_path);
            Response::success(id, summary)
        }
        None => no_board(id),
    }
}

pub(crate) fn no_board(id: Option<serde_json::Value>) -> Response {
    Response::error(
        id,
        error_codes::NO_BOARD_LOADED,
        "No board loaded. Call LoadBoard first.".to_string(),
    )
}

fn board_summary(board: &Board) -> serde_json::Value {
    serde_json::json!({
        "name": board.name,
        "copper_layers": board
            .layers
            .enabled_copper_layers()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>(),
        "net_signals": board.net_signals.len(),
        "net_segments": board.net_segments.len(),
        "planes": board.planes.len(),
        "devices": board.devices.len(),
        "holes": board.holes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_inline_board() {
        let mut state = ServerState::new();
        let params = serde_json::json!({ "board": { "name": "demo" } });
        let response = handle_load_board(&mut state, Some(serde_json::json!(1)), Some(params));
        assert!(!response.is_error());
        assert_eq!(state.board.as_ref().unwrap().name, "demo");
        assert_eq!(state.board_revision, 1);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let mut state = ServerState::new();
        let params = serde_json::json!({ "file_path": "/nonexistent/board.json" });
        let response = handle_load_board(&mut state, None, Some(params));
        assert_eq!(response.error.as_ref().unwrap().code, error_codes::LOAD_FAILED);
        assert!(!state.is_board_loaded());
    }

    #[test]
    fn test_load_file_and_info() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name":"from_file"}}"#).unwrap();
        let path = file.path().to_string_lossy().to_string();

        let mut state = ServerState::new();
        let response = handle_load_board(&mut state, None, Some(serde_json::json!({ "file_path": path })));
        assert!(!response.is_error());
        let info = handle_get_board_info(&state, None);
        let result = info.result.unwrap();
        assert_eq!(result["name"], "from_file");
        assert_eq!(result["file_path"], path.as_str());
    }

    #[test]
    fn test_info_without_board() {
        let state = ServerState::new();
        let response = handle_get_board_info(&state, None);
        assert_eq!(response.error.unwrap().code, error_codes::NO_BOARD_LOADED);
    }
}
