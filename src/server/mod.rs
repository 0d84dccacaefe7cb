//! JSON-RPC server for running board design rule checks
//!
//! Line-delimited JSON requests arrive on the input stream, responses and
//! notifications leave on the output stream. A DRC runs in a worker thread;
//! its progress is streamed as `drcProgress` and its end as `drcComplete`.
//!
//! # Module Structure
//! - `protocol` - JSON-RPC request/response types
//! - `state` - Server state and loop events
//! - `handlers` - Request handlers organized by functionality

pub mod handlers;
pub mod protocol;
pub mod state;

pub use protocol::{error_codes, ErrorResponse, Notification, Request, Response};
pub use state::{DrcAsyncResult, ServerEvent, ServerState};

use anyhow::{Context, Result};
use handlers::*;
use serde::Serialize;
use std::io::{BufRead, Write};
use std::sync::mpsc::{self, Sender};
use std::thread;
use tracing::{debug, info, warn};

/// Runs the request loop until `Shutdown` or end of input
///
/// After the input closes, a DRC still in flight is awaited so its
/// `drcComplete` notification is not lost.
pub fn serve<R, W>(input: R, output: &mut W) -> Result<()>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    let mut state = ServerState::new();
    let (tx, rx) = mpsc::channel();
    spawn_reader(input, tx.clone());

    let mut input_closed = false;
    for event in rx.iter() {
        match event {
            ServerEvent::Line(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let request: Request = match serde_json::from_str(&line) {
                    Ok(req) => req,
                    Err(e) => {
                        warn!("[Server] Failed to parse request: {}", e);
                        let response =
                            Response::error(None, error_codes::PARSE_ERROR, format!("Parse error: {}", e));
                        write_json(output, &response)?;
                        continue;
                    }
                };
                debug!("[Server] Request: {}", request.method);
                let shutdown = request.method == "Shutdown";
                let response = dispatch(&mut state, request, &tx);
                write_json(output, &response)?;
                if shutdown {
                    state.cancel_drc();
                    break;
                }
            }
            ServerEvent::InputClosed => {
                input_closed = true;
            }
            ServerEvent::DrcProgress(event) => {
                write_json(output, &Notification::new("drcProgress", event))?;
            }
            ServerEvent::DrcComplete(result) => {
                let payload = handle_drc_complete(&mut state, *result);
                write_json(output, &Notification::new("drcComplete", payload))?;
            }
        }
        if input_closed && !state.is_drc_running() {
            break;
        }
    }
    info!("[Server] Stopped");
    Ok(())
}

fn dispatch(state: &mut ServerState, request: Request, tx: &Sender<ServerEvent>) -> Response {
    match request.method.as_str() {
        "LoadBoard" => handle_load_board(state, request.id, request.params),
        "GetBoardInfo" => handle_get_board_info(state, request.id),
        "GetDrcSettings" => handle_get_drc_settings(state, request.id),
        "SetDrcSettings" => handle_set_drc_settings(state, request.id, request.params),
        "RunDrc" => handle_run_drc(state, request.id, request.params, tx),
        "CancelDrc" => handle_cancel_drc(state, request.id),
        "GetDrcMessages" => handle_get_drc_messages(state, request.id, request.params),
        "Shutdown" => Response::success(request.id, serde_json::json!({ "status": "ok" })),
        _ => Response::error(
            request.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        ),
    }
}

fn spawn_reader<R: BufRead + Send + 'static>(input: R, tx: Sender<ServerEvent>) {
    thread::spawn(move || {
        for line in input.lines() {
            match line {
                Ok(line) => {
                    if tx.send(ServerEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    warn!("[Server] Error reading input: {}", e);
                    break;
                }
            }
        }
        let _ = tx.send(ServerEvent::InputClosed);
    });
}

fn write_json<W: Write, T: Serialize>(output: &mut W, value: &T) -> Result<()> {
    let json = serde_json::to_string(value).context("Failed to serialize response")?;
    writeln!(output, "{}", json).context("Failed to write response")?;
    output.flush().context("Failed to flush output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str) -> Vec<serde_json::Value> {
        let mut output = Vec::new();
        serve(Cursor::new(input.to_string()), &mut output).unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_unknown_method() {
        let out = run("{\"id\":1,\"method\":\"Frobnicate\"}\n");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["error"]["code"], error_codes::METHOD_NOT_FOUND);
    }

    #[test]
    fn test_parse_error() {
        let out = run("not json\n");
        assert_eq!(out[0]["error"]["code"], error_codes::PARSE_ERROR);
    }

    #[test]
    fn test_shutdown_stops_loop() {
        let out = run("{\"id\":1,\"method\":\"Shutdown\"}\n{\"id\":2,\"method\":\"GetDrcSettings\"}\n");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["result"]["status"], "ok");
    }
}
