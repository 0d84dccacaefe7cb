//! Wire messages of the DRC server
//!
//! One JSON object per line. Clients send `Request`s; the server answers each
//! with a `Response` carrying the same id, and pushes `Notification`s (id
//! `null`) while a check runs in the background.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Incoming call; `params` is method specific
#[derive(Debug, Deserialize)]
pub struct Request {
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

/// Reply to one request: exactly one of `result` and `error` is set
#[derive(Debug, Serialize)]
pub struct Response {
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: i32,
    pub message: String,
}

impl Response {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Response { id, result: Some(result), error: None }
    }

    pub fn error(id: Option<Value>, code: i32, message: String) -> Self {
        Response { id, result: None, error: Some(ErrorResponse { code, message }) }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Progress or result pushed by the server, e.g. `drcProgress`
#[derive(Debug, Serialize)]
pub struct Notification<T: Serialize> {
    pub id: Option<Value>,
    pub method: &'static str,
    pub result: T,
}

impl<T: Serialize> Notification<T> {
    pub fn new(method: &'static str, result: T) -> Self {
        Notification { id: None, method, result }
    }
}

/// Error codes in `ErrorResponse::code`
///
/// Negative codes are the JSON-RPC ones, positive codes are board or check state errors.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    /// Settings could not be converted to JSON
    pub const INTERNAL_ERROR: i32 = -32603;

    pub const NO_BOARD_LOADED: i32 = 2;
    /// Board file missing or not a valid board
    pub const LOAD_FAILED: i32 = 5;
    /// Another check is still running
    pub const DRC_RUNNING: i32 = 6;
}
