// Drives the JSON-RPC loop the way the drc_server binary does
use board_drc::server::{error_codes, serve};
use std::io::{Cursor, Write};

fn run_session(requests: &[serde_json::Value]) -> Vec<serde_json::Value> {
    let input: String = requests.iter().map(|r| format!("{}\n", r)).collect();
    let mut output = Vec::new();
    serve(Cursor::new(input), &mut output).expect("server loop failed");
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).expect("invalid JSON line"))
        .collect()
}

fn response(lines: &[serde_json::Value], id: i64) -> &serde_json::Value {
    lines
        .iter()
        .find(|l| l["id"] == id)
        .unwrap_or_else(|| panic!("no response for id {}", id))
}

fn board_json() -> serde_json::Value {
    // One 100um trace, below the default 200um minimum width
    serde_json::json!({
        "name": "server_demo",
        "net_signals": [{ "id": 1, "name": "GND" }],
        "net_segments": [{
            "id": 1,
            "net_signal": 1,
            "net_points": [
                { "id": 1, "position": { "x": 0, "y": 0 } },
                { "id": 2, "position": { "x": 5000000, "y": 0 } }
            ],
            "net_lines": [{
                "id": 3,
                "start": { "type": "net_point", "id": 1 },
                "end": { "type": "net_point", "id": 2 },
                "layer": "top_cu",
                "width": 100000
            }]
        }]
    })
}

#[test]
fn test_load_from_file_and_run_drc() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", board_json()).unwrap();
    let path = file.path().to_string_lossy().to_string();

    let lines = run_session(&[
        serde_json::json!({ "id": 1, "method": "LoadBoard", "params": { "file_path": path } }),
        serde_json::json!({ "id": 2, "method": "RunDrc", "params": { "quick": false } }),
    ]);

    let loaded = response(&lines, 1);
    assert_eq!(loaded["result"]["name"], "server_demo");
    assert_eq!(loaded["result"]["net_segments"], 1);
    assert_eq!(response(&lines, 2)["result"]["status"], "started");

    let progress: Vec<&serde_json::Value> = lines.iter().filter(|l| l["method"] == "drcProgress").collect();
    assert!(!progress.is_empty());
    assert!(progress.iter().all(|l| l["id"].is_null()));

    let complete = lines.last().unwrap();
    assert_eq!(complete["method"], "drcComplete");
    assert_eq!(complete["result"]["status"], "ok");
    assert_eq!(complete["result"]["message_count"], 1);
    assert_eq!(complete["result"]["counts"][0]["kind"], "minimum_width");
}

#[test]
fn test_inline_board_and_settings() {
    let lines = run_session(&[
        serde_json::json!({ "id": 1, "method": "LoadBoard", "params": { "board": board_json() } }),
        serde_json::json!({ "id": 2, "method": "SetDrcSettings", "params": { "min_copper_width": 50000 } }),
        serde_json::json!({ "id": 3, "method": "RunDrc", "params": { "quick": true } }),
    ]);

    assert_eq!(response(&lines, 2)["result"]["min_copper_width"], 50000);
    assert_eq!(response(&lines, 2)["result"]["min_copper_copper_clearance"], 200000);
    let complete = lines.last().unwrap();
    assert_eq!(complete["method"], "drcComplete");
    assert_eq!(complete["result"]["quick"], true);
    assert_eq!(complete["result"]["message_count"], 0);
}

#[test]
fn test_errors_without_board() {
    let lines = run_session(&[
        serde_json::json!({ "id": 1, "method": "RunDrc" }),
        serde_json::json!({ "id": 2, "method": "LoadBoard", "params": { "file_path": "/does/not/exist.json" } }),
        serde_json::json!({ "id": 3, "method": "GetDrcMessages" }),
    ]);

    assert_eq!(response(&lines, 1)["error"]["code"], error_codes::NO_BOARD_LOADED);
    assert_eq!(response(&lines, 2)["error"]["code"], error_codes::LOAD_FAILED);
    assert!(response(&lines, 2)["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Failed to read board file"));
    assert_eq!(response(&lines, 3)["result"]["messages"], serde_json::json!([]));
}
