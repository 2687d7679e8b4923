//! Full-stack stdio protocol test: real server process, real worker
//! processes underneath it.

use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::{Value, json};

fn run_session(project_root: &std::path::Path, requests: &[Value]) -> Vec<Value> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_stratum"))
        .arg("serve")
        .arg("--project-root")
        .arg(project_root)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn server");

    {
        let stdin = child.stdin.as_mut().expect("stdin piped");
        for request in requests {
            writeln!(stdin, "{request}").expect("failed to write request");
        }
    }
    // Dropping stdin closes the pipe and lets the server shut down.
    drop(child.stdin.take());

    let output = child.wait_with_output().expect("server did not exit");
    assert!(output.status.success(), "server exited with failure");

    String::from_utf8(output.stdout)
        .expect("stdout was not utf-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("unparsable response line"))
        .collect()
}

#[test]
fn full_session_over_stdio() {
    let dir = tempfile::tempdir().unwrap();

    let responses = run_session(
        dir.path(),
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "tools/call",
                "params": {"name": "core.echo", "arguments": {"message": "ping"}},
            }),
        ],
    );

    // The notification produced no response line.
    assert_eq!(responses.len(), 3);

    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "stratum");

    let tools = responses[1]["result"]["tools"].as_array().unwrap();
    assert!(tools.iter().any(|tool| tool["name"] == "core.echo"));

    assert_eq!(responses[2]["id"], 3);
    assert_eq!(responses[2]["result"]["isError"], false);
    assert_eq!(responses[2]["result"]["content"][0]["text"], "ping");
}

#[test]
fn tool_errors_are_results_not_protocol_errors() {
    let dir = tempfile::tempdir().unwrap();

    let responses = run_session(
        dir.path(),
        &[json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": "core.read_log_entries", "arguments": {"entries": 0}},
        })],
    );

    assert_eq!(responses.len(), 1);
    assert!(responses[0].get("error").is_none());
    assert_eq!(responses[0]["result"]["isError"], true);
    assert!(
        responses[0]["result"]["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("greater than 0")
    );
}

#[test]
fn garbage_lines_get_parse_errors() {
    let dir = tempfile::tempdir().unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_stratum"))
        .arg("serve")
        .arg("--project-root")
        .arg(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn server");

    {
        let stdin = child.stdin.as_mut().expect("stdin piped");
        writeln!(stdin, "this is not json").unwrap();
    }
    drop(child.stdin.take());

    let output = child.wait_with_output().expect("server did not exit");
    let response: Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    assert_eq!(response["error"]["code"], -32700);
}
