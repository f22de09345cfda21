//! Integration tests for the atcodec tool.
//!
//! Arguments are parsed with clap exactly as the binary does, and output is
//! captured in memory.

use std::io::Cursor;

use clap::Parser;
use nrf_at_cli::{process_line, run, Cli, Operation, ToolError};
use serde_json::{json, Value};

/// Parse `args` and run with `stdin` as input. Returns (failures, stdout, stderr).
fn run_with(args: &[&str], stdin: &str) -> (usize, String, String) {
    let cli = Cli::try_parse_from(args).expect("arguments should parse");
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let failures = run(&cli, Cursor::new(stdin), &mut stdout, &mut stderr)
        .expect("run should succeed");
    (
        failures,
        String::from_utf8(stdout).expect("utf-8 output"),
        String::from_utf8(stderr).expect("utf-8 errors"),
    )
}

fn parse_json(text: &str) -> Value {
    serde_json::from_str(text.trim()).expect("output should be JSON")
}

// ============================================================================
// Argument parsing
// ============================================================================

#[test]
fn test_parse_global_flags() {
    let cli = Cli::try_parse_from(["atcodec", "-vv", "--pretty", "split", "AT+CFUN?"])
        .expect("arguments should parse");
    assert!(cli.pretty);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.operation.input(), Some("AT+CFUN?"));
}

#[test]
fn test_parse_requires_subcommand() {
    assert!(Cli::try_parse_from(["atcodec"]).is_err());
    assert!(Cli::try_parse_from(["atcodec", "frobnicate"]).is_err());
}

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn test_decode_command_argument() {
    let (failures, stdout, _) = run_with(
        &["atcodec", "decode-command", "AT%XSUDO=7,\"c2lnbmF0dXJl\";%CMNG=1"],
        "",
    );
    assert_eq!(failures, 0);
    assert_eq!(
        parse_json(&stdout),
        json!([
            {"name": "%XSUDO", "kind": "SET", "params": [7, "c2lnbmF0dXJl"]},
            {"name": "%CMNG", "kind": "SET", "params": [1]}
        ])
    );
}

#[test]
fn test_decode_response_argument() {
    let (_, stdout, _) = run_with(&["atcodec", "decode-response", "+CMS ERROR: 128"], "");
    assert_eq!(
        parse_json(&stdout),
        json!({"name": "+CMS ERROR", "error": true, "params": [128]})
    );
}

#[test]
fn test_decode_response_with_absent_and_list() {
    let (_, stdout, _) = run_with(&["atcodec", "decode-response", "%FOO: ,[1,\"a\"]"], "");
    assert_eq!(
        parse_json(&stdout),
        json!({"name": "%FOO", "error": false, "params": [null, [1, "a"]]})
    );
}

#[test]
fn test_decode_information_line() {
    let (_, stdout, _) = run_with(&["atcodec", "decode-response", "Nordic Semiconductor ASA"], "");
    assert_eq!(
        parse_json(&stdout),
        json!({"name": "", "error": false, "params": [{"raw": "Nordic Semiconductor ASA"}]})
    );
}

#[test]
fn test_decode_argument_error_is_returned() {
    let cli = Cli::try_parse_from(["atcodec", "decode-command", "AT+CFUN=\"open"])
        .expect("arguments should parse");
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let result = run(&cli, Cursor::new(""), &mut stdout, &mut stderr);
    assert!(matches!(result, Err(ToolError::Decode(_))));
    assert!(stdout.is_empty());
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn test_encode_single_command() {
    let operation = Operation::EncodeCommand { json: None };
    let line = process_line(
        &operation,
        r#"{"name":"+CEMODE","kind":"SET","params":[0]}"#,
        false,
    )
    .expect("command should encode");
    assert_eq!(line, "AT+CEMODE=0");
}

#[test]
fn test_encode_command_line() {
    let operation = Operation::EncodeCommand { json: None };
    let line = process_line(
        &operation,
        r#"[{"name":"+CFUN","kind":"READ"},{"name":"%CMNG","kind":"SET","params":[1,null,null,null,null]}]"#,
        false,
    )
    .expect("command line should encode");
    assert_eq!(line, "AT+CFUN?;%CMNG=1,,,,");
}

#[test]
fn test_encode_rejects_invalid_values() {
    let operation = Operation::EncodeCommand { json: None };

    let empty = process_line(&operation, "[]", false);
    assert!(matches!(empty, Err(ToolError::Json(_))));

    let quoted = process_line(
        &operation,
        r#"{"name":"+FOO","kind":"SET","params":["say \"hi\""]}"#,
        false,
    );
    assert!(matches!(quoted, Err(ToolError::Value(_))));

    let read_with_params = process_line(
        &operation,
        r#"{"name":"+CFUN","kind":"READ","params":[1]}"#,
        false,
    );
    assert!(matches!(read_with_params, Err(ToolError::Value(_))));
}

#[test]
fn test_encode_response_derives_error_flag() {
    let operation = Operation::EncodeResponse { json: None };
    let line = process_line(
        &operation,
        r#"{"name":"+CME ERROR","error":false,"params":[513]}"#,
        false,
    )
    .expect("response should encode");
    assert_eq!(line, "+CME ERROR: 513");

    let ok = process_line(&operation, r#"{"name":"OK"}"#, false).expect("OK should encode");
    assert_eq!(ok, "OK");
}

#[test]
fn test_encode_information_line() {
    let operation = Operation::EncodeResponse { json: None };
    let line = process_line(
        &operation,
        r#"{"name":"","params":[{"raw":"352656100032138"}]}"#,
        false,
    )
    .expect("information line should encode");
    assert_eq!(line, "352656100032138");

    let quoted = process_line(&operation, r#"{"name":"","params":["352656100032138"]}"#, false);
    assert!(matches!(quoted, Err(ToolError::Value(_))));
}

// ============================================================================
// Splitting
// ============================================================================

#[test]
fn test_split_command_line_and_params() {
    let operation = Operation::Split { line: None };

    let commands = process_line(&operation, "AT+CFUN=1;+CFUN?", false).expect("should split");
    assert_eq!(parse_json(&commands), json!(["+CFUN=1", "+CFUN?"]));

    let quoted = process_line(&operation, "\"a;b\";c", false).expect("should split");
    assert_eq!(parse_json(&quoted), json!(["\"a;b\"", "c"]));
}

// ============================================================================
// Line-by-line input
// ============================================================================

#[test]
fn test_stdin_lines_continue_after_failure() {
    let input = "AT+CFUN?\n\nAT+FOO=bare\r\nAT%XSYSTEMMODE=1,0,0,0\n";
    let (failures, stdout, stderr) = run_with(&["atcodec", "decode-command"], input);

    assert_eq!(failures, 1);
    let outputs: Vec<Value> = stdout.lines().map(parse_json).collect();
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0][0]["kind"], json!("READ"));
    assert_eq!(outputs[1][0]["params"], json!([1, 0, 0, 0]));
    assert!(stderr.starts_with("line 3:"), "stderr was {:?}", stderr);
}

#[test]
fn test_stdin_pretty_output() {
    let (failures, stdout, _) = run_with(&["atcodec", "--pretty", "decode-response"], "OK\n");
    assert_eq!(failures, 0);
    assert!(stdout.contains('\n'));
    assert_eq!(
        parse_json(&stdout),
        json!({"name": "OK", "error": false, "params": []})
    );
}
