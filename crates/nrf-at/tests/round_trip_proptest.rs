//! Property-based tests for the AT codec.
//!
//! These tests check that:
//! - every command line and response that passes validation decodes back to
//!   the value it was encoded from
//! - splitting a line into segments and joining them reproduces the line,
//!   for command lines together with their `AT` prefix

use nrf_at::segment::{join, split, split_command_line};
use nrf_at::{decode_command, decode_response, Command, CommandLine, ParamValue, Response};
use proptest::prelude::*;

/// Generate command names like `+CFUN` or `%XSUDO`.
fn command_name_strategy() -> impl Strategy<Value = String> {
    "[+%][A-Z][A-Z0-9_]{0,8}"
}

/// Generate response names, including result codes and error forms.
fn response_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[+%][A-Z][A-Z0-9_]{0,6}( [A-Z]{1,5})?",
        Just("OK".to_string()),
        Just("ERROR".to_string()),
        Just("+CME ERROR".to_string()),
        Just("+CMS ERROR".to_string()),
        Just("NO CARRIER".to_string()),
    ]
}

/// Generate non-list values. Text avoids `"`, which has no escape.
fn scalar_strategy() -> impl Strategy<Value = ParamValue> {
    prop_oneof![
        Just(ParamValue::Absent),
        any::<i64>().prop_map(ParamValue::Integer),
        "[a-zA-Z0-9 +/=,;:%()\\[\\]-]{0,16}".prop_map(ParamValue::Text),
    ]
}

/// Generate a single parameter, possibly a one-level list.
fn param_strategy() -> impl Strategy<Value = ParamValue> {
    prop_oneof![
        3 => scalar_strategy(),
        1 => prop::collection::vec(scalar_strategy(), 0..4)
            .prop_filter("single absent element", |items| {
                !(items.len() == 1 && items[0].is_absent())
            })
            .prop_map(ParamValue::List),
    ]
}

fn command_strategy() -> impl Strategy<Value = Command> {
    (
        command_name_strategy(),
        0..3u8,
        prop::collection::vec(param_strategy(), 0..5),
    )
        .prop_map(|(name, kind, params)| match kind {
            0 => Command::set(name, params),
            1 => Command::read(name),
            _ => Command::test(name),
        })
}

fn command_line_strategy() -> impl Strategy<Value = CommandLine> {
    prop::collection::vec(command_strategy(), 1..4)
        .prop_map(|commands| CommandLine::new(commands).expect("at least one command"))
}

fn response_strategy() -> impl Strategy<Value = Response> {
    (
        response_name_strategy(),
        prop::collection::vec(param_strategy(), 0..5),
    )
        .prop_map(|(name, params)| Response::new(name, params))
}

/// Generate information lines: no `+`/`%` name or result code at the start,
/// no surrounding whitespace.
fn info_response_strategy() -> impl Strategy<Value = Response> {
    "[a-z0-9][a-zA-Z0-9 .,;:\"()_-]{0,20}[a-zA-Z0-9]".prop_map(Response::info)
}

proptest! {
    #[test]
    fn test_command_line_round_trip(line in command_line_strategy()) {
        prop_assert!(line.validate().is_ok());
        let encoded = line.encode();
        let decoded = decode_command(&encoded);
        prop_assert_eq!(decoded, Ok(line), "encoded as {:?}", encoded);
    }

    #[test]
    fn test_response_round_trip(response in response_strategy()) {
        prop_assert!(response.validate().is_ok());
        let encoded = response.encode();
        let decoded = decode_response(&encoded);
        prop_assert_eq!(decoded, Ok(response), "encoded as {:?}", encoded);
    }

    #[test]
    fn test_info_response_round_trip(response in info_response_strategy()) {
        prop_assert!(response.validate().is_ok());
        let encoded = response.encode();
        let decoded = decode_response(&encoded);
        prop_assert_eq!(decoded, Ok(response), "encoded as {:?}", encoded);
    }

    #[test]
    fn test_split_then_join_is_identity(line in "[a-zA-Z0-9;,\"()\\[\\] ]{0,40}") {
        if let Ok(segments) = split(&line) {
            prop_assert_eq!(join(&segments), line);
        }
    }

    #[test]
    fn test_split_command_line_then_join_is_identity(
        line in "[aA][tT][+%a-zA-Z0-9=?;,\"()\\[\\] ]{0,40}"
    ) {
        if let Ok(segments) = split_command_line(&line) {
            prop_assert_eq!(format!("{}{}", &line[..2], join(&segments)), line);
        }
    }

    #[test]
    fn test_decode_never_panics(line in "AT[+%A-Z0-9=?;,\"()\\[\\] -]{0,40}") {
        let _ = decode_command(&line);
        let _ = decode_response(&line);
    }
}

