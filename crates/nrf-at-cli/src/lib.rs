//! atcodec: decode and encode nRF91 AT lines from the command line.
//!
//! Each subcommand takes its input as an argument, or processes standard
//! input line by line when the argument is omitted:
//!
//! ```text
//! $ atcodec decode-command 'AT%XSUDO=7,"c2lnbmF0dXJl";%CMNG=1'
//! [{"name":"%XSUDO","kind":"SET","params":[7,"c2lnbmF0dXJl"]},{"name":"%CMNG","kind":"SET","params":[1]}]
//! $ atcodec encode-response '{"name":"+CME ERROR","params":[513]}'
//! +CME ERROR: 513
//! ```

pub mod error;

use std::io::{BufRead, Write};

use clap::{Parser, Subcommand};
use nrf_at::segment::{split, split_command_line, strip_at_prefix};
use nrf_at::{
    decode_command, decode_response, encode_command, encode_response, Command, CommandLine,
    ParamValue, Response,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use error::{ToolError, ToolResult};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "atcodec", version, about = "Decode and encode nRF91 AT command lines")]
pub struct Cli {
    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub operation: Operation,
}

/// What to do with each input line.
#[derive(Debug, Clone, Subcommand)]
pub enum Operation {
    /// Decode an AT command line into a JSON array of commands.
    DecodeCommand {
        /// Command line; read from stdin when omitted.
        line: Option<String>,
    },
    /// Decode a response line into a JSON object.
    DecodeResponse {
        /// Response line; read from stdin when omitted.
        line: Option<String>,
    },
    /// Encode a JSON command (or array of commands) as an AT line.
    EncodeCommand {
        /// JSON input; read from stdin when omitted.
        json: Option<String>,
    },
    /// Encode a JSON response object as a response line.
    EncodeResponse {
        /// JSON input; read from stdin when omitted.
        json: Option<String>,
    },
    /// Show the top-level segments of a line as a JSON array.
    Split {
        /// Line to split; read from stdin when omitted.
        line: Option<String>,
    },
}

impl Operation {
    /// The input given on the command line, if any.
    pub fn input(&self) -> Option<&str> {
        match self {
            Operation::DecodeCommand { line }
            | Operation::DecodeResponse { line }
            | Operation::Split { line } => line.as_deref(),
            Operation::EncodeCommand { json } | Operation::EncodeResponse { json } => {
                json.as_deref()
            }
        }
    }
}

/// JSON accepted by `encode-command`: one command or a whole line.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CommandInput {
    Line(CommandLine),
    Single(Command),
}

/// JSON accepted by `encode-response`. Any `error` field is ignored; the
/// flag is derived from the name.
#[derive(Debug, Deserialize)]
struct ResponseInput {
    name: String,
    #[serde(default)]
    params: Vec<ParamValue>,
}

/// Process one input line, returning the text to print.
pub fn process_line(operation: &Operation, line: &str, pretty: bool) -> ToolResult<String> {
    match operation {
        Operation::DecodeCommand { .. } => to_json(&decode_command(line)?, pretty),
        Operation::DecodeResponse { .. } => to_json(&decode_response(line)?, pretty),
        Operation::EncodeCommand { .. } => {
            let line = match serde_json::from_str::<CommandInput>(line)? {
                CommandInput::Line(line) => line,
                CommandInput::Single(command) => CommandLine::single(command),
            };
            line.validate()?;
            Ok(encode_command(&line))
        }
        Operation::EncodeResponse { .. } => {
            let input: ResponseInput = serde_json::from_str(line)?;
            let response = Response::new(input.name, input.params);
            response.validate()?;
            Ok(encode_response(&response))
        }
        Operation::Split { .. } => {
            let line = line.trim();
            let segments = if strip_at_prefix(line).is_some() {
                split_command_line(line)?
            } else {
                split(line)?
            };
            let texts: Vec<&str> = segments.iter().map(|s| s.text).collect();
            to_json(&texts, pretty)
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> ToolResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Run the tool. Returns the number of input lines that failed.
///
/// An input given as an argument must succeed; its error is returned.
/// Lines read from `input` are processed independently and failures are
/// reported on `errors` so later lines still run.
pub fn run<R, W, E>(cli: &Cli, input: R, output: &mut W, errors: &mut E) -> ToolResult<usize>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    if let Some(line) = cli.operation.input() {
        let text = process_line(&cli.operation, line, cli.pretty)?;
        writeln!(output, "{}", text)?;
        return Ok(0);
    }

    let mut failures = 0;
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        debug!(line = index + 1, "processing {:?}", line);
        match process_line(&cli.operation, &line, cli.pretty) {
            Ok(text) => writeln!(output, "{}", text)?,
            Err(e) => {
                warn!(line = index + 1, "{}", e);
                writeln!(errors, "line {}: {}", index + 1, e)?;
                failures += 1;
            }
        }
    }
    Ok(failures)
}
