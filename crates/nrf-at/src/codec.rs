//! Line-level entry points of the codec.
//!
//! Lines are expected without their `\r\n` terminator; surrounding
//! whitespace is ignored on decode. Positions in errors are byte offsets
//! into the line as passed in.

use crate::command::{Command, CommandLine};
use crate::error::{DecodeError, DecodeResult};
use crate::response::{is_info_line, Response};
use crate::segment::{split_from, strip_at_prefix, AT_PREFIX};

/// Decode an `AT` command line into its commands.
pub fn decode_command(line: &str) -> DecodeResult<CommandLine> {
    let (line, base) = trim_line(line);
    let rest = strip_at_prefix(line).ok_or(DecodeError::MissingPrefix)?;

    let commands = split_from(rest, base + AT_PREFIX.len())?
        .iter()
        .map(Command::decode_segment)
        .collect::<DecodeResult<Vec<_>>>()?;

    log::trace!("decoded command line with {} commands", commands.len());

    CommandLine::new(commands).ok_or(DecodeError::EmptyName {
        position: base + AT_PREFIX.len(),
    })
}

/// Decode a single response line.
///
/// A line that starts with neither a `+`/`%` name nor a result code is
/// information text and decodes to [`Response::info`] without further parsing.
pub fn decode_response(line: &str) -> DecodeResult<Response> {
    let (line, base) = trim_line(line);
    if !line.is_empty() && is_info_line(line) {
        log::trace!("information line of {} bytes", line.len());
        return Ok(Response::info(line));
    }
    let segments = split_from(line, base)?;

    match segments.as_slice() {
        [segment] => Response::decode_segment(segment),
        [_, extra, ..] => Err(DecodeError::UnexpectedSegment {
            position: extra.offset,
        }),
        [] => Err(DecodeError::EmptyName { position: base }),
    }
}

/// Encode a command line, including the `AT` prefix.
pub fn encode_command(line: &CommandLine) -> String {
    line.encode()
}

/// Encode a response line.
pub fn encode_response(response: &Response) -> String {
    response.encode()
}

/// Trim surrounding whitespace, returning the offset of the trimmed text.
fn trim_line(line: &str) -> (&str, usize) {
    let start = line.len() - line.trim_start().len();
    (line.trim(), start)
}
