//! Splitting AT lines into top-level segments.
//!
//! A single AT line may carry several commands joined with `;`
//! (e.g. `AT%XSUDO=7,"c2lnbmF0dXJl";%CMNG=1`). Separators that appear inside
//! a double-quoted string or inside a bracketed list are part of the literal,
//! not structure. The same scan is used for `,` between parameters and for
//! the `:` that ends a response name.
//!
//! The grammar has no escape sequences: a `"` always opens or closes a string.

use std::ops::Range;

use crate::error::{DecodeError, DecodeResult, Literal};

/// Prefix that starts every command line, matched case-insensitively.
pub const AT_PREFIX: &str = "AT";

/// Separator between concatenated commands.
pub const CONCAT_SEPARATOR: char = ';';

/// Separator between parameters.
pub const PARAM_SEPARATOR: char = ',';

/// Separator between a response name and its parameters.
pub const RESPONSE_SEPARATOR: char = ':';

/// Delimiter of string parameters.
pub const QUOTE: char = '"';

/// One top-level piece of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// The segment text, untrimmed.
    pub text: &'a str,
    /// Byte offset of `text` in the line that was split.
    pub offset: usize,
}

/// Split `text` on top-level `;`.
pub fn split(text: &str) -> DecodeResult<Vec<Segment<'_>>> {
    split_from(text, 0)
}

/// Consume the `AT` prefix of a command line and split the rest on top-level `;`.
///
/// Segment offsets stay relative to `line`, so they point past the prefix.
pub fn split_command_line(line: &str) -> DecodeResult<Vec<Segment<'_>>> {
    let rest = strip_at_prefix(line).ok_or(DecodeError::MissingPrefix)?;
    split_from(rest, AT_PREFIX.len())
}

/// Strip a leading `AT` (any case) from `line`.
pub fn strip_at_prefix(line: &str) -> Option<&str> {
    let prefix = line.get(..AT_PREFIX.len())?;
    if prefix.eq_ignore_ascii_case(AT_PREFIX) {
        Some(&line[AT_PREFIX.len()..])
    } else {
        None
    }
}

/// Join segments back into the text they were split from.
pub fn join(segments: &[Segment<'_>]) -> String {
    let parts: Vec<&str> = segments.iter().map(|s| s.text).collect();
    parts.join(";")
}

/// Whether a string literal is still open at the end of `text`.
///
/// Used to detect string parameters that continue on the next line.
pub fn has_open_quote(text: &str) -> bool {
    text.bytes().filter(|&b| b == QUOTE as u8).count() % 2 == 1
}

pub(crate) fn split_from(text: &str, base: usize) -> DecodeResult<Vec<Segment<'_>>> {
    let ranges = split_top_level(text, CONCAT_SEPARATOR, base)?;
    Ok(ranges
        .into_iter()
        .map(|range| Segment {
            offset: base + range.start,
            text: &text[range],
        })
        .collect())
}

/// Find the first top-level occurrence of `separator`.
///
/// Also validates quoting and bracketing of the whole of `text`.
pub(crate) fn find_top_level(text: &str, separator: char, base: usize) -> DecodeResult<Option<usize>> {
    let ranges = split_top_level(text, separator, base)?;
    Ok(if ranges.len() > 1 {
        Some(ranges[0].end)
    } else {
        None
    })
}

/// Split `text` on every `separator` outside strings and brackets.
///
/// Returned ranges index into `text`; `base` is only added to error positions.
pub(crate) fn split_top_level(text: &str, separator: char, base: usize) -> DecodeResult<Vec<Range<usize>>> {
    let separator = separator as u8;
    let mut pieces = Vec::new();
    // Expected closer and position of each open bracket.
    let mut open: Vec<(u8, usize)> = Vec::new();
    let mut quote_start: Option<usize> = None;
    let mut start = 0;

    for (i, &byte) in text.as_bytes().iter().enumerate() {
        if quote_start.is_some() {
            if byte == QUOTE as u8 {
                quote_start = None;
            }
            continue;
        }

        match byte {
            b'"' => quote_start = Some(i),
            b'[' => open.push((b']', i)),
            b'(' => open.push((b')', i)),
            b']' | b')' => match open.pop() {
                Some((closer, _)) if closer == byte => {}
                _ => {
                    return Err(DecodeError::MalformedLiteral {
                        literal: Literal::CloseList,
                        position: base + i,
                    })
                }
            },
            _ if byte == separator && open.is_empty() => {
                pieces.push(start..i);
                start = i + 1;
            }
            _ => {}
        }
    }

    if let Some(position) = quote_start {
        return Err(DecodeError::MalformedLiteral {
            literal: Literal::Quote,
            position: base + position,
        });
    }
    if let Some(&(_, position)) = open.first() {
        return Err(DecodeError::MalformedLiteral {
            literal: Literal::OpenList,
            position: base + position,
        });
    }

    pieces.push(start..text.len());
    Ok(pieces)
}
