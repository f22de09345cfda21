//! Responses returned by the modem.
//!
//! Responses are either a bare result code or a name followed by `:` and a
//! parameter list:
//! - `OK`, `ERROR`
//! - `+CME ERROR: 513`, `+CMS ERROR: 128`
//! - `+CGSN: "352656100032138"`
//! - `+CNUM: ,"+1234567891234",145`
//!
//! Any other line is information text, such as `Nordic Semiconductor ASA`
//! (`AT+CGMI`) or a bare IMEI (`AT+CGSN`). It decodes to an unnamed response
//! holding the whole line as [`ParamValue::Raw`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, DecodeResult, ValueError, ValueResult};
use crate::segment::{find_top_level, Segment, RESPONSE_SEPARATOR};
use crate::value::{decode_params, validate_params, ParamList, ParamValue};

/// Final result code of a successful command.
pub const RSP_OK: &str = "OK";

/// Final result code of a failed command.
pub const RSP_ERROR: &str = "ERROR";

/// Result codes of ITU-T V.250; the only response names without a `+` or
/// `%` prefix.
pub const RESULT_CODES: &[&str] = &[
    RSP_OK,
    "CONNECT",
    "RING",
    "NO CARRIER",
    RSP_ERROR,
    "NO DIALTONE",
    "BUSY",
    "NO ANSWER",
];

/// Suffix shared by the extended error responses (`+CME ERROR`, `+CMS ERROR`).
const ERROR_SUFFIX: &str = " ERROR";

/// A single response line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Response name, e.g. `OK` or `+CME ERROR`; empty for an information line.
    pub name: String,
    /// Whether the name is one of the error forms.
    #[serde(default)]
    pub error: bool,
    /// Parameters following the `:`.
    #[serde(default)]
    pub params: Vec<ParamValue>,
}

impl Response {
    /// Create a response, deriving the error flag from the name.
    pub fn new(name: impl Into<String>, params: Vec<ParamValue>) -> Self {
        let name = name.into();
        Response {
            error: is_error_name(&name),
            name,
            params,
        }
    }

    /// An information line: no name, the text kept verbatim.
    pub fn info(text: impl Into<String>) -> Self {
        Response {
            name: String::new(),
            error: false,
            params: vec![ParamValue::Raw(text.into())],
        }
    }

    /// Check if this is an information line.
    pub fn is_info(&self) -> bool {
        self.name.is_empty()
    }

    /// Text of an information line.
    pub fn info_text(&self) -> Option<&str> {
        if !self.is_info() {
            return None;
        }
        match self.params.as_slice() {
            [param] => param.as_raw(),
            _ => None,
        }
    }

    /// The `OK` final response.
    pub fn ok() -> Self {
        Response::new(RSP_OK, Vec::new())
    }

    /// Check if this is the `OK` result code.
    pub fn is_ok(&self) -> bool {
        self.name == RSP_OK
    }

    /// Check if this response ends a command exchange (`OK` or an error).
    pub fn is_final(&self) -> bool {
        self.is_ok() || self.error
    }

    /// Get the numeric error code of an error response, e.g. 513 for `+CME ERROR: 513`.
    pub fn error_code(&self) -> Option<i64> {
        if !self.error {
            return None;
        }
        self.params.first().and_then(ParamValue::as_i64)
    }

    /// Encode the response line.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Check that the response survives an encode/decode round trip.
    pub fn validate(&self) -> ValueResult<()> {
        if self.is_info() {
            return match self.info_text() {
                Some(text) if is_valid_info_text(text) && !self.error => Ok(()),
                _ => Err(ValueError::InvalidInformationText),
            };
        }
        if !is_response_name(&self.name) {
            return Err(ValueError::InvalidName(self.name.clone()));
        }
        if self.error != is_error_name(&self.name) {
            return Err(ValueError::ErrorFlagMismatch(self.name.clone()));
        }
        validate_params(&self.params)
    }

    /// Decode one response segment.
    pub(crate) fn decode_segment(segment: &Segment<'_>) -> DecodeResult<Response> {
        let text = segment.text;
        let base = segment.offset;

        let colon = find_top_level(text, RESPONSE_SEPARATOR, base)?;
        let raw_name = match colon {
            Some(colon) => &text[..colon],
            None => text,
        };

        let name = raw_name.trim();
        if !is_response_name(name) {
            let position = base + (raw_name.len() - raw_name.trim_start().len());
            return Err(DecodeError::EmptyName { position });
        }

        let params = match colon {
            Some(colon) => decode_params(&text[colon + 1..], base + colon + 1)?,
            None => Vec::new(),
        };

        let response = Response::new(name, params);
        if response.error {
            log::debug!("modem reported {} (code {:?})", response.name, response.error_code());
        }
        Ok(response)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_info() {
            return write!(f, "{}", ParamList(&self.params));
        }
        write!(f, "{}", self.name)?;
        if !self.params.is_empty() {
            write!(f, "{} {}", RESPONSE_SEPARATOR, ParamList(&self.params))?;
        }
        Ok(())
    }
}

impl FromStr for Response {
    type Err = DecodeError;

    fn from_str(line: &str) -> DecodeResult<Self> {
        crate::codec::decode_response(line)
    }
}

/// Whether `name` is one of the error result forms. Case-sensitive.
fn is_error_name(name: &str) -> bool {
    name == RSP_ERROR || (has_name_prefix(name) && name.ends_with(ERROR_SUFFIX))
}

fn has_name_prefix(name: &str) -> bool {
    name.starts_with('+') || name.starts_with('%')
}

/// Whether `name` is a response name.
///
/// Either a `+`/`%` name made of alphanumeric words (`+CME ERROR`), or one of
/// the [`RESULT_CODES`].
fn is_response_name(name: &str) -> bool {
    if !has_name_prefix(name) {
        return RESULT_CODES.contains(&name);
    }
    let body = &name[1..];
    !body.is_empty()
        && body.split(' ').all(|word| {
            !word.is_empty() && word.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
        })
}

/// Whether a trimmed line is information text rather than a named response.
///
/// Named responses start with a `+`/`%` name or a result code, optionally
/// followed by `:`. Malformed named responses still count as named so their
/// errors are reported.
pub(crate) fn is_info_line(line: &str) -> bool {
    let head = line
        .split_once(RESPONSE_SEPARATOR)
        .map_or(line, |(head, _)| head)
        .trim();
    !has_name_prefix(head) && !RESULT_CODES.contains(&head)
}

/// Text that decodes back to the same information line.
fn is_valid_info_text(text: &str) -> bool {
    !text.is_empty()
        && text.trim() == text
        && !text.contains(|c: char| c == '\r' || c == '\n')
        && is_info_line(text)
}
