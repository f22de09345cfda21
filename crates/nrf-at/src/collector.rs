//! Assembling the responses to one command.
//!
//! A command is answered by zero or more intermediate responses followed by
//! a final `OK` or error response:
//!
//! ```text
//! AT%CMNG=1          (sent)
//! %CMNG: 16842753,0,"0000..."
//! %CMNG: 16842753,1,"0000..."
//! OK
//! ```
//!
//! String parameters may span several lines (certificates read back with
//! `%CMNG=2`); such lines are joined with `\n` until the string closes. A
//! final response arriving while a string is open ends the exchange with an
//! error, as does text growing past [`MAX_RESPONSE_LEN`].
//!
//! The collector does no I/O: the transport feeds it lines as they arrive.

use crate::codec::decode_response;
use crate::error::{DecodeError, DecodeResult, Literal};
use crate::response::{is_info_line, Response};
use crate::segment::{has_open_quote, QUOTE};

/// Longest response text buffered, continuation lines included.
/// Certificates stored on the modem are at most 4 KB.
pub const MAX_RESPONSE_LEN: usize = 8 * 1024;

/// The responses to one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// The final `OK` or error response.
    pub result: Response,
    /// Responses received before the final one, in order.
    pub responses: Vec<Response>,
}

impl Exchange {
    /// Check if the command succeeded.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Intermediate responses with the given name, e.g. every `%CMNG` line.
    pub fn responses_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Response> + 'a {
        self.responses.iter().filter(move |r| r.name == name)
    }

    /// Text of the information lines, e.g. the manufacturer for `AT+CGMI`.
    pub fn info_lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.responses.iter().filter_map(Response::info_text)
    }
}

/// Collects response lines until a final response arrives.
#[derive(Debug, Default)]
pub struct ResponseCollector {
    /// Intermediate responses of the current exchange.
    responses: Vec<Response>,
    /// Text of a response whose string parameter is still open.
    pending: String,
}

impl ResponseCollector {
    /// Create an idle collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one received line, without or with its `\r\n` terminator.
    ///
    /// Returns the completed exchange once a final response arrives.
    /// Blank lines between responses are skipped. A line that fails to
    /// decode discards the exchange collected so far; error positions refer
    /// to the (possibly multi-line) response text.
    pub fn push_line(&mut self, line: &str) -> DecodeResult<Option<Exchange>> {
        let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');

        if self.pending.is_empty() {
            if line.trim().is_empty() {
                return Ok(None);
            }
        } else if is_final_line(line) {
            // The buffered string was never closed; the odd quote is its opener.
            let position = self.pending.rfind(QUOTE).unwrap_or(0);
            log::debug!("{} arrived inside an open string parameter", line.trim());
            self.reset();
            return Err(DecodeError::MalformedLiteral {
                literal: Literal::Quote,
                position,
            });
        } else {
            self.pending.push('\n');
        }
        self.pending.push_str(line);

        if self.pending.len() > MAX_RESPONSE_LEN {
            let actual = self.pending.len();
            log::debug!("discarding {} bytes of response text", actual);
            self.reset();
            return Err(DecodeError::BufferOverflow {
                max: MAX_RESPONSE_LEN,
                actual,
            });
        }

        if has_open_quote(&self.pending) && !is_info_line(self.pending.trim()) {
            log::trace!("string parameter continues past line end");
            return Ok(None);
        }

        let text = std::mem::take(&mut self.pending);
        let response = match decode_response(&text) {
            Ok(response) => response,
            Err(e) => {
                log::debug!("discarding exchange after undecodable line {:?}: {}", text, e);
                self.reset();
                return Err(e);
            }
        };

        if !response.is_final() {
            self.responses.push(response);
            return Ok(None);
        }

        let responses = std::mem::take(&mut self.responses);
        log::debug!(
            "exchange complete: {} after {} responses",
            response.name,
            responses.len()
        );
        Ok(Some(Exchange {
            result: response,
            responses,
        }))
    }

    /// Check if no exchange is in progress.
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.responses.is_empty()
    }

    /// Intermediate responses collected so far.
    pub fn pending_responses(&self) -> &[Response] {
        &self.responses
    }

    /// Drop any partially collected exchange.
    pub fn reset(&mut self) {
        self.responses.clear();
        self.pending.clear();
    }
}

fn is_final_line(line: &str) -> bool {
    matches!(decode_response(line), Ok(response) if response.is_final())
}
