//! Parameter values and the parameter-list grammar.
//!
//! Parameters are separated by `,`. Each one is:
//! - empty (`Absent`), as in `+CNUM: ,"+1234567891234",145`
//! - a signed decimal integer
//! - a double-quoted string, taken verbatim
//! - a list `[a,b,...]` of the above (modem output also uses `(a,b,...)`)
//!
//! Lists never contain lists.
//!
//! Information lines that carry no name at all (`Nordic Semiconductor ASA`
//! in answer to `AT+CGMI`) are kept verbatim as [`ParamValue::Raw`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, DecodeResult, ValueError, ValueResult};
use crate::segment::{split_top_level, PARAM_SEPARATOR, QUOTE};

/// A single command or response parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Omitted parameter.
    Absent,
    /// Integer parameter.
    Integer(i64),
    /// String parameter, without its quotes.
    Text(String),
    /// List parameter; elements are never lists themselves.
    List(Vec<ParamValue>),
    /// Unparsed text of an information line, encoded without quotes.
    /// Serialized as `{"raw": "..."}` to keep it apart from `Text`.
    Raw(#[serde(with = "raw_form")] String),
}

impl ParamValue {
    /// Get the integer if this is an `Integer`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the text if this is a `Text`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Get the text if this is `Raw`.
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            ParamValue::Raw(v) => Some(v),
            _ => None,
        }
    }

    /// Get the elements if this is a `List`.
    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            ParamValue::List(v) => Some(v),
            _ => None,
        }
    }

    /// Check if the parameter was omitted.
    pub fn is_absent(&self) -> bool {
        matches!(self, ParamValue::Absent)
    }

    /// Check that this value survives an encode/decode round trip.
    ///
    /// `index` is the position of the value in its parameter list and is
    /// reported back in the error.
    pub fn validate(&self, index: usize) -> ValueResult<()> {
        match self {
            ParamValue::Absent | ParamValue::Integer(_) => Ok(()),
            ParamValue::Text(text) => validate_text(text, index),
            ParamValue::Raw(_) => Err(ValueError::RawParam { index }),
            ParamValue::List(items) => {
                if let [ParamValue::Absent] = items.as_slice() {
                    return Err(ValueError::AmbiguousList { index });
                }
                for item in items {
                    match item {
                        ParamValue::List(_) => return Err(ValueError::NestedList { index }),
                        ParamValue::Raw(_) => return Err(ValueError::RawParam { index }),
                        ParamValue::Text(text) => validate_text(text, index)?,
                        ParamValue::Absent | ParamValue::Integer(_) => {}
                    }
                }
                Ok(())
            }
        }
    }
}

fn validate_text(text: &str, index: usize) -> ValueResult<()> {
    if text.contains(QUOTE) {
        Err(ValueError::QuoteInText { index })
    } else {
        Ok(())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Absent => Ok(()),
            ParamValue::Integer(v) => write!(f, "{}", v),
            ParamValue::Text(v) => write!(f, "\"{}\"", v),
            ParamValue::List(items) => write!(f, "[{}]", ParamList(items)),
            ParamValue::Raw(v) => write!(f, "{}", v),
        }
    }
}

/// Display adapter that renders a comma-separated parameter list.
pub(crate) struct ParamList<'a>(pub(crate) &'a [ParamValue]);

impl fmt::Display for ParamList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, param) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", PARAM_SEPARATOR)?;
            }
            write!(f, "{}", param)?;
        }
        Ok(())
    }
}

/// Validate every parameter of a list.
pub(crate) fn validate_params(params: &[ParamValue]) -> ValueResult<()> {
    params
        .iter()
        .enumerate()
        .try_for_each(|(index, param)| param.validate(index))
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode a comma-separated parameter list.
///
/// `base` is the position of `text` in the original line.
pub(crate) fn decode_params(text: &str, base: usize) -> DecodeResult<Vec<ParamValue>> {
    decode_list_items(text, base, false)
}

fn decode_list_items(text: &str, base: usize, in_list: bool) -> DecodeResult<Vec<ParamValue>> {
    split_top_level(text, PARAM_SEPARATOR, base)?
        .into_iter()
        .map(|range| decode_token(&text[range.clone()], base + range.start, in_list))
        .collect()
}

fn decode_token(raw: &str, base: usize, in_list: bool) -> DecodeResult<ParamValue> {
    let token = raw.trim();
    let position = base + (raw.len() - raw.trim_start().len());

    if token.is_empty() {
        return Ok(ParamValue::Absent);
    }

    match token.as_bytes()[0] {
        b'"' => {
            let inner = token
                .strip_prefix(QUOTE)
                .and_then(|t| t.strip_suffix(QUOTE))
                .filter(|t| !t.contains(QUOTE))
                .ok_or_else(|| DecodeError::unrecognized(token, position))?;
            Ok(ParamValue::Text(inner.to_string()))
        }
        opener @ (b'[' | b'(') => {
            if in_list {
                return Err(DecodeError::NestedListTooDeep { position });
            }
            if closing_bracket(token) != Some(token.len() - 1) {
                return Err(DecodeError::unrecognized(token, position));
            }
            let body = &token[1..token.len() - 1];
            log::trace!("decoding {} list at position {}", opener as char, position);
            if body.trim().is_empty() {
                return Ok(ParamValue::List(Vec::new()));
            }
            decode_list_items(body, position + 1, true).map(ParamValue::List)
        }
        _ => token
            .parse::<i64>()
            .map(ParamValue::Integer)
            .map_err(|_| DecodeError::unrecognized(token, position)),
    }
}

/// Index of the bracket closing the one that opens `token`.
///
/// Quoting and bracket balance have already been checked by the segmenter.
fn closing_bracket(token: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_quote = false;
    for (i, byte) in token.bytes().enumerate() {
        match byte {
            b'"' => in_quote = !in_quote,
            _ if in_quote => {}
            b'[' | b'(' => depth += 1,
            b']' | b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Serde form of [`ParamValue::Raw`].
mod raw_form {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct RawForm<T> {
        raw: T,
    }

    pub fn serialize<S: Serializer>(text: &str, serializer: S) -> Result<S::Ok, S::Error> {
        RawForm { raw: text }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        RawForm::<String>::deserialize(deserializer).map(|form| form.raw)
    }
}

// ============================================================================
// From implementations for ParamValue
// ============================================================================

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Integer(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Integer(v as i64)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Integer(v as i64)
    }
}

impl From<u16> for ParamValue {
    fn from(v: u16) -> Self {
        ParamValue::Integer(v as i64)
    }
}

impl From<u8> for ParamValue {
    fn from(v: u8) -> Self {
        ParamValue::Integer(v as i64)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<Vec<ParamValue>> for ParamValue {
    fn from(v: Vec<ParamValue>) -> Self {
        ParamValue::List(v)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => ParamValue::Absent,
        }
    }
}
