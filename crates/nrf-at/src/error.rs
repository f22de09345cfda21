//! Error types for the AT codec.

use std::fmt;

use thiserror::Error;

/// The literal construct a [`DecodeError::MalformedLiteral`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    /// A double-quoted string that is never closed.
    Quote,
    /// A `[` or `(` without its matching closer.
    OpenList,
    /// A `]` or `)` with no opener, or closing the wrong kind of bracket.
    CloseList,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Quote => write!(f, "unterminated string"),
            Literal::OpenList => write!(f, "unterminated list"),
            Literal::CloseList => write!(f, "unbalanced list terminator"),
        }
    }
}

/// Errors that can occur when decoding an AT line.
///
/// Every position is a byte offset into the line handed to the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A quote or bracket is not properly terminated.
    #[error("malformed literal: {literal} at position {position}")]
    MalformedLiteral {
        /// Which construct is broken.
        literal: Literal,
        /// Position of the offending character.
        position: usize,
    },

    /// A command line does not start with `AT`.
    #[error("command line does not start with 'AT'")]
    MissingPrefix,

    /// The segment has no recognizable command or response name.
    #[error("no command or response name at position {position}")]
    EmptyName {
        /// Start of the segment.
        position: usize,
    },

    /// A parameter token is none of absent, integer, string or list.
    #[error("unrecognized parameter token {token:?} at position {position}")]
    UnrecognizedParamToken {
        /// The offending token, trimmed.
        token: String,
        /// Start of the token.
        position: usize,
    },

    /// A list appears inside another list.
    #[error("list nested more than one level deep at position {position}")]
    NestedListTooDeep {
        /// Start of the inner list.
        position: usize,
    },

    /// A response line holds more than one `;`-separated segment.
    #[error("unexpected segment at position {position} in response")]
    UnexpectedSegment {
        /// Start of the first extra segment.
        position: usize,
    },

    /// A response grew past the longest text the collector buffers.
    #[error("buffer overflow: max {max} bytes, got {actual}")]
    BufferOverflow { max: usize, actual: usize },
}

impl DecodeError {
    /// Create an unrecognized-token error.
    pub fn unrecognized(token: impl Into<String>, position: usize) -> Self {
        DecodeError::UnrecognizedParamToken {
            token: token.into(),
            position,
        }
    }

    /// Byte offset the error points at, when it has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            DecodeError::MalformedLiteral { position, .. }
            | DecodeError::EmptyName { position }
            | DecodeError::UnrecognizedParamToken { position, .. }
            | DecodeError::NestedListTooDeep { position }
            | DecodeError::UnexpectedSegment { position } => Some(*position),
            DecodeError::MissingPrefix | DecodeError::BufferOverflow { .. } => None,
        }
    }
}

/// Values the textual grammar cannot carry, reported by the `validate` methods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Command or response name does not follow the name grammar.
    #[error("invalid name: {0:?}")]
    InvalidName(String),

    /// Response error flag disagrees with what its name implies.
    #[error("error flag of response {0:?} does not match its name")]
    ErrorFlagMismatch(String),

    /// A READ or TEST command carries parameters, which its syntax cannot express.
    #[error("{0} takes no parameters in this form")]
    UnexpectedParams(String),

    /// Text parameter contains a double quote, which has no escape.
    #[error("text parameter {index} contains a double quote")]
    QuoteInText {
        /// Index of the offending top-level parameter.
        index: usize,
    },

    /// A list contains another list.
    #[error("list parameter {index} contains a nested list")]
    NestedList {
        /// Index of the offending top-level parameter.
        index: usize,
    },

    /// A list holding a single absent element encodes the same as an empty list.
    #[error("list parameter {index} holds only an absent element")]
    AmbiguousList {
        /// Index of the offending top-level parameter.
        index: usize,
    },

    /// Raw text appears as a parameter; it only forms information lines.
    #[error("parameter {index} is raw text")]
    RawParam {
        /// Index of the offending top-level parameter.
        index: usize,
    },

    /// An information line is not a single trimmed line of raw text that
    /// decodes back as information.
    #[error("invalid information text")]
    InvalidInformationText,

    /// A command line must hold at least one command.
    #[error("command line holds no commands")]
    EmptyCommandLine,
}

/// Result type alias for decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type alias for value validation.
pub type ValueResult<T> = Result<T, ValueError>;
