//! AT commands sent to the modem.
//!
//! Every command has a `+` (standard) or `%` (Nordic proprietary) name and
//! one of three forms:
//! - SET: `+CFUN=1`, or bare `+CGMI` with no parameters
//! - READ: `+CFUN?`
//! - TEST: `+CFUN=?`
//!
//! Several commands can share one line: `AT%XSUDO=7,"c2lnbmF0dXJl";%CMNG=1`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, DecodeResult, ValueError, ValueResult};
use crate::segment::{Segment, AT_PREFIX, CONCAT_SEPARATOR};
use crate::value::{decode_params, validate_params, ParamList, ParamValue};

/// Marker following the name of a READ command.
pub const READ_IDENT: &str = "?";

/// Marker following the name of a TEST command.
pub const TEST_IDENT: &str = "=?";

/// Marker introducing the parameters of a SET command.
pub const SET_IDENT: &str = "=";

/// The form of an AT command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommandKind {
    /// Set values, or execute a command that takes none.
    Set,
    /// Read the current values.
    Read,
    /// Query the supported values.
    Test,
}

/// A single AT command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Command name including its `+` or `%` prefix.
    pub name: String,
    /// Command form.
    pub kind: CommandKind,
    /// Parameters; only SET commands carry any.
    #[serde(default)]
    pub params: Vec<ParamValue>,
}

impl Command {
    /// Create a SET command. With no parameters this is the bare form.
    pub fn set(name: impl Into<String>, params: Vec<ParamValue>) -> Self {
        Command {
            name: name.into(),
            kind: CommandKind::Set,
            params,
        }
    }

    /// Create a READ command.
    pub fn read(name: impl Into<String>) -> Self {
        Command {
            name: name.into(),
            kind: CommandKind::Read,
            params: Vec::new(),
        }
    }

    /// Create a TEST command.
    pub fn test(name: impl Into<String>) -> Self {
        Command {
            name: name.into(),
            kind: CommandKind::Test,
            params: Vec::new(),
        }
    }

    /// Encode the command without the `AT` prefix.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Check that the command survives an encode/decode round trip.
    pub fn validate(&self) -> ValueResult<()> {
        if command_name_len(&self.name) != Some(self.name.len()) {
            return Err(ValueError::InvalidName(self.name.clone()));
        }
        if self.kind != CommandKind::Set && !self.params.is_empty() {
            return Err(ValueError::UnexpectedParams(self.name.clone()));
        }
        validate_params(&self.params)
    }

    /// Decode one segment of a command line.
    pub(crate) fn decode_segment(segment: &Segment<'_>) -> DecodeResult<Command> {
        let text = segment.text.trim();
        let base = segment.offset + (segment.text.len() - segment.text.trim_start().len());

        let name_len = command_name_len(text).ok_or(DecodeError::EmptyName { position: base })?;
        let (name, rest) = text.split_at(name_len);
        let rest_base = base + name_len;

        let (kind, params) = match rest {
            "" => (CommandKind::Set, Vec::new()),
            READ_IDENT => (CommandKind::Read, Vec::new()),
            TEST_IDENT => (CommandKind::Test, Vec::new()),
            _ => match rest.strip_prefix(SET_IDENT) {
                Some(list) => (CommandKind::Set, decode_params(list, rest_base + SET_IDENT.len())?),
                None => return Err(DecodeError::unrecognized(rest, rest_base)),
            },
        };

        log::trace!("decoded {:?} command {} with {} params", kind, name, params.len());

        Ok(Command {
            name: name.to_string(),
            kind,
            params,
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        match self.kind {
            CommandKind::Set if self.params.is_empty() => Ok(()),
            CommandKind::Set => write!(f, "{}{}", SET_IDENT, ParamList(&self.params)),
            CommandKind::Read => write!(f, "{}", READ_IDENT),
            CommandKind::Test => write!(f, "{}", TEST_IDENT),
        }
    }
}

/// Length of the command name at the start of `text`: a `+` or `%`
/// followed by at least one alphanumeric or underscore character.
fn command_name_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    if !matches!(bytes.first(), Some(b'+' | b'%')) {
        return None;
    }
    let len = 1 + bytes[1..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
        .count();
    (len > 1).then_some(len)
}

/// One or more commands sent as a single `AT` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Command>", into = "Vec<Command>")]
pub struct CommandLine {
    commands: Vec<Command>,
}

impl CommandLine {
    /// Create a command line, or `None` if `commands` is empty.
    pub fn new(commands: Vec<Command>) -> Option<Self> {
        if commands.is_empty() {
            None
        } else {
            Some(CommandLine { commands })
        }
    }

    /// Create a command line holding one command.
    pub fn single(command: Command) -> Self {
        CommandLine {
            commands: vec![command],
        }
    }

    /// Append a concatenated command.
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// The commands in line order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// The first command of the line.
    pub fn first(&self) -> &Command {
        &self.commands[0]
    }

    /// Number of commands; never zero.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Always false; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over the commands.
    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    /// Consume the line, returning its commands.
    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }

    /// Encode the whole line including the `AT` prefix.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Validate every command of the line.
    pub fn validate(&self) -> ValueResult<()> {
        self.commands.iter().try_for_each(Command::validate)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", AT_PREFIX)?;
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", CONCAT_SEPARATOR)?;
            }
            write!(f, "{}", command)?;
        }
        Ok(())
    }
}

impl FromStr for CommandLine {
    type Err = DecodeError;

    fn from_str(line: &str) -> DecodeResult<Self> {
        crate::codec::decode_command(line)
    }
}

impl From<Command> for CommandLine {
    fn from(command: Command) -> Self {
        CommandLine::single(command)
    }
}

impl TryFrom<Vec<Command>> for CommandLine {
    type Error = ValueError;

    fn try_from(commands: Vec<Command>) -> ValueResult<Self> {
        CommandLine::new(commands).ok_or(ValueError::EmptyCommandLine)
    }
}

impl From<CommandLine> for Vec<Command> {
    fn from(line: CommandLine) -> Self {
        line.commands
    }
}

impl IntoIterator for CommandLine {
    type Item = Command;
    type IntoIter = std::vec::IntoIter<Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

impl<'a> IntoIterator for &'a CommandLine {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
