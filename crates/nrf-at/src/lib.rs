//! nRF91 AT command codec
//!
//! This crate converts between the textual AT command syntax understood by
//! Nordic nRF91-series modems and typed Rust values. It does no I/O: a
//! transport sends the encoded lines over its serial link and hands the
//! received lines back to the decoder.
//!
//! # Syntax Overview
//!
//! - **Commands** (host → modem): `AT` followed by one or more commands joined
//!   with `;`. Each command is a `+`/`%` name followed by `=<params>` (SET),
//!   `?` (READ), `=?` (TEST), or nothing (bare SET).
//! - **Responses** (modem → host): a result code (`OK`, `ERROR`) or a name,
//!   `:` and a parameter list (`+CME ERROR: 513`, `+CGSN: "352656100032138"`).
//!   Unnamed information text (`Nordic Semiconductor ASA`) is kept verbatim.
//! - **Parameters**: empty, signed integers, double-quoted strings with no
//!   escapes, and one level of `[...]` lists.
//!
//! # Example
//!
//! ```rust,ignore
//! use nrf_at::{decode_command, decode_response, Command, CommandLine};
//!
//! // Build a command
//! let line = CommandLine::single(Command::set("+CFUN", vec![4.into()]));
//! assert_eq!(line.encode(), "AT+CFUN=4");
//!
//! // Parse a response
//! let response = decode_response("+CME ERROR: 518")?;
//! assert_eq!(response.error_code(), Some(518));
//! ```

mod codec;
mod collector;
mod command;
mod error;
mod response;
pub mod segment;
mod value;

pub use codec::*;
pub use collector::*;
pub use command::*;
pub use error::*;
pub use response::*;
pub use value::ParamValue;
