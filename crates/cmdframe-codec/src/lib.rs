//! Textual command frames for constrained byte streams.
//!
//! A frame carries a command name, an optional message kind, routing headers
//! and named parameters:
//!
//! ```text
//! !!SRC:DEST:KIND:COMMAND{key=value,flag,quoted="a,b"}##
//! ```
//!
//! - `!!` / `##` delimit the frame
//! - the last `:` segment is the command, the one before it the message kind,
//!   everything earlier is a header
//! - the `{...}` section is omitted when there are no parameters
//!
//! Parsing is a single pass over the input with no retained state.

pub mod command;
pub mod config;
pub mod error;
pub mod grammar;
pub mod parser;

pub use command::Command;
pub use config::{FlagPolicy, ParseConfig};
pub use error::{BuildError, ParamError, ParseError, Result};
pub use grammar::{
    HEADER_SEPARATOR, KEY_VALUE_SEPARATOR, PARAMS_CLOSE, PARAMS_OPEN, PARAM_SEPARATOR, PREFIX,
    QUOTES, SUFFIX,
};
pub use parser::{parse, parse_bytes, parse_bytes_with_config, parse_with_config};
