use std::fmt;
use std::io;

use cmdframe_codec::{BuildError, ParseError};

// Exit codes follow sysexits where one applies.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 65;
pub const USAGE: i32 = 64;
pub const IO_ERROR: i32 = 74;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::BrokenPipe => FAILURE,
        io::ErrorKind::InvalidData => DATA_INVALID,
        _ => IO_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn parse_error(context: &str, err: &ParseError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn build_error(context: &str, err: BuildError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}
