//! Compact textual command frames for serial links and other constrained
//! byte streams.
//!
//! ```text
//! !!MASTER:ARM#1:CONFIRM:SEND_STAR{color=red,speed=3}##
//! ```
//!
//! # Crate Structure
//!
//! - [`codec`]: `Command` model, parser and serializer
//!
//! The `cli` feature builds the `cmdframe` binary for parsing and building
//! frames from a shell.

/// Re-export codec types.
pub mod codec {
    pub use cmdframe_codec::*;
}

pub use cmdframe_codec::{parse, parse_with_config, Command, ParseConfig, ParseError};
