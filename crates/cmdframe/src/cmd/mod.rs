use clap::{Args, Subcommand};
use cmdframe_codec::{FlagPolicy, ParseConfig};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod build;
pub mod parse;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse frames from arguments or stdin (one per line).
    Parse(ParseArgs),
    /// Build a frame from its parts.
    Build(BuildArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Parse(args) => parse::run(args, format),
        Command::Build(args) => build::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Frames to parse. Reads stdin when omitted.
    pub frames: Vec<String>,
    /// Reject parameters without `=value`.
    #[arg(long, env = "CMDFRAME_REJECT_FLAGS")]
    pub reject_flags: bool,
    /// Require a message kind before the command.
    #[arg(long, env = "CMDFRAME_REQUIRE_KIND")]
    pub require_kind: bool,
    /// Maximum number of parameters per frame.
    #[arg(long, value_name = "N", env = "CMDFRAME_MAX_PARAMS")]
    pub max_params: Option<usize>,
}

impl ParseArgs {
    pub fn config(&self) -> ParseConfig {
        ParseConfig {
            flags: if self.reject_flags {
                FlagPolicy::Reject
            } else {
                FlagPolicy::Allow
            },
            require_kind: self.require_kind,
            max_params: self.max_params,
        }
    }
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Command name.
    #[arg(long)]
    pub command: String,
    /// Message kind (e.g. REQUEST, CONFIRM).
    #[arg(long)]
    pub kind: Option<String>,
    /// Routing header; repeat in frame order.
    #[arg(long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,
    /// Parameter as key=value, or a bare key for a flag; repeatable.
    #[arg(long = "param", short = 'p', value_name = "KEY[=VALUE]")]
    pub params: Vec<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_args_map_to_config() {
        let args = ParseArgs {
            frames: Vec::new(),
            reject_flags: true,
            require_kind: false,
            max_params: Some(3),
        };
        let config = args.config();
        assert_eq!(config.flags, FlagPolicy::Reject);
        assert!(!config.require_kind);
        assert_eq!(config.max_params, Some(3));
    }
}
