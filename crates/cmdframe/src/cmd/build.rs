use cmdframe_codec::Command;

use crate::cmd::BuildArgs;
use crate::exit::{build_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_command, OutputFormat};

pub fn run(args: BuildArgs, format: OutputFormat) -> CliResult<i32> {
    let cmd = command_from_args(&args)?;
    let frame = cmd
        .build()
        .map_err(|err| build_error("build failed", err))?;
    tracing::debug!(frame = %frame, "built frame");

    print_command(&cmd, format);
    Ok(SUCCESS)
}

fn command_from_args(args: &BuildArgs) -> CliResult<Command> {
    let mut cmd = Command::new().with_command(&args.command);
    if let Some(kind) = &args.kind {
        cmd.set_msg_kind(kind);
    }
    cmd.set_headers(&args.headers);

    for param in &args.params {
        let (key, value) = param.split_once('=').unwrap_or((param.as_str(), ""));
        cmd.set_param(key.trim(), value)
            .map_err(|err| CliError::new(USAGE, format!("invalid --param '{param}': {err}")))?;
    }
    Ok(cmd)
}
