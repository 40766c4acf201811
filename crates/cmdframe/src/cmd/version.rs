use cmdframe_codec::{PREFIX, SUFFIX};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("cmdframe {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: cmdframe");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("CMDFRAME_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "rustc: {}",
        option_env!("CMDFRAME_RUSTC_VERSION").unwrap_or("unknown")
    );
    println!("grammar: {PREFIX}[HEADER:]*[KIND:]COMMAND[{{key=value,...}}]{SUFFIX}");
    println!("params: sorted by key, flags allowed, quoted values");

    Ok(SUCCESS)
}
