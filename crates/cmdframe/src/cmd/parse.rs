use std::io::{self, BufRead};

use cmdframe_codec::{parse_bytes_with_config, ParseError};

use crate::cmd::ParseArgs;
use crate::exit::{io_error, parse_error, CliResult, SUCCESS};
use crate::output::{print_command, print_rejection, OutputFormat};

pub fn run(args: ParseArgs, format: OutputFormat) -> CliResult<i32> {
    let config = args.config();
    let frames = if args.frames.is_empty() {
        read_frames(io::stdin().lock()).map_err(|err| io_error("failed reading stdin", err))?
    } else {
        args.frames.into_iter().map(String::into_bytes).collect()
    };

    let mut rejected = 0usize;
    let mut first_rejection: Option<(usize, ParseError)> = None;
    for (index, input) in frames.iter().enumerate() {
        match parse_bytes_with_config(input, &config) {
            Ok(cmd) => print_command(&cmd, format),
            Err(err) => {
                tracing::warn!(frame = index + 1, error = %err, "frame rejected");
                print_rejection(&String::from_utf8_lossy(input), &err, format);
                rejected += 1;
                first_rejection.get_or_insert((index + 1, err));
            }
        }
    }

    if let Some((index, err)) = first_rejection {
        let mut cli_err = parse_error(&format!("frame {index}"), &err);
        if rejected > 1 {
            cli_err.message = format!(
                "{} ({rejected} of {} frames rejected)",
                cli_err.message,
                frames.len()
            );
        }
        return Err(cli_err);
    }

    tracing::info!(frames = frames.len(), "parsed frames");
    Ok(SUCCESS)
}

/// One frame per line, kept as raw bytes so a line that is not UTF-8 is
/// rejected on its own. Blank lines are skipped and line endings stripped.
fn read_frames(reader: impl BufRead) -> io::Result<Vec<Vec<u8>>> {
    let mut frames = Vec::new();
    for line in reader.split(b'\n') {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if !line.iter().all(u8::is_ascii_whitespace) {
            frames.push(line);
        }
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn read_frames_skips_blank_lines() {
        let input = Cursor::new("!!A:B##\r\n\n   \n!!C{d=1}##\n");
        let frames = read_frames(input).unwrap();
        assert_eq!(frames, [b"!!A:B##".to_vec(), b"!!C{d=1}##".to_vec()]);
    }

    #[test]
    fn read_frames_keeps_frame_whitespace() {
        let input = Cursor::new(" !!A##\n");
        let frames = read_frames(input).unwrap();
        assert_eq!(frames, [b" !!A##".to_vec()]);
    }

    #[test]
    fn read_frames_keeps_non_utf8_lines() {
        let input = Cursor::new(b"!!PING##\n!!C{a=\xff}##\n!!PONG##".to_vec());
        let frames = read_frames(input).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1], b"!!C{a=\xff}##");
        assert_eq!(frames[2], b"!!PONG##");
    }
}
