use tracing::{debug, trace};

use crate::command::Command;
use crate::config::{FlagPolicy, ParseConfig};
use crate::error::{ParamError, ParseError, Result};
use crate::grammar::{
    is_quote, HEADER_SEPARATOR, KEY_VALUE_SEPARATOR, PARAMS_CLOSE, PARAMS_OPEN, PARAM_SEPARATOR,
    PREFIX, SUFFIX,
};

/// Parse a frame with the default [`ParseConfig`].
pub fn parse(input: &str) -> Result<Command> {
    parse_with_config(input, &ParseConfig::default())
}

/// Parse a frame received as raw bytes with the default [`ParseConfig`].
pub fn parse_bytes(input: &[u8]) -> Result<Command> {
    parse_bytes_with_config(input, &ParseConfig::default())
}

/// Parse a frame received as raw bytes. Input that is not UTF-8 fails with
/// [`ParseError::InvalidUtf8`].
pub fn parse_bytes_with_config(input: &[u8], config: &ParseConfig) -> Result<Command> {
    match std::str::from_utf8(input) {
        Ok(input) => parse_with_config(input, config),
        Err(err) => {
            debug!(error = %err, len = input.len(), "rejected frame");
            Err(err.into())
        }
    }
}

/// Parse a frame.
///
/// Fails on the first error; no partially populated command is returned.
/// `config.max_params` bounds the frame only: the returned command is
/// unbounded.
pub fn parse_with_config(input: &str, config: &ParseConfig) -> Result<Command> {
    match parse_frame(input, config) {
        Ok(command) => {
            trace!(
                headers = command.headers().len(),
                params = command.param_count(),
                command = command.command(),
                "parsed frame"
            );
            Ok(command)
        }
        Err(err) => {
            debug!(error = %err, len = input.len(), "rejected frame");
            Err(err)
        }
    }
}

fn parse_frame(input: &str, config: &ParseConfig) -> Result<Command> {
    let rest = input
        .strip_prefix(PREFIX)
        .ok_or(ParseError::MissingPrefix)?;
    let body = rest.strip_suffix(SUFFIX).ok_or(ParseError::MissingSuffix)?;

    let (header, section) = split_body(body)?;

    let mut command = Command::bounded(config.max_params);
    parse_header(header, config, &mut command)?;
    if let Some(section) = section {
        parse_params(section, config, &mut command)?;
    }
    command.set_max_params(None);
    Ok(command)
}

/// Split the body into the header and the interior of the parameter section.
fn split_body(body: &str) -> Result<(&str, Option<&str>)> {
    let open = body.find(PARAMS_OPEN);
    let close = body.rfind(PARAMS_CLOSE);

    match (open, close) {
        (None, None) => Ok((body, None)),
        (None, Some(_)) => Err(ParseError::MalformedBraces {
            reason: "'}' without '{'",
        }),
        (Some(_), None) => Err(ParseError::MalformedBraces {
            reason: "'{' without '}'",
        }),
        (Some(open), Some(close)) if close < open => Err(ParseError::MalformedBraces {
            reason: "'}' before '{'",
        }),
        (Some(open), Some(close)) => {
            if !body[close + 1..].trim().is_empty() {
                return Err(ParseError::MalformedBraces {
                    reason: "content after '}'",
                });
            }
            Ok((&body[..open], Some(&body[open + 1..close])))
        }
    }
}

fn parse_header(header: &str, config: &ParseConfig, command: &mut Command) -> Result<()> {
    // Tolerate `!!KIND:CMD:{...}##`.
    let header = header.strip_suffix(HEADER_SEPARATOR).unwrap_or(header);

    let mut segments: Vec<&str> = header.split(HEADER_SEPARATOR).map(str::trim).collect();
    let name = segments.pop().ok_or(ParseError::InvalidHeader {
        reason: "no segments",
    })?;
    if config.require_kind && segments.is_empty() {
        return Err(ParseError::InvalidHeader {
            reason: "expected a message kind and a command",
        });
    }
    if name.is_empty() {
        return Err(ParseError::EmptyCommand);
    }

    command.set_command(name);
    if let Some(kind) = segments.pop() {
        command.set_msg_kind(kind);
    }
    command.set_headers(segments);
    Ok(())
}

fn parse_params(section: &str, config: &ParseConfig, command: &mut Command) -> Result<()> {
    let mut rest = section;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return Ok(());
        }
        let position = section.len() - rest.len();

        let token_end = rest
            .find([KEY_VALUE_SEPARATOR, PARAM_SEPARATOR])
            .unwrap_or(rest.len());
        let (token, tail) = rest.split_at(token_end);

        if let Some(after_eq) = tail.strip_prefix(KEY_VALUE_SEPARATOR) {
            let key = token.trim();
            if key.is_empty() {
                return Err(ParseError::EmptyParamKey { position });
            }
            let (value, next) = read_value(key, after_eq)?;
            store(command, key, value, position)?;
            rest = next;
        } else {
            let flag = token.trim();
            if !flag.is_empty() {
                if config.flags == FlagPolicy::Reject {
                    return Err(ParseError::PositionalNotSupported {
                        token: flag.to_string(),
                    });
                }
                store(command, flag, "", position)?;
            }
            rest = tail.strip_prefix(PARAM_SEPARATOR).unwrap_or(tail);
        }
    }
}

/// Read one value, returning it and the input following its separator.
fn read_value<'a>(key: &str, input: &'a str) -> Result<(&'a str, &'a str)> {
    let input = input.trim_start();

    if let Some(quote) = input.chars().next().filter(|c| is_quote(*c)) {
        let inner = &input[quote.len_utf8()..];
        let close = inner
            .find(quote)
            .ok_or_else(|| ParseError::UnterminatedQuote {
                key: key.to_string(),
            })?;
        let value = &inner[..close];
        let after = inner[close + quote.len_utf8()..].trim_start();
        return match after.strip_prefix(PARAM_SEPARATOR) {
            Some(next) => Ok((value, next)),
            None if after.is_empty() => Ok((value, after)),
            None => Err(ParseError::UnexpectedAfterQuote {
                key: key.to_string(),
            }),
        };
    }

    let end = input.find(PARAM_SEPARATOR).unwrap_or(input.len());
    let next = input[end..].strip_prefix(PARAM_SEPARATOR).unwrap_or("");
    Ok((input[..end].trim_end(), next))
}

fn store(command: &mut Command, key: &str, value: &str, position: usize) -> Result<()> {
    match command.set_param(key, value) {
        Ok(_) => Ok(()),
        Err(ParamError::CapacityExceeded { max }) => Err(ParseError::TooManyParams { max }),
        Err(ParamError::EmptyKey) => Err(ParseError::EmptyParamKey { position }),
    }
}
