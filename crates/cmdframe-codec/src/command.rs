use std::collections::BTreeMap;
use std::fmt;

use crate::error::{BuildError, ParamError};
use crate::grammar::{
    is_valid_key, is_valid_segment, needs_quoting, HEADER_SEPARATOR, KEY_VALUE_SEPARATOR,
    PARAMS_CLOSE, PARAMS_OPEN, PARAM_SEPARATOR, PREFIX, SUFFIX,
};

/// A decoded command frame.
///
/// Parameters are kept sorted by key, so serialization emits them in
/// ascending key order regardless of insertion order.
#[derive(Debug, Clone, Default)]
pub struct Command {
    headers: Vec<String>,
    msg_kind: Option<String>,
    command: String,
    params: BTreeMap<String, String>,
    max_params: Option<usize>,
}

impl Command {
    /// Create an empty, unbounded command.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty command that holds at most `max` distinct parameters.
    pub fn with_max_params(max: usize) -> Self {
        Self::bounded(Some(max))
    }

    pub(crate) fn bounded(max_params: Option<usize>) -> Self {
        Self {
            max_params,
            ..Self::default()
        }
    }

    /// Builder-style: append a routing header.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.headers.push(header.into());
        self
    }

    /// Builder-style: set the message kind.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.msg_kind = Some(kind.into());
        self
    }

    /// Builder-style: set the command name.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Builder-style: set a parameter.
    pub fn with_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ParamError> {
        self.set_param(key, value)?;
        Ok(self)
    }

    /// Routing headers, in frame order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Append a routing header.
    pub fn push_header(&mut self, header: impl Into<String>) {
        self.headers.push(header.into());
    }

    /// Replace all routing headers.
    pub fn set_headers<I, S>(&mut self, headers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = headers.into_iter().map(Into::into).collect();
    }

    /// The message kind, if one is set. `Some("")` is a present but empty kind.
    pub fn msg_kind(&self) -> Option<&str> {
        self.msg_kind.as_deref()
    }

    pub fn set_msg_kind(&mut self, kind: impl Into<String>) {
        self.msg_kind = Some(kind.into());
    }

    pub fn clear_msg_kind(&mut self) {
        self.msg_kind = None;
    }

    /// The command name. Empty only for a command that was never populated.
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn set_command(&mut self, command: impl Into<String>) {
        self.command = command.into();
    }

    /// Set a parameter, returning the value it replaced.
    ///
    /// Overwriting an existing key never counts against the capacity bound.
    pub fn set_param(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>, ParamError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ParamError::EmptyKey);
        }
        if let Some(max) = self.max_params {
            if self.params.len() >= max && !self.params.contains_key(&key) {
                return Err(ParamError::CapacityExceeded { max });
            }
        }
        Ok(self.params.insert(key, value.into()))
    }

    /// The value of a parameter. Flags decode to `Some("")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The value of a parameter, or `default` when it is absent.
    pub fn param_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.param(key).unwrap_or(default)
    }

    pub fn has_param(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn remove_param(&mut self, key: &str) -> Option<String> {
        self.params.remove(key)
    }

    /// Parameters in ascending key order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Capacity bound on distinct parameters, if any.
    pub fn max_params(&self) -> Option<usize> {
        self.max_params
    }

    /// Change the capacity bound. Parameters already held are kept even if
    /// they exceed the new bound; only new keys are refused.
    pub fn set_max_params(&mut self, max: Option<usize>) {
        self.max_params = max;
    }

    /// Reset to the empty state. The capacity bound is kept.
    pub fn clear(&mut self) {
        self.headers.clear();
        self.msg_kind = None;
        self.command.clear();
        self.params.clear();
    }

    /// Check that the frame produced by [`Display`] parses back to `self`.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.command.is_empty() {
            return Err(BuildError::EmptyCommand);
        }
        if !self.headers.is_empty() && self.msg_kind.is_none() {
            return Err(BuildError::HeadersWithoutKind);
        }

        let segments = self
            .headers
            .iter()
            .map(|h| ("header", h))
            .chain(self.msg_kind.iter().map(|k| ("kind", k)))
            .chain(std::iter::once(("command", &self.command)));
        for (field, token) in segments {
            if !is_valid_segment(token) {
                return Err(BuildError::InvalidToken {
                    field,
                    token: token.clone(),
                });
            }
        }

        for (key, value) in &self.params {
            if !is_valid_key(key) {
                return Err(BuildError::InvalidParamKey { key: key.clone() });
            }
            if needs_quoting(value) && value.contains('"') && value.contains('\'') {
                return Err(BuildError::UnquotableValue { key: key.clone() });
            }
        }
        Ok(())
    }

    /// Serialize into a frame, failing if it would not parse back to `self`.
    pub fn build(&self) -> Result<String, BuildError> {
        self.validate()?;
        Ok(self.to_string())
    }
}

/// Equality over headers, kind, command and parameters. The capacity bound
/// is not part of a command's identity.
impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        self.headers == other.headers
            && self.msg_kind == other.msg_kind
            && self.command == other.command
            && self.params == other.params
    }
}

impl Eq for Command {}

/// Writes the frame without validation; see [`Command::build`].
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(PREFIX)?;
        for header in &self.headers {
            write!(f, "{header}{HEADER_SEPARATOR}")?;
        }
        if let Some(kind) = &self.msg_kind {
            write!(f, "{kind}{HEADER_SEPARATOR}")?;
        }
        f.write_str(&self.command)?;

        if !self.params.is_empty() {
            write!(f, "{PARAMS_OPEN}")?;
            for (i, (key, value)) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, "{PARAM_SEPARATOR}")?;
                }
                write!(f, "{key}{KEY_VALUE_SEPARATOR}")?;
                write_value(f, value)?;
            }
            write!(f, "{PARAMS_CLOSE}")?;
        }
        f.write_str(SUFFIX)
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    if !needs_quoting(value) {
        return f.write_str(value);
    }
    let quote = if value.contains('"') { '\'' } else { '"' };
    write!(f, "{quote}{value}{quote}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send_star() -> Command {
        Command::new()
            .with_kind("CONFIRM")
            .with_command("SEND_STAR")
            .with_param("speed", "3")
            .unwrap()
            .with_param("color", "red")
            .unwrap()
    }

    #[test]
    fn build_without_params_omits_braces() {
        let cmd = Command::new().with_kind("CONFIRM").with_command("MAKE_STAR");
        assert_eq!(cmd.build().unwrap(), "!!CONFIRM:MAKE_STAR##");
    }

    #[test]
    fn build_orders_params_by_key() {
        assert_eq!(
            send_star().build().unwrap(),
            "!!CONFIRM:SEND_STAR{color=red,speed=3}##"
        );
    }

    #[test]
    fn build_writes_headers_before_kind() {
        let cmd = send_star().with_header("MASTER").with_header("ARM#1");
        let frame = cmd.build().unwrap();
        assert!(frame.starts_with("!!MASTER:ARM#1:CONFIRM:SEND_STAR{"));
    }

    #[test]
    fn bare_command_has_no_separator() {
        let cmd = Command::new().with_command("PING");
        assert_eq!(cmd.build().unwrap(), "!!PING##");
    }

    #[test]
    fn empty_kind_is_written() {
        let cmd = Command::new().with_kind("").with_command("PING");
        assert_eq!(cmd.build().unwrap(), "!!:PING##");
    }

    #[test]
    fn empty_value_is_written_with_separator() {
        let cmd = Command::new()
            .with_command("RAISE")
            .with_param("flag", "")
            .unwrap();
        assert_eq!(cmd.build().unwrap(), "!!RAISE{flag=}##");
    }

    #[test]
    fn values_needing_quotes_are_quoted() {
        let cmd = Command::new()
            .with_command("SAY")
            .with_param("text", "a,b")
            .unwrap()
            .with_param("quote", "say \"hi\", bye")
            .unwrap()
            .with_param("pad", " x ")
            .unwrap();
        assert_eq!(
            cmd.build().unwrap(),
            "!!SAY{pad=\" x \",quote='say \"hi\", bye',text=\"a,b\"}##"
        );
    }

    #[test]
    fn build_rejects_empty_command() {
        let cmd = Command::new().with_kind("REQUEST");
        assert_eq!(cmd.build(), Err(BuildError::EmptyCommand));
    }

    #[test]
    fn build_rejects_headers_without_kind() {
        let cmd = Command::new().with_header("SRC").with_command("GO");
        assert_eq!(cmd.build(), Err(BuildError::HeadersWithoutKind));
    }

    #[test]
    fn build_rejects_delimiters_in_tokens() {
        let cmd = Command::new().with_kind("A:B").with_command("GO");
        assert!(matches!(
            cmd.build(),
            Err(BuildError::InvalidToken { field: "kind", .. })
        ));

        let cmd = Command::new().with_command(" GO");
        assert!(matches!(
            cmd.build(),
            Err(BuildError::InvalidToken { field: "command", .. })
        ));

        let cmd = Command::new().with_command("GO").with_param("a=b", "1").unwrap();
        assert!(matches!(cmd.build(), Err(BuildError::InvalidParamKey { .. })));
    }

    #[test]
    fn build_rejects_unquotable_value() {
        let cmd = Command::new()
            .with_command("SAY")
            .with_param("text", "'both\" quotes")
            .unwrap();
        assert!(matches!(cmd.build(), Err(BuildError::UnquotableValue { .. })));
    }

    #[test]
    fn set_param_last_write_wins() {
        let mut cmd = Command::new().with_command("START");
        assert_eq!(cmd.set_param("foo", "first").unwrap(), None);
        assert_eq!(
            cmd.set_param("foo", "second").unwrap().as_deref(),
            Some("first")
        );
        assert_eq!(cmd.param("foo"), Some("second"));
        assert_eq!(cmd.param_count(), 1);
    }

    #[test]
    fn set_param_rejects_empty_key() {
        let mut cmd = Command::new();
        assert_eq!(cmd.set_param("", "x"), Err(ParamError::EmptyKey));
    }

    #[test]
    fn bounded_command_fails_closed() {
        let mut cmd = Command::with_max_params(2);
        cmd.set_param("a", "1").unwrap();
        cmd.set_param("b", "2").unwrap();
        assert_eq!(
            cmd.set_param("c", "3"),
            Err(ParamError::CapacityExceeded { max: 2 })
        );
        assert!(!cmd.has_param("c"));

        // Overwrites are not new entries.
        cmd.set_param("a", "10").unwrap();
        assert_eq!(cmd.param("a"), Some("10"));
    }

    #[test]
    fn clear_resets_every_field() {
        let mut cmd = Command::with_max_params(4)
            .with_header("INIT")
            .with_kind("SETUP")
            .with_command("START")
            .with_param("foo", "bar")
            .unwrap();

        cmd.clear();
        assert!(cmd.headers().is_empty());
        assert_eq!(cmd.msg_kind(), None);
        assert_eq!(cmd.command(), "");
        assert_eq!(cmd.param_or("foo", "default"), "default");
        assert_eq!(cmd.param_count(), 0);
        assert_eq!(cmd.max_params(), Some(4));

        let once = cmd.clone();
        cmd.clear();
        assert_eq!(cmd, once);
        assert_eq!(cmd, Command::new());
    }

    #[test]
    fn clear_msg_kind_drops_kind_separator() {
        let mut cmd = Command::new().with_kind("REQUEST").with_command("CMD");
        assert_eq!(cmd.build().unwrap(), "!!REQUEST:CMD##");

        cmd.clear_msg_kind();
        assert_eq!(cmd.msg_kind(), None);
        assert_eq!(cmd.build().unwrap(), "!!CMD##");
    }

    #[test]
    fn lowering_capacity_keeps_existing_params() {
        let mut cmd = Command::new()
            .with_param("a", "1")
            .unwrap()
            .with_param("b", "2")
            .unwrap();
        cmd.set_max_params(Some(1));
        assert_eq!(cmd.param_count(), 2);
        assert_eq!(
            cmd.set_param("c", "3"),
            Err(ParamError::CapacityExceeded { max: 1 })
        );
        cmd.set_param("a", "10").unwrap();
    }

    #[test]
    fn equality_ignores_capacity_bound() {
        let bounded = Command::with_max_params(1).with_command("X");
        let unbounded = Command::new().with_command("X");
        assert_eq!(bounded, unbounded);
    }

    #[test]
    fn remove_param_returns_old_value() {
        let mut cmd = send_star();
        assert_eq!(cmd.remove_param("color").as_deref(), Some("red"));
        assert!(!cmd.has_param("color"));
        assert_eq!(cmd.remove_param("color"), None);
    }
}
