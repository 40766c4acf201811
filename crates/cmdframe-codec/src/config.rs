/// How the parser treats a parameter token without `=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagPolicy {
    /// `{flag}` decodes to `flag = ""`.
    #[default]
    Allow,
    /// Bare tokens fail with `ParseError::PositionalNotSupported`.
    Reject,
}

/// Controls parsing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    /// Treatment of bare parameter tokens. Default: allow.
    pub flags: FlagPolicy,
    /// When true, a header must carry at least a kind and a command.
    pub require_kind: bool,
    /// Maximum number of distinct parameters per frame. Default: unbounded.
    pub max_params: Option<usize>,
}

impl ParseConfig {
    /// `key=value` parameters only, and a mandatory message kind.
    pub fn strict() -> Self {
        Self {
            flags: FlagPolicy::Reject,
            require_kind: true,
            ..Self::default()
        }
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            flags: FlagPolicy::Allow,
            require_kind: false,
            max_params: None,
        }
    }
}
