/// Errors that can occur while parsing a frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The frame does not start with `!!`.
    #[error("missing prefix '!!'")]
    MissingPrefix,

    /// The frame does not end with `##`.
    #[error("missing suffix '##'")]
    MissingSuffix,

    /// The parameter braces do not pair up.
    #[error("malformed braces: {reason}")]
    MalformedBraces { reason: &'static str },

    /// The header has fewer segments than the configured grammar requires.
    #[error("invalid header: {reason}")]
    InvalidHeader { reason: &'static str },

    /// The command segment of the header is empty.
    #[error("invalid header: empty command")]
    EmptyCommand,

    /// A parameter has `=` with nothing before it.
    #[error("empty param key at offset {position}")]
    EmptyParamKey { position: usize },

    /// A bare token was found while flags are rejected.
    #[error("positional params not supported; expected key=value, got '{token}'")]
    PositionalNotSupported { token: String },

    /// A quoted value has no closing quote.
    #[error("unterminated quoted value for param '{key}'")]
    UnterminatedQuote { key: String },

    /// Something other than whitespace follows a closing quote.
    #[error("unexpected characters after quoted value for param '{key}'")]
    UnexpectedAfterQuote { key: String },

    /// The frame carries more distinct parameters than allowed.
    #[error("too many params (max {max})")]
    TooManyParams { max: usize },

    /// Raw input is not valid UTF-8.
    #[error("frame is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Reasons a [`Command`](crate::Command) cannot be serialized into a frame
/// that parses back to the same command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The command name is empty.
    #[error("command name is empty")]
    EmptyCommand,

    /// Headers are set without a message kind; the last header would be read
    /// back as the kind.
    #[error("headers require a message kind")]
    HeadersWithoutKind,

    /// A header, kind or command token contains a delimiter or surrounding
    /// whitespace.
    #[error("invalid {field} token '{token}'")]
    InvalidToken { field: &'static str, token: String },

    /// A parameter key contains a delimiter or surrounding whitespace.
    #[error("invalid param key '{key}'")]
    InvalidParamKey { key: String },

    /// The value would need quoting but contains both quote characters.
    #[error("value of param '{key}' cannot be quoted")]
    UnquotableValue { key: String },
}

/// Errors returned when setting a parameter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    /// Parameter keys must not be empty.
    #[error("param key is empty")]
    EmptyKey,

    /// The command is bounded and already holds `max` parameters.
    #[error("param capacity exceeded (max {max})")]
    CapacityExceeded { max: usize },
}

pub type Result<T> = std::result::Result<T, ParseError>;
