//! Literal delimiters of the frame grammar.
//!
//! ```text
//! frame  = "!!" header [ "{" params "}" ] "##"
//! header = segment *( ":" segment )
//! params = [ param *( "," param ) ]
//! param  = key [ "=" value ]
//! ```

/// Opens every frame.
pub const PREFIX: &str = "!!";

/// Closes every frame.
pub const SUFFIX: &str = "##";

/// Opens the parameter section.
pub const PARAMS_OPEN: char = '{';

/// Closes the parameter section.
pub const PARAMS_CLOSE: char = '}';

/// Separates header segments.
pub const HEADER_SEPARATOR: char = ':';

/// Separates parameters.
pub const PARAM_SEPARATOR: char = ',';

/// Separates a parameter key from its value.
pub const KEY_VALUE_SEPARATOR: char = '=';

/// Characters that may open a quoted value.
pub const QUOTES: [char; 2] = ['"', '\''];

/// Returns true if `c` opens a quoted value.
pub fn is_quote(c: char) -> bool {
    QUOTES.contains(&c)
}

/// Returns true if `token` can be written as a header, kind or command
/// segment and read back unchanged.
pub fn is_valid_segment(token: &str) -> bool {
    token.trim() == token
        && !token.contains([HEADER_SEPARATOR, PARAMS_OPEN, PARAMS_CLOSE])
}

/// Returns true if `key` can be written as a parameter key and read back
/// unchanged.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.trim() == key
        && !key.contains([
            KEY_VALUE_SEPARATOR,
            PARAM_SEPARATOR,
            PARAMS_OPEN,
            PARAMS_CLOSE,
        ])
}

/// Returns true if `value` has to be quoted to survive a round trip.
pub fn needs_quoting(value: &str) -> bool {
    value.trim() != value
        || value.contains(PARAM_SEPARATOR)
        || value.starts_with(QUOTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_with_delimiters_are_invalid() {
        assert!(is_valid_segment("ARM#1"));
        assert!(is_valid_segment(""));
        assert!(!is_valid_segment("A:B"));
        assert!(!is_valid_segment("A{"));
        assert!(!is_valid_segment(" A"));
    }

    #[test]
    fn keys_must_be_non_empty_and_trimmed() {
        assert!(is_valid_key("speed"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("a=b"));
        assert!(!is_valid_key("a,b"));
        assert!(!is_valid_key("key "));
    }

    #[test]
    fn quoting_rules() {
        assert!(!needs_quoting("red"));
        assert!(!needs_quoting(""));
        assert!(!needs_quoting("a=b"));
        assert!(needs_quoting("a,b"));
        assert!(needs_quoting(" padded"));
        assert!(needs_quoting("'leading"));
        assert!(!needs_quoting("it's"));
    }
}
