//! Escaped delimiter handling.
//!
//! Before substitution, every escape character that immediately precedes a
//! delimiter is folded together with that delimiter into a private-use
//! sentinel codepoint. The substitution loop never sees those delimiters, so
//! escaped placeholders survive untouched. Afterwards the sentinels are turned
//! back into bare delimiters, which drops the escape character for good.
//!
//! ```rust
//! use standout_interpolate::escape::{mark, unmark};
//! use standout_interpolate::VariablePattern;
//!
//! let pattern = VariablePattern::default();
//! let marked = mark(r"\{{literal}} and {{name}}", &pattern, "\\");
//! assert!(marked.contains("{{name}}"));
//! assert!(!marked.contains("{{literal"));
//! assert_eq!(unmark(&marked, &pattern), "{{literal}} and {{name}}");
//! ```

use crate::pattern::VariablePattern;

/// Stands in for an escaped opening delimiter.
pub const ESCAPED_OPEN: char = '\u{E000}';

/// Stands in for an escaped closing delimiter.
pub const ESCAPED_CLOSE: char = '\u{E001}';

/// Replaces `escape + open` and `escape + close` with sentinels.
///
/// Matching is literal, so delimiters and escape text may contain any
/// characters. An empty escape string disables escaping.
pub fn mark(text: &str, pattern: &VariablePattern, escape: &str) -> String {
    if escape.is_empty() {
        return text.to_string();
    }

    let escaped_open = format!("{escape}{}", pattern.open());
    let escaped_close = format!("{escape}{}", pattern.close());

    text.replace(&escaped_open, ESCAPED_OPEN.encode_utf8(&mut [0; 4]))
        .replace(&escaped_close, ESCAPED_CLOSE.encode_utf8(&mut [0; 4]))
}

/// Turns sentinels back into unescaped delimiters.
pub fn unmark(text: &str, pattern: &VariablePattern) -> String {
    if !text.contains([ESCAPED_OPEN, ESCAPED_CLOSE]) {
        return text.to_string();
    }

    text.replace(ESCAPED_OPEN, pattern.open())
        .replace(ESCAPED_CLOSE, pattern.close())
}
