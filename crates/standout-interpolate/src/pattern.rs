//! Placeholder matchers.
//!
//! A [`VariablePattern`] pairs the literal delimiter text (used by the escape
//! processor and the loop's "anything left to expand?" check) with the regex
//! that finds placeholders. The regex has exactly one job: capture the variable
//! path in its first group.
//!
//! Most callers build one from a delimiter pair:
//!
//! ```rust
//! use standout_interpolate::VariablePattern;
//!
//! let pattern = VariablePattern::new("<", ">").unwrap();
//! assert_eq!(pattern.open(), "<");
//! assert_eq!(pattern.regex().as_str(), "<([^<>]+)>");
//! ```
//!
//! Callers that need a non-literal shape can hand over a compiled regex. The
//! delimiters are then derived from the regex source on a best-effort basis:
//! the literal text before the first group is the opening delimiter, the
//! literal text after the last group is the closing one, and either side falls
//! back to the default `{{` / `}}` when nothing usable is found. Classes,
//! quantifiers and other regex syntax never end up in a delimiter.

use std::iter::Peekable;
use std::str::Chars;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::error::{InterpolateError, Result};

/// Default opening delimiter.
pub const DEFAULT_OPEN: &str = "{{";

/// Default closing delimiter.
pub const DEFAULT_CLOSE: &str = "}}";

static DEFAULT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^\{\}]+)\}\}").expect("default variable pattern is valid"));

/// A placeholder matcher plus the delimiter text it is bounded by.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "PatternSpec")]
pub struct VariablePattern {
    open: String,
    close: String,
    regex: Regex,
}

impl VariablePattern {
    /// Builds a matcher from a literal delimiter pair.
    ///
    /// The path may contain any character except those that appear in either
    /// delimiter, so `{{`/`}}` yields `\{\{([^\{\}]+)\}\}`.
    pub fn new(open: &str, close: &str) -> Result<Self> {
        if open.is_empty() || close.is_empty() {
            return Err(InterpolateError::InvalidPattern {
                pattern: format!("{open}…{close}"),
                reason: "delimiters must not be empty".to_string(),
            });
        }

        let mut seen = Vec::new();
        let mut excluded = String::new();
        for ch in open.chars().chain(close.chars()) {
            if !seen.contains(&ch) {
                seen.push(ch);
                excluded.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4])));
            }
        }

        let source = format!(
            "{}([^{}]+){}",
            regex::escape(open),
            excluded,
            regex::escape(close)
        );

        Ok(Self {
            open: open.to_string(),
            close: close.to_string(),
            regex: Regex::new(&source)?,
        })
    }

    /// Wraps a compiled regex, deriving the delimiters from its source.
    ///
    /// The regex must have at least one capturing group; the first group is
    /// taken as the variable path.
    pub fn from_regex(regex: Regex) -> Result<Self> {
        let source = regex.as_str().to_string();
        Self::with_derived_delimiters(regex, &source)
    }

    /// Compiles a pattern written either as a bare regex or in slash-delimited
    /// literal form with trailing flags, e.g. `/<([^<>]+)>/g`.
    ///
    /// The `i`, `m` and `s` flags map onto the equivalent inline regex flags.
    /// Every other flag (`g`, `u`, `y`) is accepted and ignored: matching is
    /// always global.
    pub fn parse(source: &str) -> Result<Self> {
        let (body, flags) = split_literal(source);

        let inline: String = flags.chars().filter(|f| matches!(f, 'i' | 'm' | 's')).collect();
        let compiled = if inline.is_empty() {
            Regex::new(body)?
        } else {
            Regex::new(&format!("(?{inline}){body}"))?
        };

        Self::with_derived_delimiters(compiled, body)
    }

    fn with_derived_delimiters(regex: Regex, source: &str) -> Result<Self> {
        if regex.captures_len() < 2 {
            return Err(InterpolateError::InvalidPattern {
                pattern: regex.as_str().to_string(),
                reason: "pattern needs a capturing group for the variable path".to_string(),
            });
        }

        let (open, close) = derive_delimiters(source);
        Ok(Self { open, close, regex })
    }

    /// The opening delimiter text.
    pub fn open(&self) -> &str {
        &self.open
    }

    /// The closing delimiter text.
    pub fn close(&self) -> &str {
        &self.close
    }

    /// The compiled placeholder matcher.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl Default for VariablePattern {
    fn default() -> Self {
        Self {
            open: DEFAULT_OPEN.to_string(),
            close: DEFAULT_CLOSE.to_string(),
            regex: DEFAULT_REGEX.clone(),
        }
    }
}

impl PartialEq for VariablePattern {
    fn eq(&self, other: &Self) -> bool {
        self.open == other.open
            && self.close == other.close
            && self.regex.as_str() == other.regex.as_str()
    }
}

/// Serialized forms of a pattern: a regex source or an explicit pair.
#[derive(Deserialize)]
#[serde(untagged)]
enum PatternSpec {
    Source(String),
    Delimiters { open: String, close: String },
}

impl TryFrom<PatternSpec> for VariablePattern {
    type Error = InterpolateError;

    fn try_from(spec: PatternSpec) -> Result<Self> {
        match spec {
            PatternSpec::Source(source) => VariablePattern::parse(&source),
            PatternSpec::Delimiters { open, close } => VariablePattern::new(&open, &close),
        }
    }
}

/// Splits `/body/flags` into its parts. Anything else is all body.
fn split_literal(source: &str) -> (&str, &str) {
    if let Some(rest) = source.strip_prefix('/') {
        if let Some(end) = rest.rfind('/') {
            let flags = &rest[end + 1..];
            if flags.chars().all(|c| c.is_ascii_alphabetic()) {
                return (&rest[..end], flags);
            }
        }
    }
    (source, "")
}

/// One unit of regex syntax, as far as delimiter derivation cares.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Atom {
    Literal(char),
    GroupOpen,
    GroupClose,
    /// Zero-width assertions: `^`, `$`, `\b`, `\B`, `\A`, `\z`.
    Anchor,
    /// `*`, `?` or a counted repetition; the preceding atom may be absent.
    Optional,
    /// `+`; the preceding atom occurs at least once.
    Repeat,
    /// Classes, `.` and alternation; matches text that cannot be named.
    Class,
}

fn next_atom(chars: &mut Peekable<Chars<'_>>) -> Option<Atom> {
    let atom = match chars.next()? {
        '\\' => match chars.next()? {
            'b' | 'B' | 'A' | 'z' => Atom::Anchor,
            'n' => Atom::Literal('\n'),
            't' => Atom::Literal('\t'),
            'r' => Atom::Literal('\r'),
            kind @ ('x' | 'u' | 'U' | 'p' | 'P') => {
                skip_escape_argument(chars, kind);
                Atom::Class
            }
            other if other.is_ascii_alphanumeric() => Atom::Class,
            other => Atom::Literal(other),
        },
        '(' => Atom::GroupOpen,
        ')' => Atom::GroupClose,
        '^' | '$' => Atom::Anchor,
        '*' | '?' => Atom::Optional,
        '+' => Atom::Repeat,
        '{' => {
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
            }
            Atom::Optional
        }
        '[' => {
            skip_class(chars);
            Atom::Class
        }
        '.' | '|' => Atom::Class,
        other => Atom::Literal(other),
    };
    Some(atom)
}

fn skip_escape_argument(chars: &mut Peekable<Chars<'_>>, kind: char) {
    if chars.peek() == Some(&'{') {
        for ch in chars.by_ref() {
            if ch == '}' {
                break;
            }
        }
        return;
    }
    let width = match kind {
        'x' => 2,
        'u' => 4,
        'U' => 8,
        _ => 1,
    };
    for _ in 0..width {
        chars.next();
    }
}

// Consumes a bracketed class, including nested classes and a leading `]`.
fn skip_class(chars: &mut Peekable<Chars<'_>>) {
    chars.next_if_eq(&'^');
    chars.next_if_eq(&']');
    let mut depth = 1;
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
    }
}

/// The opening delimiter is the run of literal text before the first group,
/// cut at the first atom that is not a fixed character. The closing delimiter
/// is the run of literal text ending the pattern after the last group. A side
/// with no literal text falls back to the default.
fn derive_delimiters(source: &str) -> (String, String) {
    let mut open = String::new();
    let mut open_done = false;
    let mut open_cut = false;
    let mut close = String::new();
    let mut saw_group_end = false;

    let mut chars = source.chars().peekable();
    while let Some(atom) = next_atom(&mut chars) {
        if !open_done {
            match atom {
                Atom::GroupOpen => open_done = true,
                _ if open_cut => {}
                Atom::Literal(ch) => open.push(ch),
                Atom::Anchor | Atom::Repeat => {}
                Atom::Optional => {
                    open.pop();
                    open_cut = true;
                }
                Atom::GroupClose | Atom::Class => open_cut = true,
            }
            continue;
        }

        match atom {
            Atom::GroupOpen => {
                close.clear();
                saw_group_end = false;
            }
            Atom::GroupClose => {
                close.clear();
                saw_group_end = true;
            }
            Atom::Literal(ch) if saw_group_end => close.push(ch),
            Atom::Optional | Atom::Class => close.clear(),
            Atom::Literal(_) | Atom::Anchor | Atom::Repeat => {}
        }
    }

    if !open_done || open.is_empty() {
        open = DEFAULT_OPEN.to_string();
    }
    if !saw_group_end || close.is_empty() {
        close = DEFAULT_CLOSE.to_string();
    }
    (open, close)
}
