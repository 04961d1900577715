//! Compilation options.
//!
//! [`Options`] is built fluently and read once per call:
//!
//! ```rust
//! use standout_interpolate::Options;
//!
//! let options = Options::new()
//!     .strict(true)
//!     .max_variable_depth(5)
//!     .string_transform(|s| s.trim().to_string());
//! ```
//!
//! The plain settings (everything except the resolver and the string
//! transform) can also be loaded from a configuration document with
//! camelCase keys:
//!
//! ```rust
//! use standout_interpolate::Options;
//!
//! let options = Options::from_json_str(r#"{
//!     "preserveUndefined": true,
//!     "variablePattern": {"open": "<%", "close": "%>"},
//!     "escapeCharacter": "!"
//! }"#).unwrap();
//! ```

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{BoxError, Result};
use crate::pattern::VariablePattern;
use crate::resolve::{ResolveFn, Resolver};

/// Type-erased string transform as stored in [`Options`].
pub(crate) type TransformFn = dyn Fn(String) -> Transformed + Send + Sync;

type Resolved = std::result::Result<Option<Value>, BoxError>;
type Transformed = std::result::Result<String, BoxError>;

/// Default cap on substitution passes.
pub const DEFAULT_MAX_VARIABLE_DEPTH: usize = 10;

/// Default escape character.
pub const DEFAULT_ESCAPE: &str = "\\";

/// Options controlling a template compilation.
///
/// | option | default |
/// |--------|---------|
/// | `strict` | `false` |
/// | `preserve_undefined` | `false` |
/// | `auto_stringify_objects` | `true` |
/// | `parse_strings` | `true` |
/// | `parse_big_ints` | `false` |
/// | `max_variable_depth` | `10` |
/// | `variable_pattern` | `{{` / `}}` |
/// | `escape_character` | `\` |
/// | resolver | none |
/// | string transform | identity |
///
/// Note on `max_variable_depth`: despite the name it does not limit how many
/// segments a path may have. It caps the number of substitution passes over a
/// string, and the pass number is what the resolver compares against it. A
/// value of `1` therefore leaves every placeholder unresolved.
#[derive(Clone, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    pub(crate) strict: bool,
    pub(crate) preserve_undefined: bool,
    pub(crate) auto_stringify_objects: bool,
    pub(crate) parse_strings: bool,
    #[serde(alias = "parseBinInts")]
    pub(crate) parse_big_ints: bool,
    pub(crate) max_variable_depth: usize,
    pub(crate) variable_pattern: VariablePattern,
    pub(crate) escape_character: String,
    #[serde(skip)]
    pub(crate) resolver: Option<Arc<ResolveFn>>,
    #[serde(skip)]
    pub(crate) string_transform: Option<Arc<TransformFn>>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            strict: false,
            preserve_undefined: false,
            auto_stringify_objects: true,
            parse_strings: true,
            parse_big_ints: false,
            max_variable_depth: DEFAULT_MAX_VARIABLE_DEPTH,
            variable_pattern: VariablePattern::default(),
            escape_character: DEFAULT_ESCAPE.to_string(),
            resolver: None,
            string_transform: None,
        }
    }
}

impl Options {
    /// Creates options with every setting at its default.
    pub fn new() -> Self {
        Options::default()
    }

    /// Loads settings from a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Loads settings from a YAML document.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    // ========================================================================
    // Flags
    // ========================================================================

    /// Fail on the first unresolved path instead of substituting.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Keep unresolved placeholders verbatim instead of emptying them.
    ///
    /// Has no effect in strict mode.
    pub fn preserve_undefined(mut self, preserve: bool) -> Self {
        self.preserve_undefined = preserve;
        self
    }

    /// Substitute object and array values as JSON text without treating them
    /// as progress for the substitution loop.
    ///
    /// When off, composite values are still written as JSON text but count as
    /// a change, so placeholders inside them are expanded on the next pass.
    pub fn auto_stringify_objects(mut self, enabled: bool) -> Self {
        self.auto_stringify_objects = enabled;
        self
    }

    /// Reparse each fully substituted string as JSON.
    pub fn parse_strings(mut self, enabled: bool) -> Self {
        self.parse_strings = enabled;
        self
    }

    /// Accept reparsed numbers outside the safe-integer range.
    pub fn parse_big_ints(mut self, enabled: bool) -> Self {
        self.parse_big_ints = enabled;
        self
    }

    /// Cap on substitution passes per string.
    pub fn max_variable_depth(mut self, depth: usize) -> Self {
        self.max_variable_depth = depth;
        self
    }

    // ========================================================================
    // Syntax
    // ========================================================================

    /// Placeholder matcher and delimiters.
    pub fn variable_pattern(mut self, pattern: VariablePattern) -> Self {
        self.variable_pattern = pattern;
        self
    }

    /// Text that, placed directly before a delimiter, keeps it literal.
    ///
    /// An empty string disables escaping.
    pub fn escape_character(mut self, escape: impl Into<String>) -> Self {
        self.escape_character = escape.into();
        self
    }

    // ========================================================================
    // Hooks
    // ========================================================================

    /// Consults `resolver` before the variables tree.
    pub fn resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        self.resolver = Some(Arc::new(move |path: &str| -> Resolved {
            Ok(resolver(path))
        }));
        self
    }

    /// Like [`resolver`](Self::resolver), for resolvers that can fail.
    ///
    /// An error aborts the call as [`InterpolateError::Resolver`](crate::InterpolateError::Resolver).
    pub fn try_resolver<F, E>(mut self, resolver: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<Option<Value>, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.resolver = Some(Arc::new(move |path: &str| -> Resolved {
            resolver(path).map_err(Into::into)
        }));
        self
    }

    /// Registers a [`Resolver`] implementation.
    pub fn with_resolver<R>(mut self, resolver: R) -> Self
    where
        R: Resolver + 'static,
    {
        self.resolver = Some(Arc::new(move |path: &str| -> Resolved {
            resolver.resolve(path)
        }));
        self
    }

    /// Applies `transform` to each substituted string before coercion.
    pub fn string_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.string_transform = Some(Arc::new(move |s: String| -> Transformed {
            Ok(transform(&s))
        }));
        self
    }

    /// Like [`string_transform`](Self::string_transform), for transforms that can fail.
    pub fn try_string_transform<F, E>(mut self, transform: F) -> Self
    where
        F: Fn(String) -> std::result::Result<String, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.string_transform = Some(Arc::new(move |s: String| -> Transformed {
            transform(s).map_err(Into::into)
        }));
        self
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("strict", &self.strict)
            .field("preserve_undefined", &self.preserve_undefined)
            .field("auto_stringify_objects", &self.auto_stringify_objects)
            .field("parse_strings", &self.parse_strings)
            .field("parse_big_ints", &self.parse_big_ints)
            .field("max_variable_depth", &self.max_variable_depth)
            .field("variable_pattern", &self.variable_pattern)
            .field("escape_character", &self.escape_character)
            .field("resolver", &self.resolver.is_some())
            .field("string_transform", &self.string_transform.is_some())
            .finish()
    }
}
