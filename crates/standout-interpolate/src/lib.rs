//! Interpolate - placeholder substitution over strings and JSON value trees.
//!
//! Interpolate renders a template (a string, or any nesting of arrays and
//! objects holding strings) against a tree of variables. It supports:
//!
//! - Dot-path variables: `{{user.profile.name}}`, `{{items[0]}}`
//! - Values that contain placeholders of their own, expanded until nothing
//!   changes or a pass cap is reached
//! - Escaped delimiters: `\{{literal}}`
//! - Custom delimiters, escape characters and resolvers
//! - Coercion of the rendered string back into JSON when it looks like JSON
//!
//! It is deliberately not a template language: placeholders hold variable
//! paths only, with no conditionals, loops, filters or expressions.
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use standout_interpolate::{compile_template, Options};
//!
//! let variables = json!({"user": {"name": "John"}, "count": 3});
//!
//! let out = compile_template(&json!("Hello {{user.name}}"), &variables, &Options::default()).unwrap();
//! assert_eq!(out, json!("Hello John"));
//!
//! // A string that renders to JSON comes back as structured data
//! let out = compile_template(&json!("{{count}}"), &variables, &Options::default()).unwrap();
//! assert_eq!(out, json!(3));
//! ```
//!
//! # Missing Variables
//!
//! | mode | `Hello {{name}}` with no `name` |
//! |------|------|
//! | default | `"Hello "` |
//! | `preserve_undefined(true)` | `"Hello {{name}}"` |
//! | `strict(true)` | error `Missing variable: name` |
//!
//! # Pass Cap
//!
//! `max_variable_depth` bounds the number of substitution passes over each
//! string; it does not bound how deep a dot path may reach. Resolution is
//! refused once the pass number reaches the cap, so with the default of 10 at
//! most nine passes resolve anything. This is the only protection against a
//! variable (or resolver) that keeps producing new placeholders.
//!
//! # Coercion
//!
//! With `parse_strings` on (the default), each rendered string is parsed as
//! JSON. Numbers are only accepted when they are safe integers, unless
//! `parse_big_ints` is set. Independently, any string whose trimmed text is
//! bracketed like an object or array is parsed. Both parses refuse documents
//! with prototype-reaching keys (`__proto__`, `constructor.prototype`) and
//! leave the string as it was.

pub mod coerce;
mod engine;
mod error;
pub mod escape;
mod options;
mod pattern;
mod resolve;
mod substitute;

// Re-export public API
pub use engine::{compile_template, Interpolator};
pub use error::{BoxError, InterpolateError, JsonError, Result};
pub use options::{Options, DEFAULT_ESCAPE, DEFAULT_MAX_VARIABLE_DEPTH};
pub use pattern::{VariablePattern, DEFAULT_CLOSE, DEFAULT_OPEN};
pub use resolve::{lookup, Resolver};
