//! Template compilation over value trees.
//!
//! Strings are the only leaves that get substituted. Each one goes through:
//!
//! ```text
//! mark escapes → substitution loop → unmark escapes → string transform
//!     → coerce (parse_strings) → reparse bracketed JSON
//! ```
//!
//! Arrays are processed element by element and objects value by value (keys
//! are left alone). Numbers, booleans and null pass through unchanged.

use serde_json::{Map, Value};

use crate::coerce::{coerce, reparse_composite};
use crate::error::{InterpolateError, Result};
use crate::escape::{mark, unmark};
use crate::options::Options;
use crate::resolve::VariableResolver;
use crate::substitute::substitute;

/// Compiles `template` against `variables`.
///
/// The call is a pure function of its arguments apart from whatever the
/// configured resolver and string transform do. In strict mode the first
/// unresolved path aborts the whole call; no partial output is produced.
///
/// ```rust
/// use serde_json::json;
/// use standout_interpolate::{compile_template, Options};
///
/// let template = json!({"greeting": "Hello {{user.name}}", "tags": ["{{tag}}", 3]});
/// let variables = json!({"user": {"name": "Ada"}, "tag": "admin"});
///
/// let out = compile_template(&template, &variables, &Options::default()).unwrap();
/// assert_eq!(out, json!({"greeting": "Hello Ada", "tags": ["admin", 3]}));
/// ```
pub fn compile_template(template: &Value, variables: &Value, options: &Options) -> Result<Value> {
    Compilation::new(variables, options).process(template)
}

/// A reusable handle owning its [`Options`].
///
/// Holds no state between calls; every compile starts fresh.
///
/// ```rust
/// use serde_json::json;
/// use standout_interpolate::{Interpolator, Options};
///
/// let interpolator = Interpolator::new(Options::new().preserve_undefined(true));
/// let out = interpolator.compile_str("{{known}} {{unknown}}", &json!({"known": "yes"})).unwrap();
/// assert_eq!(out, json!("yes {{unknown}}"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Interpolator {
    options: Options,
}

impl Interpolator {
    /// Creates an interpolator with the given options.
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// The options every compile uses.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Compiles a template value.
    pub fn compile(&self, template: &Value, variables: &Value) -> Result<Value> {
        compile_template(template, variables, &self.options)
    }

    /// Compiles a single template string.
    pub fn compile_str(&self, template: &str, variables: &Value) -> Result<Value> {
        Compilation::new(variables, &self.options).process_string(template)
    }
}

struct Compilation<'a> {
    options: &'a Options,
    resolver: VariableResolver<'a>,
}

impl<'a> Compilation<'a> {
    fn new(variables: &'a Value, options: &'a Options) -> Self {
        Self {
            options,
            resolver: VariableResolver::new(
                variables,
                options.resolver.as_deref(),
                options.max_variable_depth,
            ),
        }
    }

    fn process(&self, value: &Value) -> Result<Value> {
        match value {
            Value::String(text) => self.process_string(text),
            Value::Array(items) => items
                .iter()
                .map(|item| self.process(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Value::Object(map) => map
                .iter()
                .map(|(key, item)| self.process(item).map(|value| (key.clone(), value)))
                .collect::<Result<Map<_, _>>>()
                .map(Value::Object),
            Value::Null | Value::Bool(_) | Value::Number(_) => Ok(value.clone()),
        }
    }

    fn process_string(&self, text: &str) -> Result<Value> {
        let pattern = &self.options.variable_pattern;

        let marked = mark(text, pattern, &self.options.escape_character);
        let substituted = substitute(marked, self.options, &self.resolver)?;
        let mut restored = unmark(&substituted, pattern);

        if let Some(transform) = &self.options.string_transform {
            restored = transform(restored).map_err(InterpolateError::Transform)?;
        }

        let coerced = coerce(
            restored,
            self.options.parse_strings,
            self.options.parse_big_ints,
        );
        Ok(reparse_composite(coerced))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_pass_through() {
        let options = Options::new();
        for value in [json!(123), json!(true), Value::Null, json!(1.5)] {
            assert_eq!(compile_template(&value, &json!({}), &options).unwrap(), value);
        }
    }

    #[test]
    fn empty_containers() {
        let options = Options::new();
        assert_eq!(compile_template(&json!(""), &json!({}), &options).unwrap(), json!(""));
        assert_eq!(compile_template(&json!({}), &json!({}), &options).unwrap(), json!({}));
        assert_eq!(compile_template(&json!([]), &json!({}), &options).unwrap(), json!([]));
    }

    #[test]
    fn object_keys_are_not_substituted() {
        let template = json!({"{{key}}": "{{value}}"});
        let vars = json!({"key": "k", "value": "v"});
        let out = compile_template(&template, &vars, &Options::new()).unwrap();
        assert_eq!(out, json!({"{{key}}": "v"}));
    }

    #[test]
    fn object_key_order_is_kept() {
        let template = json!({"zeta": "{{a}}", "alpha": "{{b}}", "mid": 1});
        let vars = json!({"a": "1st", "b": "2nd"});
        let out = compile_template(&template, &vars, &Options::new()).unwrap();
        let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn strict_failure_in_nested_leaf_aborts_everything() {
        let template = json!({"ok": "{{a}}", "nested": ["{{missing}}"]});
        let options = Options::new().strict(true);
        let err = compile_template(&template, &json!({"a": 1}), &options).unwrap_err();
        assert!(matches!(err, InterpolateError::MissingVariable { ref path } if path == "missing"));
    }

    #[test]
    fn transform_runs_before_coercion() {
        let options = Options::new().string_transform(|s| format!("[{s}]"));
        let out = compile_template(&json!("1, 2"), &json!({}), &options).unwrap();
        assert_eq!(out, json!([1, 2]));
    }

    #[test]
    fn transform_error_propagates() {
        let options =
            Options::new().try_string_transform(|_| Err::<String, _>("transform refused"));
        let err = compile_template(&json!("text"), &json!({}), &options).unwrap_err();
        assert!(matches!(err, InterpolateError::Transform(_)));
        assert_eq!(err.to_string(), "transform refused");
    }

    #[test]
    fn interpolator_reuses_options() {
        let interpolator = Interpolator::new(Options::new().parse_strings(false));
        let vars = json!({"n": 5});
        assert_eq!(interpolator.compile_str("{{n}}", &vars).unwrap(), json!("5"));
        assert_eq!(
            interpolator.compile(&json!(["{{n}}"]), &vars).unwrap(),
            json!(["5"])
        );
        assert!(!interpolator.options().parse_strings);
    }
}
