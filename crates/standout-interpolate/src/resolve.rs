//! Variable path resolution.
//!
//! A placeholder's path is resolved in this order:
//!
//! 1. If the current substitution pass has reached `max_variable_depth`, the
//!    path is treated as unresolved. The depth is the loop's pass number, not
//!    the number of segments in the path.
//! 2. A custom [`Resolver`], if configured, gets the first say. Returning
//!    `None` falls through.
//! 3. [`lookup`] against the variables tree.
//!
//! Resolvers are consulted once per pass in which their placeholder is still
//! present, so the same path can be asked for several times during one call.
//! Implementations should be cheap and return the same answer each time.

use std::borrow::Cow;

use serde_json::Value;

use crate::error::{BoxError, InterpolateError, Result};

/// Supplies values for variable paths ahead of the variables tree.
///
/// Closures can be registered directly with
/// [`Options::resolver`](crate::Options::resolver) and
/// [`Options::try_resolver`](crate::Options::try_resolver); implement this
/// trait when the resolver is a type of its own.
///
/// ```rust
/// use serde_json::{json, Value};
/// use standout_interpolate::{compile_template, BoxError, Options, Resolver};
///
/// struct Env;
///
/// impl Resolver for Env {
///     fn resolve(&self, path: &str) -> Result<Option<Value>, BoxError> {
///         Ok(path.strip_prefix("env.").map(|name| json!(name.to_uppercase())))
///     }
/// }
///
/// let options = Options::new().with_resolver(Env);
/// let out = compile_template(&json!("{{env.home}}"), &json!({}), &options).unwrap();
/// assert_eq!(out, json!("HOME"));
/// ```
pub trait Resolver: Send + Sync {
    /// Returns the value for `path`, or `None` to defer to the variables tree.
    ///
    /// `path` has already been trimmed of surrounding whitespace.
    fn resolve(&self, path: &str) -> std::result::Result<Option<Value>, BoxError>;
}

/// Type-erased resolver as stored in [`Options`](crate::Options).
pub(crate) type ResolveFn =
    dyn Fn(&str) -> std::result::Result<Option<Value>, BoxError> + Send + Sync;

/// Looks up a path in a variables tree.
///
/// A key equal to the whole path wins, so flat keys containing dots or other
/// punctuation resolve directly. Otherwise the path is split on `.`, `[` and
/// `]`, quotes around segments are dropped, empty segments are skipped, and
/// the rest are walked through objects by key and arrays by decimal index. A
/// path with no segments at all resolves to nothing.
///
/// ```rust
/// use serde_json::json;
/// use standout_interpolate::lookup;
///
/// let vars = json!({"users": [{"name": "Ada"}], "a.b": 1});
/// assert_eq!(lookup(&vars, "users[0].name"), Some(&json!("Ada")));
/// assert_eq!(lookup(&vars, "users.0.name"), Some(&json!("Ada")));
/// assert_eq!(lookup(&vars, "a.b"), Some(&json!(1)));
/// assert_eq!(lookup(&vars, "users.1"), None);
/// ```
pub fn lookup<'a>(variables: &'a Value, path: &str) -> Option<&'a Value> {
    if let Some(direct) = variables.as_object().and_then(|map| map.get(path)) {
        return Some(direct);
    }

    let mut segments = path
        .split(['.', '[', ']'])
        .map(|s| s.trim_matches(|c: char| c == '"' || c == '\''))
        .filter(|s| !s.is_empty())
        .peekable();
    segments.peek()?;

    let mut current = variables;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Per-call resolver combining the custom hook, the variables and the depth cap.
pub(crate) struct VariableResolver<'a> {
    variables: &'a Value,
    custom: Option<&'a ResolveFn>,
    max_depth: usize,
}

impl<'a> VariableResolver<'a> {
    pub(crate) fn new(
        variables: &'a Value,
        custom: Option<&'a ResolveFn>,
        max_depth: usize,
    ) -> Self {
        Self {
            variables,
            custom,
            max_depth,
        }
    }

    /// Resolves a trimmed path during substitution pass `depth`.
    pub(crate) fn resolve(&self, path: &str, depth: usize) -> Result<Option<Cow<'a, Value>>> {
        if depth >= self.max_depth {
            return Ok(None);
        }

        if let Some(custom) = self.custom {
            if let Some(value) = custom(path).map_err(InterpolateError::Resolver)? {
                return Ok(Some(Cow::Owned(value)));
            }
        }

        Ok(lookup(self.variables, path).map(Cow::Borrowed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_flat_and_nested() {
        let vars = json!({"name": "World", "user": {"profile": {"name": "John"}}});
        assert_eq!(lookup(&vars, "name"), Some(&json!("World")));
        assert_eq!(lookup(&vars, "user.profile.name"), Some(&json!("John")));
    }

    #[test]
    fn lookup_missing_segment() {
        let vars = json!({"user": {}});
        assert_eq!(lookup(&vars, "user.profile.name"), None);
    }

    #[test]
    fn lookup_through_scalar_fails() {
        let vars = json!({"name": "World"});
        assert_eq!(lookup(&vars, "name.length"), None);
    }

    #[test]
    fn lookup_special_character_keys() {
        let vars = json!({"user-name": "John", "email@domain": "john@example.com"});
        assert_eq!(lookup(&vars, "user-name"), Some(&json!("John")));
        assert_eq!(lookup(&vars, "email@domain"), Some(&json!("john@example.com")));
    }

    #[test]
    fn lookup_bracket_quotes_and_empty_paths() {
        let vars = json!({"a": {"b c": 1}});
        assert_eq!(lookup(&vars, "a[\"b c\"]"), Some(&json!(1)));
        assert_eq!(lookup(&vars, ""), None);
        assert_eq!(lookup(&vars, "."), None);
    }

    #[test]
    fn lookup_null_is_present() {
        let vars = json!({"value": null});
        assert_eq!(lookup(&vars, "value"), Some(&Value::Null));
    }

    #[test]
    fn lookup_array_index_rejects_non_numeric() {
        let vars = json!({"items": ["a", "b"]});
        assert_eq!(lookup(&vars, "items[1]"), Some(&json!("b")));
        assert_eq!(lookup(&vars, "items.first"), None);
    }

    #[test]
    fn resolver_depth_cap_short_circuits() {
        let vars = json!({"name": "World"});
        let resolver = VariableResolver::new(&vars, None, 2);
        assert!(resolver.resolve("name", 1).unwrap().is_some());
        assert!(resolver.resolve("name", 2).unwrap().is_none());
    }

    #[test]
    fn custom_resolver_precedes_variables() {
        let vars = json!({"name": "from vars", "other": "fallback"});
        let custom: Box<ResolveFn> =
            Box::new(|path: &str| -> std::result::Result<Option<Value>, BoxError> {
                Ok((path == "name").then(|| json!("from resolver")))
            });
        let resolver = VariableResolver::new(&vars, Some(custom.as_ref()), 10);

        let name = resolver.resolve("name", 1).unwrap().unwrap();
        assert_eq!(name.as_ref(), &json!("from resolver"));
        let other = resolver.resolve("other", 1).unwrap().unwrap();
        assert_eq!(other.as_ref(), &json!("fallback"));
    }

    #[test]
    fn custom_resolver_error_propagates() {
        let vars = json!({});
        let custom: Box<ResolveFn> =
            Box::new(|_: &str| -> std::result::Result<Option<Value>, BoxError> {
                Err("lookup service down".into())
            });
        let resolver = VariableResolver::new(&vars, Some(custom.as_ref()), 10);

        let err = resolver.resolve("anything", 1).unwrap_err();
        assert!(matches!(err, InterpolateError::Resolver(_)));
        assert_eq!(err.to_string(), "lookup service down");
    }
}
