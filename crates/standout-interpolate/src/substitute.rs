//! The replace-until-fixed-point loop.
//!
//! Each pass replaces every placeholder in the string at once, scanning left
//! to right. Another pass runs only if the previous one substituted at least
//! one scalar value and the opening delimiter still occurs in the text, which
//! is what lets a variable's value contain placeholders of its own. Passes are
//! capped at `max_variable_depth`; that cap is the only guard against
//! self-referencing values, there is no cycle detection.
//!
//! Per placeholder:
//!
//! | resolved value | substituted text | counts as progress |
//! |----------------|------------------|--------------------|
//! | nothing, strict | aborts with `Missing variable: <path>` | - |
//! | nothing, `preserve_undefined` | the placeholder itself | no |
//! | nothing | empty string | no |
//! | object / array | JSON text | only without `auto_stringify_objects` |
//! | anything else | its text, `null` as `null` | yes |

use serde_json::Value;

use crate::error::{InterpolateError, Result};
use crate::options::Options;
use crate::resolve::VariableResolver;

/// Runs substitution passes over `text` until nothing changes or the cap is hit.
pub(crate) fn substitute(
    text: String,
    options: &Options,
    resolver: &VariableResolver<'_>,
) -> Result<String> {
    let open = options.variable_pattern.open();
    let mut result = text;
    let mut pass = 0;

    loop {
        pass += 1;
        if pass > options.max_variable_depth {
            tracing::debug!(
                max_variable_depth = options.max_variable_depth,
                "substitution stopped at pass cap"
            );
            break;
        }

        let (next, changed) = substitute_pass(&result, pass, options, resolver)?;
        result = next;
        tracing::trace!(pass, changed, "substitution pass complete");

        if !changed || !result.contains(open) {
            break;
        }
    }

    Ok(result)
}

fn substitute_pass(
    text: &str,
    pass: usize,
    options: &Options,
    resolver: &VariableResolver<'_>,
) -> Result<(String, bool)> {
    let mut out = String::with_capacity(text.len());
    let mut changed = false;
    let mut last = 0;

    for caps in options.variable_pattern.regex().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let raw_path = caps.get(1).map_or("", |m| m.as_str());

        out.push_str(&text[last..whole.start()]);
        last = whole.end();

        match resolver.resolve(raw_path.trim(), pass)? {
            None => {
                if options.strict {
                    return Err(InterpolateError::MissingVariable {
                        path: raw_path.to_string(),
                    });
                }
                tracing::debug!(path = raw_path.trim(), pass, "variable unresolved");
                if options.preserve_undefined {
                    out.push_str(whole.as_str());
                }
            }
            Some(value) if is_composite(&value) && options.auto_stringify_objects => {
                out.push_str(&value.to_string());
            }
            Some(value) => {
                out.push_str(&render(&value));
                changed = true;
            }
        }
    }

    out.push_str(&text[last..]);
    Ok((out, changed))
}

fn is_composite(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        // f64's Display drops a zero fraction: 2.0 renders as `2`.
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}
