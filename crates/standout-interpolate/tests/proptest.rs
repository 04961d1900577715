//! Property-based tests for interpolate using proptest.

use proptest::prelude::*;
use serde_json::{json, Value};
use standout_interpolate::escape::{mark, unmark};
use standout_interpolate::{compile_template, Options, VariablePattern};

// ============================================================================
// Test helpers
// ============================================================================

fn variables_for(names: &[String]) -> Value {
    let map = names
        .iter()
        .map(|name| (name.clone(), json!(format!("<{name}>"))))
        .collect::<serde_json::Map<_, _>>();
    Value::Object(map)
}

// Strings built from letters, spaces, braces and backslashes: enough to form
// delimiters and escapes without ever producing a sentinel codepoint.
fn escapable_text() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "[a-z ]",
        Just("{".to_string()),
        Just("}".to_string()),
        Just("\\".to_string()),
    ];
    prop::collection::vec(piece, 0..40).prop_map(|parts| parts.concat())
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Text without placeholders comes back untouched.
    #[test]
    fn no_placeholders_is_identity(text in "[a-zA-Z ,.!?]{0,60}") {
        let options = Options::new().parse_strings(false);
        let out = compile_template(&json!(text.clone()), &json!({}), &options).unwrap();
        prop_assert_eq!(out, Value::String(text));
    }

    /// Unmarking a marked string strips escape characters before delimiters only.
    #[test]
    fn escape_round_trip(text in escapable_text()) {
        let pattern = VariablePattern::default();
        let expected = text.replace("\\{{", "{{").replace("\\}}", "}}");
        prop_assert_eq!(unmark(&mark(&text, &pattern, "\\"), &pattern), expected);
    }

    /// Marking with an escape character absent from the text changes nothing.
    #[test]
    fn mark_without_escapes_is_identity(text in "[a-z{} ]{0,40}") {
        let pattern = VariablePattern::default();
        prop_assert_eq!(mark(&text, &pattern, "\\"), text.clone());
    }

    /// Arrays keep their length and order; every resolvable leaf is substituted.
    #[test]
    fn arrays_keep_shape(names in prop::collection::vec("[a-z]{1,8}", 0..20)) {
        let template = Value::Array(names.iter().map(|n| json!(format!("{{{{{n}}}}}"))).collect());
        let variables = variables_for(&names);

        let out = compile_template(&template, &variables, &Options::default()).unwrap();
        let items = out.as_array().unwrap();

        prop_assert_eq!(items.len(), names.len());
        for (item, name) in items.iter().zip(&names) {
            prop_assert_eq!(item, &json!(format!("<{name}>")));
        }
    }

    /// Object templates keep every key.
    #[test]
    fn objects_keep_keys(names in prop::collection::btree_set("[a-z]{1,8}", 0..20)) {
        let names: Vec<String> = names.into_iter().collect();
        let template = Value::Object(
            names.iter().map(|n| (n.clone(), json!(format!("{{{{{n}}}}}")))).collect(),
        );

        let out = compile_template(&template, &variables_for(&names), &Options::default()).unwrap();
        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        prop_assert_eq!(keys, names.iter().collect::<Vec<_>>());
    }

    /// A self-referencing value always terminates within the pass cap.
    #[test]
    fn self_reference_terminates(depth in 0usize..30) {
        let options = Options::new().max_variable_depth(depth).parse_strings(false);
        let out = compile_template(&json!("{{x}}"), &json!({"x": "a{{x}}"}), &options).unwrap();

        let expected = match depth {
            0 => "{{x}}".to_string(),
            d => "a".repeat(d - 1),
        };
        prop_assert_eq!(out, Value::String(expected));
    }

    /// Strict mode either fully succeeds or reports the first missing path.
    #[test]
    fn strict_mode_is_all_or_nothing(present in "[a-m]{1,6}", absent in "[n-z]{1,6}") {
        let options = Options::new().strict(true);
        let template = json!([format!("{{{{{present}}}}}"), format!("{{{{{absent}}}}}")]);
        let mut variables = serde_json::Map::new();
        variables.insert(present.clone(), json!("here"));
        let variables = Value::Object(variables);

        let err = compile_template(&template, &variables, &options).unwrap_err();
        prop_assert_eq!(err.to_string(), format!("Missing variable: {absent}"));
    }
}
