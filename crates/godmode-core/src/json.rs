//! # JSON Formatter
//!
//! Parses JSON into a `serde_json::Value` (a tagged variant over null,
//! boolean, number, string, array and object) and renders it back either
//! pretty-printed or minified.
//!
//! ## Invariants
//!
//! - Object key order from the input is preserved (`preserve_order`);
//!   duplicate keys keep the last value.
//! - Pretty output uses a 2-space indent, one key per line, and ends with
//!   exactly one newline.
//! - `pretty_print` is idempotent: formatting its own output returns the
//!   same string.

use serde_json::Value;

use crate::error::{Result, SyntaxError, ToolError};

/// Parse `text` into a JSON value.
///
/// # Errors
///
/// [`SyntaxError::Json`] carrying the 1-based line and column of the
/// first syntactic failure.
pub fn parse(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| {
        ToolError::Syntax(SyntaxError::Json {
            line: e.line(),
            column: e.column(),
            message: strip_position(&e.to_string()),
        })
    })
}

/// Parse and pretty-print with a 2-space indent and trailing newline.
pub fn pretty_print(text: &str) -> Result<String> {
    let value = parse(text)?;
    tracing::trace!(input_len = text.len(), "pretty-printing JSON");
    Ok(to_pretty(&value))
}

/// Parse and render with no insignificant whitespace.
pub fn minify(text: &str) -> Result<String> {
    let value = parse(text)?;
    Ok(value.to_string())
}

/// Render an already-parsed value in the pretty format.
pub fn to_pretty(value: &Value) -> String {
    // Serializing a `Value` into a String cannot fail: keys are strings and
    // numbers are finite by construction.
    let mut out = serde_json::to_string_pretty(value).unwrap_or_default();
    out.push('\n');
    out
}

/// Summary of a parsed document, shown next to the formatted output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct DocumentStats {
    /// Maximum nesting depth (a scalar document has depth 0).
    pub depth: usize,
    /// Total object keys across the document.
    pub keys: usize,
    /// Total values, including containers.
    pub values: usize,
}

/// Walk a parsed document and count depth, keys and values.
pub fn stats(value: &Value) -> DocumentStats {
    fn walk(value: &Value, depth: usize, stats: &mut DocumentStats) {
        stats.values += 1;
        stats.depth = stats.depth.max(depth);
        match value {
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
            Value::Array(items) => {
                for item in items {
                    walk(item, depth + 1, stats);
                }
            }
            Value::Object(map) => {
                stats.keys += map.len();
                for item in map.values() {
                    walk(item, depth + 1, stats);
                }
            }
        }
    }
    let mut stats = DocumentStats::default();
    walk(value, 0, &mut stats);
    stats
}

/// serde_json appends " at line X column Y" to its messages; the position
/// is reported structurally instead.
fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(idx) => message[..idx].to_string(),
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn pretty_inserts_newlines_and_indent() {
        let pretty = pretty_print(r#"{"a":1,"b":2}"#).unwrap();
        assert_eq!(pretty, "{\n  \"a\": 1,\n  \"b\": 2\n}\n");
    }

    #[test]
    fn preserves_key_order() {
        let pretty = pretty_print(r#"{"zeta":1,"alpha":2,"mid":3}"#).unwrap();
        let zeta = pretty.find("zeta").unwrap();
        let alpha = pretty.find("alpha").unwrap();
        let mid = pretty.find("mid").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let value = parse(r#"{"a":1,"a":2}"#).unwrap();
        assert_eq!(value["a"], 2);
        assert_eq!(value.as_object().unwrap().len(), 1);
    }

    #[test]
    fn scalars_and_empty_containers() {
        for (input, expected) in [
            ("null", "null\n"),
            ("true", "true\n"),
            ("123", "123\n"),
            ("\"string\"", "\"string\"\n"),
            ("[]", "[]\n"),
            ("{}", "{}\n"),
        ] {
            assert_eq!(pretty_print(input).unwrap(), expected);
        }
    }

    #[test]
    fn error_reports_line_and_column() {
        let err = pretty_print("{\n  \"a\": 1,\n  \"b\": }").unwrap_err();
        match err {
            ToolError::Syntax(SyntaxError::Json { line, column, message }) => {
                assert_eq!(line, 3);
                assert!((7..=8).contains(&column), "column {column}");
                assert!(!message.contains("at line"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            pretty_print(""),
            Err(ToolError::Syntax(SyntaxError::Json { .. }))
        ));
    }

    #[test]
    fn minify_strips_whitespace() {
        assert_eq!(
            minify("{\n  \"a\": [1, 2],\n  \"b\": null\n}\n").unwrap(),
            r#"{"a":[1,2],"b":null}"#
        );
    }

    #[test]
    fn deep_nesting_is_formatted() {
        let depth = 50;
        let mut doc = String::from("{\"inner\":");
        doc.push_str(&"{\"a\":".repeat(depth));
        doc.push('1');
        doc.push_str(&"}".repeat(depth + 1));
        let pretty = pretty_print(&doc).unwrap();
        assert!(pretty.lines().count() > depth);
        assert_eq!(stats(&parse(&doc).unwrap()).depth, depth + 1);
    }

    #[test]
    fn stats_counts_keys_and_values() {
        let value = parse(r#"{"a":[1,2,{"b":null}],"c":"x"}"#).unwrap();
        let s = stats(&value);
        assert_eq!(s.keys, 3);
        assert_eq!(s.values, 7);
        assert_eq!(s.depth, 3);
    }

    fn json_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9_ \"\\\\]{0,20}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::vec(("[a-z]{1,6}", inner), 0..6)
                    .prop_map(|pairs| Value::Object(pairs.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn pretty_print_is_idempotent(value in json_value()) {
            let once = pretty_print(&value.to_string()).unwrap();
            let twice = pretty_print(&once).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn pretty_output_reparses_equal(value in json_value()) {
            let pretty = to_pretty(&value);
            prop_assert_eq!(parse(&pretty).unwrap(), value);
        }
    }
}
