//! String-list coercion.
//!
//! Recommendation and risk lists arrive as arrays, JSON text, bare strings,
//! wrapped under their own key, or inside a `result` envelope. Everything is
//! coerced to an ordered `Vec<String>`; shapes that carry nothing usable
//! become an empty list.

use serde_json::Value;

use super::aliases::RESULT_KEY;
use super::import::parse_inner;

/// Maximum nested re-parses/re-wraps followed while coercing one list.
pub const MAX_COERCE_DEPTH: usize = 4;

/// Coerce `value` into a list of strings, descending into `key` when the
/// value is a structure.
///
/// - string: parsed as JSON and coerced again; unparseable text is a
///   single-element list, blank text an empty one
/// - array: string elements in order, others dropped
/// - object: coerce `value[key]` if present, else unwrap a `result` envelope
/// - anything else: empty
pub fn string_list(value: &Value, key: &str) -> Vec<String> {
    coerce(value, key, 0)
}

fn coerce(value: &Value, key: &str, depth: usize) -> Vec<String> {
    if depth > MAX_COERCE_DEPTH {
        return Vec::new();
    }
    match value {
        Value::String(text) => {
            if text.trim().is_empty() {
                return Vec::new();
            }
            match serde_json::from_str::<Value>(text) {
                Ok(parsed) => coerce(&parsed, key, depth + 1),
                Err(_) => vec![text.clone()],
            }
        }
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        Value::Object(map) => match map.get(key) {
            Some(inner) => coerce(inner, key, depth + 1),
            None => map
                .get(RESULT_KEY)
                .and_then(|inner| parse_inner(inner.clone()))
                .map(|inner| coerce(&inner, key, depth + 1))
                .unwrap_or_default(),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const KEY: &str = "recommendations";

    #[test]
    fn test_bare_string_is_single_entry() {
        assert_eq!(
            string_list(&json!("watch for blight"), KEY),
            vec!["watch for blight"]
        );
    }

    #[test]
    fn test_array_keeps_strings_in_order() {
        let value = json!(["b", 1, "a", null, {"x": 1}, "c"]);
        assert_eq!(string_list(&value, KEY), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_json_text_is_parsed() {
        let value = json!(r#"["spray copper", "remove leaves"]"#);
        assert_eq!(
            string_list(&value, KEY),
            vec!["spray copper", "remove leaves"]
        );
    }

    #[test]
    fn test_nested_under_own_key() {
        let value = json!({"recommendations": ["a", "b"]});
        assert_eq!(string_list(&value, KEY), vec!["a", "b"]);

        let value = json!({"recommendations": r#"{"recommendations": "just one"}"#});
        assert_eq!(string_list(&value, KEY), vec!["just one"]);
    }

    #[test]
    fn test_result_envelope_inside_list_field() {
        // Shape of an LLM reply stored under `recommendations`.
        let payload = json!({
            "disease_name": "Black Sigatoka",
            "recommendations": ["Remove infected leaves", "Apply fungicide"],
        });
        let envelope = json!({"result": payload.to_string(), "status": true, "server_code": 1});
        assert_eq!(
            string_list(&json!(envelope.to_string()), KEY),
            vec!["Remove infected leaves", "Apply fungicide"]
        );
        assert_eq!(
            string_list(&envelope, KEY),
            vec!["Remove infected leaves", "Apply fungicide"]
        );
    }

    #[test]
    fn test_result_envelope_with_bad_json_is_empty() {
        let envelope = json!({"result": "{not json", "status": false});
        assert!(string_list(&envelope, KEY).is_empty());
    }

    #[test]
    fn test_object_without_key_is_empty() {
        assert!(string_list(&json!({"risks": ["x"]}), KEY).is_empty());
        assert_eq!(string_list(&json!({"risks": ["x"]}), "risks"), vec!["x"]);
    }

    #[test]
    fn test_scalars_and_blank_are_empty() {
        assert!(string_list(&json!(null), KEY).is_empty());
        assert!(string_list(&json!(12), KEY).is_empty());
        assert!(string_list(&json!(true), KEY).is_empty());
        assert!(string_list(&json!("   "), KEY).is_empty());
        // Parses as a number, which carries no list.
        assert!(string_list(&json!("42"), KEY).is_empty());
    }

    #[test]
    fn test_depth_cap_stops_self_nesting() {
        let mut value = json!(["deep"]);
        for _ in 0..(MAX_COERCE_DEPTH + 1) {
            value = json!({ "recommendations": value });
        }
        assert!(string_list(&value, KEY).is_empty());

        let mut value = json!(["shallow"]);
        for _ in 0..MAX_COERCE_DEPTH {
            value = json!({ "recommendations": value });
        }
        assert_eq!(string_list(&value, KEY), vec!["shallow"]);
    }
}
