//! Lenient JSON handling for LLM responses.
//!
//! Responses usually wrap a JSON object in prose; the outermost `{…}` is
//! located by balanced-brace scanning and parsed. Elements missing required
//! keys are skipped individually; everything else falls back to defaults.

use serde_json::{Map, Value};

/// Extract the outermost balanced `{…}` block from a response, respecting
/// string literals and escapes.
pub fn extract_json_block(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let bytes = response.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&response[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse the outermost JSON object in a response.
pub fn parse_object(response: &str) -> Option<Value> {
    let block = extract_json_block(response)?;
    serde_json::from_str(block).ok()
}

/// The array of objects under `key`, skipping non-object entries.
pub fn object_array(value: &Value, key: &str) -> Vec<Map<String, Value>> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .collect()
        })
        .unwrap_or_default()
}

/// A string field, defaulting to empty.
pub fn str_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// An optional non-empty string field.
pub fn opt_str_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    let value = str_field(obj, key);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// A list of strings; a scalar string is accepted as a one-element list.
pub fn str_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

/// A list of objects under `key` on an element.
pub fn nested_objects(obj: &Map<String, Value>, key: &str) -> Vec<Map<String, Value>> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .collect()
        })
        .unwrap_or_default()
}

/// A numeric field coerced to usize.
pub fn usize_field(obj: &Map<String, Value>, key: &str, default: usize) -> usize {
    obj.get(key)
        .and_then(Value::as_u64)
        .map(|n| n as usize)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_object_embedded_in_prose() {
        let response = r#"Here is the result:
{"actors": [{"name": "Operator"}]}
Hope this helps!"#;
        let block = extract_json_block(response).unwrap();
        assert_eq!(block, r#"{"actors": [{"name": "Operator"}]}"#);
    }

    #[test]
    fn extraction_spans_nested_braces_and_strings() {
        let response = r#"{"a": {"b": "closing } inside string"}, "c": 1} trailing"#;
        let block = extract_json_block(response).unwrap();
        assert!(block.ends_with(r#""c": 1}"#));
        assert!(parse_object(response).is_some());
    }

    #[test]
    fn missing_object_yields_none() {
        assert!(extract_json_block("no json here").is_none());
        assert!(parse_object("[1, 2, 3]").is_none());
    }

    #[test]
    fn object_array_skips_non_objects() {
        let value: Value =
            serde_json::from_str(r#"{"items": [{"name": "a"}, 42, {"name": "b"}]}"#).unwrap();
        assert_eq!(object_array(&value, "items").len(), 2);
        assert!(object_array(&value, "missing").is_empty());
    }

    #[test]
    fn str_list_accepts_scalar() {
        let value: Value = serde_json::from_str(r#"{"xs": "single", "ys": ["a", "b"]}"#).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(str_list(obj, "xs"), vec!["single"]);
        assert_eq!(str_list(obj, "ys"), vec!["a", "b"]);
    }
}
