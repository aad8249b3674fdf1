//! Layered JSON extraction from free-form model output.
//!
//! The layers, in order:
//! (a) strict parse of the trimmed response;
//! (b) if the trimmed response looks like a brace-delimited object, repair
//!     common defects (trailing commas, unquoted keys) and retry;
//! (c) extract the first balanced `{...}` substring and retry;
//! (d) field-by-field regex extraction for known keys;
//! (e) a minimal well-formed object carrying the truncated raw text.
//!
//! Locale-aware field names: the analysis/report JSON uses locale-specific
//! keys; [`get_str`]/[`get_bool`]/[`get_number`] accept a list of candidate
//! keys so a caller can pass both the active locale's key and its English
//! counterpart.

use serde_json::{Map, Value};

use crate::utils::json_repair;

const TRUNCATE_LEN: usize = 500;

/// Layers (a)-(c): strict parse, then repaired parse, then brace-matched
/// substring parse. Returns `None` if none succeed, leaving layer (d)/(e)
/// to the caller via [`parse_with_fallback`].
fn parse_layers_abc(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        let repaired = json_repair::repair(trimmed);
        if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
            return Some(value);
        }
    }

    if let Some(extracted) = json_repair::extract_first_brace_object(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(extracted) {
            return Some(value);
        }
        let repaired = json_repair::repair(extracted);
        if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
            return Some(value);
        }
    }

    None
}

/// Layer (d): regex-extract `"key": <scalar-or-array>` pairs for each of
/// `known_keys`, tolerating unquoted keys and surrounding prose. Only
/// scalar (string/number/bool) and flat string-array values are recovered —
/// enough for the verdict/analysis/report shapes this crate parses.
fn field_regex_fallback(raw: &str, known_keys: &[&str]) -> Map<String, Value> {
    let mut out = Map::new();
    for key in known_keys {
        let pattern = format!(r#""?{}"?\s*:\s*(\[[^\]]*\]|"[^"]*"|true|false|-?\d+(?:\.\d+)?)"#, regex::escape(key));
        let re = match regex::Regex::new(&pattern) {
            Ok(re) => re,
            Err(_) => continue,
        };
        let Some(caps) = re.captures(raw) else { continue };
        let raw_value = &caps[1];
        let parsed = serde_json::from_str::<Value>(raw_value)
            .or_else(|_| serde_json::from_str::<Value>(&json_repair::repair(raw_value)));
        if let Ok(value) = parsed {
            out.insert((*key).to_string(), value);
        }
    }
    out
}

/// Layer (e): a minimal, always-valid object carrying the truncated raw
/// response in an `error` field. Callers treat missing/defaulted fields as
/// zero/empty per their own reconciliation rules.
fn degraded_object(raw: &str) -> Value {
    let mut truncated: String = raw.chars().take(TRUNCATE_LEN).collect();
    if raw.chars().count() > TRUNCATE_LEN {
        truncated.push('…');
    }
    let mut map = Map::new();
    map.insert("error".to_string(), Value::String(truncated));
    Value::Object(map)
}

/// Run the full layered pipeline. Never returns `Err`; the worst case is
/// [`degraded_object`]'s minimal wrapper, augmented with whatever layer (d)
/// managed to regex out.
#[must_use]
pub fn parse_tolerant_json(raw: &str) -> Value {
    parse_with_known_keys(raw, &[])
}

/// As [`parse_tolerant_json`], but layer (d) is seeded with the semantic
/// keys the caller expects, so a response too malformed for (a)-(c) can
/// still recover individual fields.
#[must_use]
pub fn parse_with_known_keys(raw: &str, known_keys: &[&str]) -> Value {
    if let Some(value) = parse_layers_abc(raw) {
        return value;
    }
    let recovered = field_regex_fallback(raw, known_keys);
    if recovered.is_empty() {
        degraded_object(raw)
    } else {
        let mut degraded = degraded_object(raw);
        if let Value::Object(map) = &mut degraded {
            for (k, v) in recovered {
                map.insert(k, v);
            }
        }
        degraded
    }
}

/// Look up the first of `keys` present in `value` as a string.
#[must_use]
pub fn get_str<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| value.get(k)).and_then(Value::as_str)
}

/// Look up the first of `keys` present in `value` as a bool.
#[must_use]
pub fn get_bool(value: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|k| value.get(k)).and_then(Value::as_bool)
}

/// Look up the first of `keys` present in `value` as an integer.
#[must_use]
pub fn get_u64(value: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|k| value.get(k)).and_then(Value::as_u64)
}

/// Look up the first of `keys` present in `value` as a float.
#[must_use]
pub fn get_f64(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| value.get(k)).and_then(Value::as_f64)
}

/// Look up the first of `keys` present in `value` as a string array.
#[must_use]
pub fn get_str_array(value: &Value, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find_map(|k| value.get(k))
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_parse_succeeds_on_clean_json() {
        let value = parse_tolerant_json(r#"{"valid": true}"#);
        assert_eq!(value["valid"], Value::Bool(true));
    }

    #[test]
    fn repairs_trailing_comma_and_unquoted_keys() {
        let value = parse_tolerant_json(r#"{valid: true, feedback: "ok",}"#);
        assert_eq!(value["valid"], Value::Bool(true));
        assert_eq!(value["feedback"], Value::String("ok".into()));
    }

    #[test]
    fn extracts_object_from_surrounding_prose() {
        let value = parse_tolerant_json("Sure! Here is the verdict: {\"valid\": false} Hope that helps.");
        assert_eq!(value["valid"], Value::Bool(false));
    }

    #[test]
    fn falls_back_to_field_regex_on_total_garbage() {
        let value = parse_with_known_keys("valid: true but not JSON at all, sorry", &["valid"]);
        assert_eq!(value["valid"], Value::Bool(true));
        assert!(value.get("error").is_some());
    }

    #[test]
    fn degrades_to_error_wrapper_when_nothing_recoverable() {
        let value = parse_tolerant_json("I cannot comply with this request.");
        assert!(value.get("error").is_some());
    }

    #[test]
    fn degraded_object_truncates_long_raw_text() {
        let long = "x".repeat(1000);
        let value = parse_tolerant_json(&long);
        let err = value["error"].as_str().unwrap();
        assert!(err.chars().count() <= TRUNCATE_LEN + 1);
    }

    #[test]
    fn get_str_prefers_first_matching_key() {
        let value: Value = serde_json::json!({"identified_count": 3});
        assert_eq!(get_u64(&value, &["已識別數量", "identified_count"]), Some(3));
    }
}
