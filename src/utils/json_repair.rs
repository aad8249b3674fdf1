//! Best-effort JSON repair for tolerant parsing of model output.
//!
//! Small pure transforms over `serde_json::Value` and raw JSON text, no
//! external dependency, each well-tested in isolation.

/// Strip a trailing comma that precedes a closing `}` or `]`.
///
/// `{"a": 1, "b": 2,}` -> `{"a": 1, "b": 2}`. Operates outside of string
/// literals so commas embedded in quoted values are left untouched.
#[must_use]
pub fn strip_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if c == '"' {
            in_string = true;
            out.push(c);
            continue;
        }

        if c == ',' {
            // Look ahead past whitespace for a closing bracket.
            let mut lookahead = chars.clone();
            let next_non_whitespace = lookahead.by_ref().find(|la| !la.is_whitespace());
            if matches!(next_non_whitespace, Some('}') | Some(']')) {
                continue; // drop the trailing comma
            }
        }

        out.push(c);
    }

    out
}

/// Quote bare object keys: `{a: 1}` -> `{"a": 1}`.
///
/// Only rewrites identifier-shaped keys that are not already quoted, and
/// never touches content inside string literals.
#[must_use]
pub fn quote_unquoted_keys(input: &str) -> String {
    let re = regex::Regex::new(r#"(?P<prefix>[{,]\s*)(?P<key>[A-Za-z_][A-Za-z0-9_]*)\s*:"#)
        .expect("static regex is valid");
    let mut out = String::with_capacity(input.len());
    let mut last_end = 0;
    let in_string_before = |byte_offset: usize| -> bool {
        // Recompute string-nesting up to byte_offset each time; inputs here
        // are small (single model-response JSON blobs), so O(n) rescans are
        // not a concern.
        let mut in_string = false;
        let mut escaped = false;
        for c in input[..byte_offset].chars() {
            if in_string {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    in_string = false;
                }
            } else if c == '"' {
                in_string = true;
            }
        }
        in_string
    };

    for caps in re.captures_iter(input) {
        let whole = caps.get(0).unwrap();
        if in_string_before(whole.start()) {
            continue;
        }
        out.push_str(&input[last_end..whole.start()]);
        let prefix = &caps["prefix"];
        let key = &caps["key"];
        out.push_str(prefix);
        out.push('"');
        out.push_str(key);
        out.push_str("\":");
        last_end = whole.end();
    }
    out.push_str(&input[last_end..]);
    out
}

/// Extract the first balanced `{...}` substring, tolerating surrounding
/// prose and nested braces inside string literals.
#[must_use]
pub fn extract_first_brace_object(input: &str) -> Option<&str> {
    let bytes = input.as_bytes();
    let start = input.find('{')?;
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        let c = b as char;
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&input[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Run the full repair pipeline: trailing commas, then unquoted keys.
#[must_use]
pub fn repair(input: &str) -> String {
    quote_unquoted_keys(&strip_trailing_commas(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_comma_before_closing_brace() {
        assert_eq!(
            strip_trailing_commas(r#"{"a": 1, "b": 2,}"#),
            r#"{"a": 1, "b": 2}"#
        );
    }

    #[test]
    fn leaves_commas_inside_strings_alone() {
        let input = r#"{"a": "one, two,"}"#;
        assert_eq!(strip_trailing_commas(input), input);
    }

    #[test]
    fn quotes_bare_keys() {
        assert_eq!(quote_unquoted_keys(r#"{a: 1, b: 2}"#), r#"{"a": 1, "b": 2}"#);
    }

    #[test]
    fn extracts_first_balanced_object_from_prose() {
        let input = "Sure, here you go: {\"valid\": true, \"nested\": {\"x\": 1}} thanks!";
        assert_eq!(
            extract_first_brace_object(input),
            Some(r#"{"valid": true, "nested": {"x": 1}}"#)
        );
    }
}
