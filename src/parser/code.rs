//! Two-code-variant extraction from a generation/regeneration response
//!.

use regex::Regex;

/// `// ERROR N: <name>` marker comments, matched wherever they appear on a
/// line — as a standalone comment line or trailing after code.
fn marker_pattern() -> Regex {
    Regex::new(r"//\s*ERROR\s+\d+:").expect("static regex is valid")
}

/// The annotated and clean variants extracted from one model response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeVariants {
    pub annotated: String,
    pub clean: String,
}

/// Extract all fenced code blocks (` ``` `, optionally language-tagged) from
/// `response`, in order of appearance.
fn fenced_blocks(response: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut lines = response.lines().peekable();
    while let Some(line) = lines.next() {
        if line.trim_start().starts_with("```") {
            let mut body = Vec::new();
            for inner in lines.by_ref() {
                if inner.trim_start().starts_with("```") {
                    break;
                }
                body.push(inner);
            }
            blocks.push(body.join("\n"));
        }
    }
    blocks
}

/// Strip every line matching the `// ERROR N: name` marker pattern,
/// recovering what the clean variant would look like.
#[must_use]
pub fn strip_markers(annotated: &str) -> String {
    let marker = marker_pattern();
    annotated
        .lines()
        .filter(|line| !marker.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract the annotated/clean pair by a layered rule:
/// - >= 2 fenced blocks: first is annotated, second is clean.
/// - exactly 1: use it for both.
/// - 0: treat the whole response as annotated, derive clean by stripping
///   markers.
#[must_use]
pub fn extract_code_variants(response: &str) -> CodeVariants {
    let blocks = fenced_blocks(response);
    match blocks.len() {
        0 => CodeVariants {
            clean: strip_markers(response),
            annotated: response.to_string(),
        },
        1 => CodeVariants {
            annotated: blocks[0].clone(),
            clean: blocks[0].clone(),
        },
        _ => CodeVariants {
            annotated: blocks[0].clone(),
            clean: blocks[1].clone(),
        },
    }
}
