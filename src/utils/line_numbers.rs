//! Line-number prepending/stripping used by the evaluation and
//! review-analysis prompts.
//!
//! 1-based, right-aligned, width = ceil(log10(N+1)).

/// Width needed to right-align line numbers 1..=line_count.
#[must_use]
pub fn number_width(line_count: usize) -> usize {
    if line_count == 0 {
        return 1;
    }
    ((line_count + 1) as f64).log10().ceil() as usize
}

/// Prepend ` N | ` to every line, right-aligning `N` to the code's width.
#[must_use]
pub fn prepend_line_numbers(code: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();
    let width = number_width(lines.len()).max(1);
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$} | {}", i + 1, line, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reverse of [`prepend_line_numbers`]: strip the `^\s*\d+\s*\|\s` prefix
/// from each line, recovering the original input.
#[must_use]
pub fn strip_line_numbers(numbered: &str) -> String {
    let re = regex::Regex::new(r"^\s*\d+\s*\|\s?").expect("static regex is valid");
    numbered
        .lines()
        .map(|line| re.replace(line, "").into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_prepend_and_strip() {
        let code = "fn main() {\n    println!(\"hi\");\n}";
        let numbered = prepend_line_numbers(code);
        assert_eq!(strip_line_numbers(&numbered), code);
    }

    #[test]
    fn right_aligns_to_widest_number() {
        let code = (1..=11).map(|i| format!("line{i}")).collect::<Vec<_>>().join("\n");
        let numbered = prepend_line_numbers(&code);
        let first_line = numbered.lines().next().unwrap();
        assert_eq!(first_line, " 1 | line1");
        let last_line = numbered.lines().last().unwrap();
        assert_eq!(last_line, "11 | line11");
    }
}
