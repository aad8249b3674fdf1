//! The prompt builder: five pure, deterministic templates.
//!
//! Every function here takes its inputs by value/reference and returns a
//! `String`. No I/O, no hidden state — `PromptBuilder` itself holds nothing,
//! matching the Design Note "deep inheritance / mixins: none needed": this
//! is a plain struct, not a trait hierarchy.

pub mod locale_strings;

use crate::catalog::Defect;
use crate::types::{Difficulty, LengthBucket, Locale};
use crate::utils::line_numbers::prepend_line_numbers;
use locale_strings::t;

/// Stateless prompt assembler. Cheap to construct, cheap to clone (it's a
/// unit struct); components hold one of these alongside their catalog and
/// model-client handles.
#[derive(Clone, Copy, Debug, Default)]
pub struct PromptBuilder;

/// Thresholds quoted in the review-analysis prompt. These never gate engine
/// branching — they exist only as wording the model sees; the engine's
/// canonical signal is `review_sufficient` in the parsed verdict (see
/// DESIGN.md for the reasoning).
#[derive(Clone, Copy, Debug)]
pub struct ReviewThresholds {
    pub meaningful: f64,
    pub accuracy: f64,
}

impl Default for ReviewThresholds {
    fn default() -> Self {
        Self {
            meaningful: 0.6,
            accuracy: 0.7,
        }
    }
}

fn prefix(locale: Locale) -> String {
    format!("{}\n\n", t(locale, "instruction_prefix"))
}

fn defect_list_block(defects: &[Defect], locale: Locale) -> String {
    defects
        .iter()
        .enumerate()
        .map(|(i, d)| format!("{}. {} — {}", i + 1, d.display_name(locale), d.description(locale)))
        .collect::<Vec<_>>()
        .join("\n")
}

impl PromptBuilder {
    /// **code_generation**: instructs the model to emit two fenced
    /// code blocks, annotated then clean.
    #[must_use]
    pub fn code_generation(
        &self,
        length: LengthBucket,
        difficulty: Difficulty,
        defects: &[Defect],
        domain: &str,
        expected_count: usize,
        locale: Locale,
    ) -> String {
        let (classes, methods, loc) = length.structural_hint();
        let mut out = prefix(locale);
        out.push_str(t(locale, "code_generation_intro"));
        out.push_str("\n\n");
        out.push_str(&format!(
            "Domain: {domain}\nDifficulty: {difficulty}\nStructure: {classes}, {methods}, {loc}\nExpected defect count: {expected_count}\n\n"
        ));
        out.push_str("Defects to seed, each at exactly one site:\n");
        out.push_str(&defect_list_block(defects, locale));
        out.push_str("\n\n");
        out.push_str(t(locale, "code_generation_annotated_label"));
        out.push('\n');
        out.push_str(t(locale, "code_generation_clean_label"));
        out.push_str("\n\nFormat each variant as a fenced ```java code block.\n");
        out
    }

    /// **evaluation**: line-numbers the code and demands a JSON
    /// verdict.
    #[must_use]
    pub fn evaluation(&self, annotated_code: &str, expected: &[Defect], expected_count: usize, locale: Locale) -> String {
        let mut out = prefix(locale);
        out.push_str(t(locale, "evaluation_intro"));
        out.push_str(&format!("\n\nExpected defect count: {expected_count}\n\nExpected defects:\n"));
        out.push_str(&defect_list_block(expected, locale));
        out.push_str("\n\nCode (line-numbered):\n");
        out.push_str(&prepend_line_numbers(annotated_code));
        out.push_str("\n\n");
        out.push_str(t(locale, "evaluation_json_demand"));
        out
    }

    /// **regeneration**: asks the model to preserve found defects and
    /// inject the missing ones into the existing artifact.
    #[must_use]
    pub fn regeneration(
        &self,
        current_code: &str,
        domain: &str,
        missing: &[Defect],
        found: &[Defect],
        full_requested: &[Defect],
        locale: Locale,
    ) -> String {
        let mut out = prefix(locale);
        out.push_str(t(locale, "regeneration_intro"));
        out.push_str(&format!("\n\nDomain: {domain}\n\n"));
        out.push_str("Defects already present — keep these exactly as-is:\n");
        out.push_str(&defect_list_block(found, locale));
        out.push_str("\n\nDefects missing — inject these:\n");
        out.push_str(&defect_list_block(missing, locale));
        out.push_str("\n\nFull requested defect list (for reference):\n");
        out.push_str(&defect_list_block(full_requested, locale));
        out.push_str("\n\nCurrent code:\n```java\n");
        out.push_str(current_code);
        out.push_str("\n```\n\n");
        out.push_str(t(locale, "code_generation_annotated_label"));
        out.push('\n');
        out.push_str(t(locale, "code_generation_clean_label"));
        out.push('\n');
        out
    }

    /// **review_analysis**: grades a learner's free-form review
    /// against the ground truth.
    #[must_use]
    pub fn review_analysis(
        &self,
        code: &str,
        manifest: &[Defect],
        review_text: &str,
        thresholds: ReviewThresholds,
        locale: Locale,
    ) -> String {
        let mut out = prefix(locale);
        out.push_str(t(locale, "review_analysis_intro"));
        out.push_str(&format!(
            "\n\nThresholds (informational only — wording hint, not a hard gate): meaningful >= {:.1}, accuracy >= {:.1}\n\n",
            thresholds.meaningful, thresholds.accuracy
        ));
        out.push_str("Ground-truth defects:\n");
        out.push_str(&defect_list_block(manifest, locale));
        out.push_str("\n\nCode (line-numbered):\n");
        out.push_str(&prepend_line_numbers(code));
        out.push_str("\n\nLearner review:\n");
        out.push_str(review_text);
        out.push_str("\n\n");
        out.push_str(t(locale, "review_analysis_json_demand"));
        out
    }

    /// **comparison_report**: the final summary prompt.
    #[must_use]
    pub fn comparison_report(
        &self,
        evaluation_defects: &[Defect],
        latest_analysis_summary: &str,
        review_history_summary: &str,
        locale: Locale,
    ) -> String {
        let mut out = prefix(locale);
        out.push_str(t(locale, "comparison_report_intro"));
        out.push_str("\n\nDefects in scope:\n");
        out.push_str(&defect_list_block(evaluation_defects, locale));
        out.push_str(&format!("\n\nLatest analysis:\n{latest_analysis_summary}\n\nReview history:\n{review_history_summary}\n\n"));
        out.push_str(
            "Respond with a single JSON object with keys: performance_summary, correctly_identified, missed, improvement_tips, language_specific_guidance, encouragement, detailed_feedback.",
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Locale;
    use crate::utils::Localized;

    fn defect(code: &str) -> Defect {
        Defect {
            code: code.to_string(),
            category_code: "logical".into(),
            display_name: Localized::en_only(code.to_string()),
            description: Localized::en_only("desc".into()),
            implementation_guide: Localized::en_only("guide".into()),
            difficulty: Difficulty::Medium,
            usage_count: 0,
        }
    }

    #[test]
    fn code_generation_prompt_contains_structural_hint_and_defects() {
        let builder = PromptBuilder;
        let defects = vec![defect("off_by_one")];
        let prompt = builder.code_generation(LengthBucket::Short, Difficulty::Easy, &defects, "banking", 1, Locale::En);
        assert!(prompt.contains("15-30 lines"));
        assert!(prompt.contains("off_by_one"));
        assert!(prompt.contains("banking"));
    }

    #[test]
    fn evaluation_prompt_line_numbers_the_code() {
        let builder = PromptBuilder;
        let prompt = builder.evaluation("a\nb", &[defect("x")], 1, Locale::En);
        assert!(prompt.contains("1 | a"));
        assert!(prompt.contains("2 | b"));
    }

    #[test]
    fn review_analysis_prompt_embeds_review_text_and_thresholds() {
        let builder = PromptBuilder;
        let prompt = builder.review_analysis("code", &[defect("x")], "Line 1: bug here", ReviewThresholds::default(), Locale::En);
        assert!(prompt.contains("Line 1: bug here"));
        assert!(prompt.contains("0.6"));
    }
}
