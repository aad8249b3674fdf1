//! Review Grader: compares a learner's written review to the
//! ground-truth defect manifest, and generates targeted guidance.

use std::sync::Arc;

use miette::Diagnostic;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Defect;
use crate::components::generator::CodeArtifact;
use crate::model::{ModelClient, ModelError};
use crate::parser::json::{get_str_array, parse_with_known_keys};
use crate::prompt::{PromptBuilder, ReviewThresholds};
use crate::types::Locale;

#[derive(Debug, Error, Diagnostic)]
pub enum GraderError {
    #[error("review text is empty after trimming")]
    #[diagnostic(
        code(reviewloom::grader::empty_review),
        help("SubmitReview should have already rejected this; AnalyzeReview re-validates defensively.")
    )]
    EmptyReview,

    /// Review-grading model failures surface immediately — unlike
    /// evaluation, there is no retry loop over `analyze_review`.
    #[error(transparent)]
    #[diagnostic(code(reviewloom::grader::model))]
    Model(#[from] ModelError),
}

/// A manifest defect the learner's review correctly called out.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdentifiedDefect {
    pub defect_code: String,
    pub justification: Option<String>,
}

/// A manifest defect the learner's review did not mention.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MissedDefect {
    pub defect_code: String,
    pub hint: Option<String>,
}

/// Graded review.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewAnalysis {
    pub identified: Vec<IdentifiedDefect>,
    pub missed: Vec<MissedDefect>,
    pub identified_count: usize,
    pub total_problems: usize,
    pub accuracy: f64,
    pub sufficient: bool,
    /// Set when the review text failed the `(Line|行)\s*\d+\s*[:：]` format
    /// check — the model was never invoked in that case.
    pub format_invalid: bool,
}

fn format_pattern() -> Regex {
    Regex::new(r"(Line|行)\s*\d+\s*[:：]").expect("static regex is valid")
}

/// Composes the prompt builder and the `review` model client.
#[derive(Clone)]
pub struct ReviewGrader {
    prompts: PromptBuilder,
    client: Arc<dyn ModelClient>,
    thresholds: ReviewThresholds,
}

fn names_match(reported: &str, defect: &Defect, locale: Locale) -> bool {
    let reported = reported.trim().to_lowercase();
    if reported.is_empty() {
        return false;
    }
    let candidates = [defect.display_name(locale).to_lowercase(), defect.code.to_lowercase()];
    candidates.iter().any(|c| c == &reported || reported.contains(c) || c.contains(&reported))
}

impl ReviewGrader {
    #[must_use]
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            prompts: PromptBuilder,
            client,
            thresholds: ReviewThresholds::default(),
        }
    }

    /// Validate the review is non-empty and contains at least one
    /// line-numbered reference, without invoking any model.
    #[must_use]
    pub fn is_format_valid(review_text: &str) -> bool {
        format_pattern().is_match(review_text)
    }

    #[tracing::instrument(skip(self, artifact, review_text))]
    pub async fn analyze_review(
        &self,
        artifact: &CodeArtifact,
        manifest: &[Defect],
        review_text: &str,
        locale: Locale,
    ) -> Result<ReviewAnalysis, GraderError> {
        let trimmed = review_text.trim();
        if trimmed.is_empty() {
            return Err(GraderError::EmptyReview);
        }

        let total_problems = manifest.len();
        if !Self::is_format_valid(trimmed) {
            return Ok(ReviewAnalysis {
                identified: Vec::new(),
                missed: manifest
                    .iter()
                    .map(|d| MissedDefect {
                        defect_code: d.code.clone(),
                        hint: None,
                    })
                    .collect(),
                identified_count: 0,
                total_problems,
                accuracy: if total_problems == 0 { 100.0 } else { 0.0 },
                sufficient: false,
                format_invalid: true,
            });
        }

        let prompt = self.prompts.review_analysis(&artifact.clean, manifest, trimmed, self.thresholds, locale);
        let response = self.client.invoke(&prompt).await?;

        let value = parse_with_known_keys(
            &response,
            &["identified_problems", "missed_problems", "identified_count", "total_problems"],
        );
        let reported_identified = get_str_array(&value, &["identified_problems"]);

        let identified: Vec<IdentifiedDefect> = manifest
            .iter()
            .filter(|d| reported_identified.iter().any(|r| names_match(r, d, locale)))
            .map(|d| IdentifiedDefect {
                defect_code: d.code.clone(),
                justification: None,
            })
            .collect();
        let identified_codes: std::collections::HashSet<_> = identified.iter().map(|i| i.defect_code.clone()).collect();
        let missed: Vec<MissedDefect> = manifest
            .iter()
            .filter(|d| !identified_codes.contains(&d.code))
            .map(|d| MissedDefect {
                defect_code: d.code.clone(),
                hint: None,
            })
            .collect();

        let identified_count = identified.len();
        let accuracy = if total_problems == 0 {
            100.0
        } else {
            (identified_count as f64 / total_problems as f64) * 100.0
        };
        let sufficient = total_problems > 0 && identified_count == total_problems;

        Ok(ReviewAnalysis {
            identified,
            missed,
            identified_count,
            total_problems,
            accuracy,
            sufficient,
            format_invalid: false,
        })
    }

    /// Build targeted guidance for the learner's next iteration. Empty string on invocation failure.
    #[tracing::instrument(skip(self, artifact, review_text, analysis))]
    pub async fn generate_guidance(
        &self,
        artifact: &CodeArtifact,
        manifest: &[Defect],
        review_text: &str,
        analysis: &ReviewAnalysis,
        iteration: u32,
        max_iterations: u32,
        locale: Locale,
    ) -> String {
        let missed_names: Vec<&str> = manifest
            .iter()
            .filter(|d| analysis.missed.iter().any(|m| m.defect_code == d.code))
            .map(|d| d.display_name(locale))
            .collect();
        let guidance_prompt = format!(
            "{}\n\nIteration {iteration} of {max_iterations}. The learner's review was:\n{review_text}\n\nDefects still missed: {}\n\nIn at most 4 sentences, give targeted guidance to help the learner find the missed defects on their next attempt.",
            self.prompts.review_analysis(&artifact.clean, manifest, review_text, self.thresholds, locale),
            missed_names.join(", "),
        );

        match self.client.invoke(&guidance_prompt).await {
            Ok(text) => truncate_to_sentences(text.trim(), 4),
            Err(_) => String::new(),
        }
    }
}

fn truncate_to_sentences(text: &str, max_sentences: usize) -> String {
    let mut sentences = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            sentences.push(current.trim().to_string());
            current.clear();
            if sentences.len() == max_sentences {
                break;
            }
        }
    }
    if sentences.is_empty() && !current.trim().is_empty() {
        return current.trim().to_string();
    }
    sentences.join(" ")
}
