//! Code Evaluator: verifies an artifact actually realizes its
//! manifest, and synthesises the regeneration prompt when it doesn't.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Defect;
use crate::components::generator::CodeArtifact;
use crate::model::{ModelClient, ModelError};
use crate::parser::json::{get_bool, get_str_array, parse_with_known_keys};
use crate::prompt::PromptBuilder;
use crate::types::Locale;

/// Verdict on whether an artifact realizes its manifest.
///
/// `found` and `missing` always partition `manifest` exactly: `found ∩
/// missing = ∅`, `found ∪ missing = manifest`,
/// regardless of what the model's own `found_errors`/`missing_errors`
/// claimed — [`CodeEvaluator::evaluate`] recomputes `missing` from `manifest
/// - found` rather than trusting the model's `missing_errors` directly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub found: Vec<Defect>,
    pub missing: Vec<Defect>,
    pub valid: bool,
    pub feedback: String,
}

/// Composes the prompt builder and the `review` model client.
#[derive(Clone)]
pub struct CodeEvaluator {
    prompts: PromptBuilder,
    client: Arc<dyn ModelClient>,
}

fn names_match(reported: &str, defect: &Defect, locale: Locale) -> bool {
    let reported = reported.trim().to_lowercase();
    if reported.is_empty() {
        return false;
    }
    let candidates = [defect.display_name(locale).to_lowercase(), defect.code.to_lowercase()];
    candidates.iter().any(|c| c == &reported || reported.contains(c) || c.contains(&reported))
}

impl CodeEvaluator {
    #[must_use]
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            prompts: PromptBuilder,
            client,
        }
    }

    /// Returns `Err` only when the model invocation itself failed or came
    /// back empty — a malformed-but-present response degrades
    /// locally into `Ok` with `feedback: "evaluation parse failed"`, never an `Err`. The engine's `evaluate_code` node relies on
    /// this split to decide whether attempts-exhausted should surface a
    /// terminal `ModelError` rather than proceed to `review_code`.
    #[tracing::instrument(skip(self, artifact))]
    pub async fn evaluate(&self, artifact: &CodeArtifact, locale: Locale) -> Result<EvaluationResult, ModelError> {
        let prompt = self.prompts.evaluation(
            &artifact.annotated,
            &artifact.manifest,
            artifact.expected_count,
            locale,
        );

        let response = self.client.invoke(&prompt).await?;
        if response.trim().is_empty() {
            return Err(ModelError::EmptyResponse { role: self.client.role() });
        }

        let value = parse_with_known_keys(&response, &["found_errors", "missing_errors", "valid", "feedback"]);
        if value.get("error").is_some() && value.get("found_errors").is_none() && value.get("valid").is_none() {
            return Ok(Self::parse_failure_result(&artifact.manifest));
        }

        let reported_found = get_str_array(&value, &["found_errors"]);
        let found: Vec<Defect> = artifact
            .manifest
            .iter()
            .filter(|d| reported_found.iter().any(|r| names_match(r, d, locale)))
            .cloned()
            .collect();
        let found_codes: std::collections::HashSet<_> = found.iter().map(|d| d.code.clone()).collect();
        let missing: Vec<Defect> = artifact
            .manifest
            .iter()
            .filter(|d| !found_codes.contains(&d.code))
            .cloned()
            .collect();

        let feedback = value
            .get("feedback")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let _model_claimed_valid = get_bool(&value, &["valid"]).unwrap_or(false);

        Ok(EvaluationResult {
            valid: missing.is_empty(),
            found,
            missing,
            feedback,
        })
    }

    fn parse_failure_result(manifest: &[Defect]) -> EvaluationResult {
        EvaluationResult {
            found: Vec::new(),
            missing: manifest.to_vec(),
            valid: false,
            feedback: "evaluation parse failed".to_string(),
        }
    }

    /// Build the regeneration prompt the engine hands back to the
    /// `generative` client on the next turn.
    #[must_use]
    pub fn build_regeneration_feedback(&self, artifact: &CodeArtifact, evaluation: &EvaluationResult, locale: Locale) -> String {
        self.prompts.regeneration(
            &artifact.clean,
            &artifact.domain,
            &evaluation.missing,
            &evaluation.found,
            &artifact.manifest,
            locale,
        )
    }
}
