//! `WorkflowState` and its satellite types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::DefectSelection;
use crate::components::{CodeArtifact, ComparisonReport, EvaluationResult, ReviewAnalysis};
use crate::types::{Difficulty, LengthBucket, Locale, Phase, WorkflowStep};

/// Opaque identifier for one workflow instance. Newtype over a UUID so it
/// can't be confused with any other `String`-typed id in the crate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bounds on the two retry loops.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ReviewLimits {
    pub max_iterations: u32,
    pub max_evaluation_attempts: u32,
}

impl Default for ReviewLimits {
    fn default() -> Self {
        Self {
            max_iterations: 3,
            max_evaluation_attempts: 3,
        }
    }
}

/// The generation-specific parameters `NewWorkflow` needs beyond
/// `DefectSelection` — length, difficulty, locale, domain — bundled here
/// rather than threaded as individual top-level `NewWorkflow` parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationParams {
    pub length: LengthBucket,
    pub difficulty: Difficulty,
    pub domain: Option<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            length: LengthBucket::Medium,
            difficulty: Difficulty::Medium,
            domain: None,
        }
    }
}

/// One learner submission.
///
/// `analysis` and `guidance` start `None` and are attached exactly once by
/// `analyze_review` — never overwritten afterward.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewAttempt {
    pub iteration_number: u32,
    pub review_text: String,
    pub analysis: Option<ReviewAnalysis>,
    pub guidance: Option<String>,
}

/// Derived projection returned by `Status`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusView {
    pub step: WorkflowStep,
    pub phase: Phase,
    pub has_artifact: bool,
    pub evaluation_attempts: u32,
    pub current_iteration: u32,
    pub review_sufficient: bool,
    pub has_error: bool,
}

/// The complete, serializable workflow instance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowState {
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,

    pub phase: Phase,
    pub current_step: WorkflowStep,

    pub selection: DefectSelection,
    pub generation: GenerationParams,
    pub locale: Locale,

    pub max_iterations: u32,
    pub max_evaluation_attempts: u32,
    pub evaluation_attempts: u32,
    pub current_iteration: u32,

    pub code_artifact: Option<CodeArtifact>,
    pub evaluation_result: Option<EvaluationResult>,
    /// The full regeneration prompt text built by the prior `evaluate_code`
    ///.
    pub regeneration_feedback: Option<String>,
    /// Set only when the most recent evaluation attempt failed because the
    /// model invocation itself errored (as opposed to a tolerable JSON
    /// parse failure). Consumed by `evaluate_code` once attempts are
    /// exhausted to decide whether to surface a terminal `ModelError`
    /// rather than proceed to `review_code`.
    pub last_model_error: Option<String>,

    pub review_history: Vec<ReviewAttempt>,
    pub pending_review: Option<String>,
    pub review_sufficient: bool,

    pub comparison_report: Option<ComparisonReport>,
    pub summary_text: Option<String>,

    pub error: Option<String>,
}

impl WorkflowState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.current_step == WorkflowStep::Complete || self.error.is_some()
    }

    #[must_use]
    pub fn status(&self) -> StatusView {
        StatusView {
            step: self.current_step,
            phase: self.phase,
            has_artifact: self.code_artifact.is_some(),
            evaluation_attempts: self.evaluation_attempts,
            current_iteration: self.current_iteration,
            review_sufficient: self.review_sufficient,
            has_error: self.error.is_some(),
        }
    }

    /// The manifest defects an evaluation/review cycle is scored against —
    /// empty if no artifact exists yet.
    #[must_use]
    pub fn manifest(&self) -> &[crate::catalog::Defect] {
        self.code_artifact.as_ref().map_or(&[], |a| a.manifest.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_view_reflects_state() {
        let state = WorkflowState {
            session_id: SessionId::new(),
            created_at: Utc::now(),
            phase: Phase::Full,
            current_step: WorkflowStep::Review,
            selection: DefectSelection::explicit(vec!["x".into()]).unwrap(),
            generation: GenerationParams::default(),
            locale: Locale::En,
            max_iterations: 3,
            max_evaluation_attempts: 3,
            evaluation_attempts: 1,
            current_iteration: 1,
            code_artifact: None,
            evaluation_result: None,
            regeneration_feedback: None,
            last_model_error: None,
            review_history: Vec::new(),
            pending_review: None,
            review_sufficient: false,
            comparison_report: None,
            summary_text: None,
            error: None,
        };
        let status = state.status();
        assert_eq!(status.step, WorkflowStep::Review);
        assert!(!status.has_artifact);
        assert!(!status.has_error);
    }
}
