//! [`Engine`]: the entry point wiring the catalog, the three role-tagged
//! model clients, and the four components into the node graph.

use std::sync::Arc;

use chrono::Utc;

use crate::catalog::{CatalogStore, DefectSelection};
use crate::components::{CodeEvaluator, CodeGenerator, ReportGenerator, ReviewGrader};
use crate::event_bus::{EventBus, EventEmitter, WorkflowEvent};
use crate::model::RoleBoundClients;
use crate::types::{Locale, Phase, WorkflowStep};
use crate::workflow::error::{SetupError, ValidationError};
use crate::workflow::nodes::{self, NodeOutcome};
use crate::workflow::state::{GenerationParams, ReviewLimits, SessionId, StatusView, WorkflowState};

/// Composes the shared, read-only catalog and components, plus an event
/// emitter for node diagnostics. Cheap to clone (everything inside is an
/// `Arc`); one instance is typically shared across every workflow run in a
/// process.
#[derive(Clone)]
pub struct Engine {
    catalog: Arc<CatalogStore>,
    pub(crate) generator: CodeGenerator,
    pub(crate) evaluator: CodeEvaluator,
    pub(crate) grader: ReviewGrader,
    pub(crate) report: ReportGenerator,
    emitter: Arc<dyn EventEmitter>,
}

impl Engine {
    #[must_use]
    pub fn new(catalog: Arc<CatalogStore>, clients: RoleBoundClients) -> Self {
        Self::with_emitter(catalog, clients, EventBus::disconnected().as_emitter())
    }

    #[must_use]
    pub fn with_emitter(catalog: Arc<CatalogStore>, clients: RoleBoundClients, emitter: Arc<dyn EventEmitter>) -> Self {
        Self {
            generator: CodeGenerator::new(catalog.clone(), clients.generative),
            evaluator: CodeEvaluator::new(clients.review.clone()),
            grader: ReviewGrader::new(clients.review),
            report: ReportGenerator::new(clients.summary),
            catalog,
            emitter,
        }
    }

    pub(crate) fn emit(&self, state: &WorkflowState, scope: &str, message: impl Into<String>) {
        self.emitter.emit(WorkflowEvent {
            session_id: state.session_id.to_string(),
            step: state.current_step,
            scope: scope.to_string(),
            message: message.into(),
        });
    }

    /// `NewWorkflow`: constructs state without invoking any model.
    ///
    /// `existing_artifact` is required exactly when `phase = review` and
    /// forbidden otherwise — an additive parameter, since `phase = review`'s
    /// "runs only review loop over a pre-existing artifact" is otherwise
    /// unsatisfiable (see DESIGN.md).
    pub fn new_workflow(
        &self,
        selection: DefectSelection,
        generation: GenerationParams,
        limits: ReviewLimits,
        locale: Locale,
        phase: Phase,
        existing_artifact: Option<crate::components::CodeArtifact>,
    ) -> Result<(SessionId, WorkflowState), SetupError> {
        match (phase, existing_artifact.is_some()) {
            (Phase::Review, false) => return Err(SetupError::ArtifactPhaseMismatch { phase: "review" }),
            (Phase::Generation, true) => return Err(SetupError::ArtifactPhaseMismatch { phase: "generation" }),
            (Phase::Full, true) => return Err(SetupError::ArtifactPhaseMismatch { phase: "full" }),
            _ => {}
        }
        // Fail fast: an unresolvable selection (unknown defect code/category)
        // must surface from NewWorkflow, not mid-workflow on first Advance.
        self.catalog.resolve_selection(&selection)?;

        let session_id = SessionId::new();
        let current_step = if existing_artifact.is_some() { WorkflowStep::Review } else { WorkflowStep::Generate };
        let state = WorkflowState {
            session_id: session_id.clone(),
            created_at: Utc::now(),
            phase,
            current_step,
            selection,
            generation,
            locale,
            max_iterations: limits.max_iterations,
            max_evaluation_attempts: limits.max_evaluation_attempts,
            evaluation_attempts: 0,
            current_iteration: 1,
            code_artifact: existing_artifact,
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
        Ok((session_id, state))
    }

    /// `Advance`: executes nodes until a suspension point or terminal
    /// state is reached.
    pub async fn advance(&self, mut state: WorkflowState) -> WorkflowState {
        if state.is_terminal() {
            return state;
        }
        // Suspension fixed point: no point even entering the loop.
        if state.current_step == WorkflowStep::Review && state.pending_review.is_none() {
            return state;
        }

        let budget = state.max_evaluation_attempts + state.max_iterations + 5;
        for _ in 0..budget {
            if state.is_terminal() {
                break;
            }
            let outcome = match state.current_step {
                WorkflowStep::Generate => nodes::generate_code(self, &mut state).await,
                WorkflowStep::Evaluate => nodes::evaluate_code(self, &mut state).await,
                WorkflowStep::Regenerate => nodes::regenerate_code(self, &mut state).await,
                WorkflowStep::Review => nodes::review_code(&mut state),
                WorkflowStep::Analyze => nodes::analyze_review(self, &mut state).await,
                WorkflowStep::Report => nodes::generate_comparison_report(self, &mut state).await,
                WorkflowStep::Summarize => nodes::generate_summary(&mut state),
                WorkflowStep::Complete => break,
            };
            if outcome == NodeOutcome::Halt {
                break;
            }
        }
        state
    }

    /// `SubmitReview`: validates, attaches the review, then resumes
    /// `Advance` — never mutates `state` on a validation failure.
    pub async fn submit_review(&self, state: WorkflowState, review_text: &str) -> Result<WorkflowState, ValidationError> {
        if state.is_terminal() {
            return Err(ValidationError::AlreadyTerminal);
        }
        if state.current_step != WorkflowStep::Review {
            return Err(ValidationError::WrongStep);
        }
        let trimmed = review_text.trim();
        if trimmed.len() < 10 {
            return Err(ValidationError::ReviewTooShort);
        }

        let mut next = state;
        next.pending_review = Some(trimmed.to_string());
        Ok(self.advance(next).await)
    }

    /// `Cancel`: terminal, distinguishable from a `ModelError` by
    /// `error = "cancelled"`.
    #[must_use]
    pub fn cancel(&self, mut state: WorkflowState) -> WorkflowState {
        state.error = Some("cancelled".to_string());
        state.current_step = WorkflowStep::Complete;
        state
    }

    /// `Status`: derived projection, no mutation.
    #[must_use]
    pub fn status(&self, state: &WorkflowState) -> StatusView {
        state.status()
    }
}
