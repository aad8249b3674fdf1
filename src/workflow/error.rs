//! Workflow-level error taxonomy: `SetupError` and `ValidationError`
//! are the only two kinds that ever return an `Err` across the Engine API
//! boundary. Everything else is represented as `WorkflowState.error`.

use miette::Diagnostic;
use thiserror::Error;

use crate::catalog::CatalogError;

/// Returned from [`crate::workflow::Engine::new_workflow`]. The workflow
/// never begins when this is returned.
#[derive(Debug, Error, Diagnostic)]
pub enum SetupError {
    #[error("catalog setup failed: {0}")]
    #[diagnostic(code(reviewloom::workflow::catalog_setup))]
    Catalog(#[from] CatalogError),

    /// `phase = Review` requires a pre-existing artifact; `phase` other
    /// than `Review` must not supply one. Neither is a named parameter of
    /// `NewWorkflow` on its own, but "review: runs only review loop over a
    /// pre-existing artifact" is otherwise unsatisfiable — resolved here as
    /// an additive `existing_artifact` parameter (see DESIGN.md).
    #[error("phase=review requires an existing code artifact; phase={phase} must not supply one")]
    #[diagnostic(code(reviewloom::workflow::artifact_phase_mismatch))]
    ArtifactPhaseMismatch { phase: &'static str },
}

/// Returned from [`crate::workflow::Engine::submit_review`] without
/// mutating state.
#[derive(Debug, Error, Diagnostic)]
pub enum ValidationError {
    #[error("submit_review called while current_step is not 'review'")]
    #[diagnostic(
        code(reviewloom::workflow::wrong_step),
        help("Call Status(state) to see the current step before retrying.")
    )]
    WrongStep,

    #[error("review text is empty or shorter than 10 characters after trimming")]
    #[diagnostic(code(reviewloom::workflow::review_too_short))]
    ReviewTooShort,

    #[error("workflow has already reached a terminal state")]
    #[diagnostic(code(reviewloom::workflow::terminal))]
    AlreadyTerminal,
}
