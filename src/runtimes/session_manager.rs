//! Ties [`Engine`] to a [`Checkpointer`] so a workflow instance can be
//! looked up by [`SessionId`] and resumed across process boundaries.
//!
//! `Engine` itself is stateless between calls — every method takes and
//! returns a `WorkflowState` by value. `SessionManager` is the thin,
//! optional layer that does the "look up by id, save after every advance"
//! bookkeeping a host process needs; nothing here is required to use the
//! engine directly.

use miette::Diagnostic;
use thiserror::Error;

use crate::catalog::DefectSelection;
use crate::components::CodeArtifact;
use crate::runtimes::checkpointer::{Checkpoint, Checkpointer, CheckpointerError};
use crate::types::{Locale, Phase};
use crate::workflow::engine::Engine;
use crate::workflow::error::{SetupError, ValidationError};
use crate::workflow::state::{GenerationParams, ReviewLimits, SessionId, StatusView};

#[derive(Debug, Error, Diagnostic)]
pub enum SessionManagerError {
    #[error("session not found: {session_id}")]
    #[diagnostic(code(reviewloom::session_manager::not_found))]
    NotFound { session_id: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Checkpointer(#[from] CheckpointerError),
}

/// Owns nothing workflow-specific itself — just an `Engine` and a
/// `Checkpointer` — so it is cheap to construct per request and share
/// behind an `Arc` across a host process.
pub struct SessionManager<C: Checkpointer> {
    engine: Engine,
    checkpointer: C,
}

impl<C: Checkpointer> SessionManager<C> {
    #[must_use]
    pub fn new(engine: Engine, checkpointer: C) -> Self {
        Self { engine, checkpointer }
    }

    /// `NewWorkflow` + immediate `Advance`, checkpointed after the first
    /// suspension/terminal boundary is reached.
    pub async fn create_session(
        &self,
        selection: DefectSelection,
        generation: GenerationParams,
        limits: ReviewLimits,
        locale: Locale,
        phase: Phase,
        existing_artifact: Option<CodeArtifact>,
    ) -> Result<SessionId, SessionManagerError> {
        let (session_id, state) = self
            .engine
            .new_workflow(selection, generation, limits, locale, phase, existing_artifact)?;
        let state = self.engine.advance(state).await;
        self.checkpointer.save(Checkpoint::new(state)).await?;
        Ok(session_id)
    }

    async fn load(&self, session_id: &SessionId) -> Result<crate::workflow::state::WorkflowState, SessionManagerError> {
        self.checkpointer
            .load_latest(session_id)
            .await?
            .map(|cp| cp.state)
            .ok_or_else(|| SessionManagerError::NotFound {
                session_id: session_id.to_string(),
            })
    }

    /// `SubmitReview` against the persisted state, re-saving the
    /// result regardless of whether it suspended again or completed.
    pub async fn submit_review(&self, session_id: &SessionId, review_text: &str) -> Result<StatusView, SessionManagerError> {
        let state = self.load(session_id).await?;
        let state = self.engine.submit_review(state, review_text).await?;
        let status = state.status();
        self.checkpointer.save(Checkpoint::new(state)).await?;
        Ok(status)
    }

    /// `Cancel` against the persisted state.
    pub async fn cancel(&self, session_id: &SessionId) -> Result<StatusView, SessionManagerError> {
        let state = self.load(session_id).await?;
        let state = self.engine.cancel(state);
        let status = state.status();
        self.checkpointer.save(Checkpoint::new(state)).await?;
        Ok(status)
    }

    /// `Status` against the persisted state, without advancing it.
    pub async fn status(&self, session_id: &SessionId) -> Result<StatusView, SessionManagerError> {
        let state = self.load(session_id).await?;
        Ok(self.engine.status(&state))
    }
}
