//! Checkpointer infrastructure.
//!
//! `WorkflowState` is already `Serialize`/`Deserialize`, so a checkpoint is nothing more than that state plus the
//! timestamp it was saved at. This module only needs a trait for pluggable
//! backends and the volatile in-memory one; [`checkpointer_sqlite`] supplies
//! the durable one behind the `sqlite` feature.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use miette::Diagnostic;
use rustc_hash::FxHashMap;
use std::sync::RwLock;
use thiserror::Error;

use crate::workflow::state::{SessionId, WorkflowState};

/// A durable snapshot of one workflow instance at a suspension/terminal
/// boundary.
#[derive(Clone, Debug)]
pub struct Checkpoint {
    pub session_id: SessionId,
    pub state: WorkflowState,
    pub saved_at: DateTime<Utc>,
}

impl Checkpoint {
    #[must_use]
    pub fn new(state: WorkflowState) -> Self {
        Self {
            session_id: state.session_id.clone(),
            state,
            saved_at: Utc::now(),
        }
    }
}

/// Errors from checkpointer operations.
#[derive(Debug, Error, Diagnostic)]
pub enum CheckpointerError {
    /// Session was not found in the checkpointer.
    #[error("session not found: {session_id}")]
    #[diagnostic(
        code(reviewloom::checkpointer::not_found),
        help("Ensure the session was created with `save` before calling `load_latest`.")
    )]
    NotFound { session_id: String },

    /// Backend storage error (database, filesystem, etc.).
    #[error("checkpointer backend error: {message}")]
    #[diagnostic(code(reviewloom::checkpointer::backend))]
    Backend { message: String },

    /// Serialization/deserialization failure.
    #[error("checkpoint serialization error: {message}")]
    #[diagnostic(code(reviewloom::checkpointer::serde))]
    Serde { message: String },
}

pub type Result<T> = std::result::Result<T, CheckpointerError>;

/// Selects the backing implementation of the `Checkpointer` trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointerKind {
    /// Volatile, process-local storage. Fast, non-durable.
    InMemory,
    #[cfg(feature = "sqlite")]
    /// Durable, SQLite-backed storage (see [`crate::runtimes::checkpointer_sqlite`]).
    Sqlite,
}

/// Persistent storage and retrieval of suspended/terminal workflow state.
///
/// Implementations must ensure `save` is atomic and idempotent, and that
/// `load_latest` is consistent with the most recent `save` for a session —
/// this is what makes `review_code`'s suspension safe to checkpoint
/// across a process restart.
#[async_trait]
pub trait Checkpointer: Send + Sync {
    /// Persist (replacing any prior checkpoint for the same session).
    async fn save(&self, checkpoint: Checkpoint) -> Result<()>;

    /// Load the most recent checkpoint, or `None` if the session is unknown.
    async fn load_latest(&self, session_id: &SessionId) -> Result<Option<Checkpoint>>;

    /// All session ids with at least one stored checkpoint.
    async fn list_sessions(&self) -> Result<Vec<SessionId>>;

    /// Remove all checkpoints for a session. Idempotent: removing an
    /// already-absent session is not an error.
    async fn delete(&self, session_id: &SessionId) -> Result<()>;
}

/// Volatile in-memory checkpointer. Stores only the latest checkpoint per
/// session — sufficient for `WorkflowState`, which is itself a monotonic
/// snapshot rather than an append-only log.
#[derive(Default)]
pub struct InMemoryCheckpointer {
    inner: RwLock<FxHashMap<SessionId, Checkpoint>>,
}

impl InMemoryCheckpointer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(FxHashMap::default()),
        }
    }
}

#[async_trait]
impl Checkpointer for InMemoryCheckpointer {
    async fn save(&self, checkpoint: Checkpoint) -> Result<()> {
        let mut map = self.inner.write().map_err(|e| CheckpointerError::Backend {
            message: format!("lock poisoned: {e}"),
        })?;
        map.insert(checkpoint.session_id.clone(), checkpoint);
        Ok(())
    }

    async fn load_latest(&self, session_id: &SessionId) -> Result<Option<Checkpoint>> {
        let map = self.inner.read().map_err(|e| CheckpointerError::Backend {
            message: format!("lock poisoned: {e}"),
        })?;
        Ok(map.get(session_id).cloned())
    }

    async fn list_sessions(&self) -> Result<Vec<SessionId>> {
        let map = self.inner.read().map_err(|e| CheckpointerError::Backend {
            message: format!("lock poisoned: {e}"),
        })?;
        Ok(map.keys().cloned().collect())
    }

    async fn delete(&self, session_id: &SessionId) -> Result<()> {
        let mut map = self.inner.write().map_err(|e| CheckpointerError::Backend {
            message: format!("lock poisoned: {e}"),
        })?;
        map.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DefectSelection;
    use crate::types::{Phase, WorkflowStep};
    use crate::workflow::state::{GenerationParams, ReviewLimits};

    fn sample_state() -> WorkflowState {
        let limits = ReviewLimits::default();
        WorkflowState {
            session_id: SessionId::new(),
            created_at: Utc::now(),
            phase: Phase::Full,
            current_step: WorkflowStep::Review,
            selection: DefectSelection::explicit(vec!["x".into()]).unwrap(),
            generation: GenerationParams::default(),
            locale: crate::types::Locale::En,
            max_iterations: limits.max_iterations,
            max_evaluation_attempts: limits.max_evaluation_attempts,
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
        }
    }

    #[tokio::test]
    async fn round_trips_latest_checkpoint() {
        let cp = InMemoryCheckpointer::new();
        let state = sample_state();
        let id = state.session_id.clone();
        cp.save(Checkpoint::new(state.clone())).await.unwrap();

        let loaded = cp.load_latest(&id).await.unwrap().expect("present");
        assert_eq!(loaded.state.session_id, id);
        assert_eq!(cp.list_sessions().await.unwrap(), vec![id.clone()]);

        cp.delete(&id).await.unwrap();
        assert!(cp.load_latest(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_session_is_none_not_error() {
        let cp = InMemoryCheckpointer::new();
        assert!(cp.load_latest(&SessionId::new()).await.unwrap().is_none());
    }
}
