//! Durable, SQLite-backed [`Checkpointer`] (behind the `sqlite` feature).
//!
//! The whole `WorkflowState` is already serde-serializable, so the schema is
//! deliberately small: one row per session holding the latest state as a
//! JSON blob. No migration crate is pulled in — the single table is created
//! with `CREATE TABLE IF NOT EXISTS` on connect, which is idempotent and
//! keeps the dependency footprint aligned with what this crate actually
//! needs (a single-table checkpoint store, not step-history or lineage).

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::instrument;

use crate::runtimes::checkpointer::{Checkpoint, Checkpointer, CheckpointerError, Result};
use crate::workflow::state::{SessionId, WorkflowState};

const CREATE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS reviewloom_sessions (
    session_id  TEXT PRIMARY KEY,
    state_json  TEXT NOT NULL,
    saved_at    TEXT NOT NULL
)";

/// Durable checkpointer backed by a SQLite connection pool.
///
/// Delete a session's row when its workflow completes or expires; this
/// checkpointer keeps only the latest state per session, mirroring
/// [`WorkflowState`]'s own "replaced, never mutated" artifact semantics.
pub struct SQLiteCheckpointer {
    pool: SqlitePool,
}

impl std::fmt::Debug for SQLiteCheckpointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SQLiteCheckpointer").finish()
    }
}

impl SQLiteCheckpointer {
    /// Connect (or create) a SQLite database at `database_url`, e.g.
    /// `sqlite://reviewloom.db` or `sqlite::memory:`.
    #[instrument(skip(database_url))]
    pub async fn connect(database_url: &str) -> std::result::Result<Self, CheckpointerError> {
        let pool = SqlitePool::connect(database_url).await.map_err(|e| CheckpointerError::Backend {
            message: format!("connect error: {e}"),
        })?;
        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .map_err(|e| CheckpointerError::Backend {
                message: format!("schema init error: {e}"),
            })?;
        Ok(Self { pool })
    }

    fn decode_row(session_id_raw: String, state_json: String, saved_at: String) -> Result<Checkpoint> {
        let state: WorkflowState = serde_json::from_str(&state_json).map_err(|e| CheckpointerError::Serde {
            message: format!("state deserialize: {e}"),
        })?;
        let saved_at: DateTime<Utc> = saved_at.parse().map_err(|e| CheckpointerError::Serde {
            message: format!("saved_at parse: {e}"),
        })?;
        let _ = session_id_raw; // authoritative id lives inside `state`, kept in the column for indexed lookups
        Ok(Checkpoint {
            session_id: state.session_id.clone(),
            state,
            saved_at,
        })
    }
}

#[async_trait::async_trait]
impl Checkpointer for SQLiteCheckpointer {
    #[instrument(skip(self, checkpoint), err)]
    async fn save(&self, checkpoint: Checkpoint) -> Result<()> {
        let state_json = serde_json::to_string(&checkpoint.state).map_err(|e| CheckpointerError::Serde {
            message: format!("state serialize: {e}"),
        })?;
        sqlx::query(
            "INSERT INTO reviewloom_sessions (session_id, state_json, saved_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(session_id) DO UPDATE SET state_json = excluded.state_json, saved_at = excluded.saved_at",
        )
        .bind(checkpoint.session_id.to_string())
        .bind(state_json)
        .bind(checkpoint.saved_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| CheckpointerError::Backend {
            message: format!("save error: {e}"),
        })?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn load_latest(&self, session_id: &SessionId) -> Result<Option<Checkpoint>> {
        let row = sqlx::query("SELECT session_id, state_json, saved_at FROM reviewloom_sessions WHERE session_id = ?1")
            .bind(session_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CheckpointerError::Backend {
                message: format!("load error: {e}"),
            })?;
        row.map(|r| Self::decode_row(r.get("session_id"), r.get("state_json"), r.get("saved_at")))
            .transpose()
    }

    async fn list_sessions(&self) -> Result<Vec<SessionId>> {
        let rows = sqlx::query("SELECT session_id FROM reviewloom_sessions")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| CheckpointerError::Backend {
                message: format!("list error: {e}"),
            })?;
        rows.into_iter()
            .map(|r| {
                let raw: String = r.get("session_id");
                raw.parse::<uuid::Uuid>()
                    .map(SessionId)
                    .map_err(|e| CheckpointerError::Serde {
                        message: format!("session_id parse: {e}"),
                    })
            })
            .collect()
    }

    async fn delete(&self, session_id: &SessionId) -> Result<()> {
        sqlx::query("DELETE FROM reviewloom_sessions WHERE session_id = ?1")
            .bind(session_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| CheckpointerError::Backend {
                message: format!("delete error: {e}"),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DefectSelection;
    use crate::types::{Locale, Phase, WorkflowStep};
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
            locale: Locale::En,
            max_iterations: limits.max_iterations,
            max_evaluation_attempts: limits.max_evaluation_attempts,
            evaluation_attempts: 2,
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
    async fn round_trips_through_sqlite_memory() {
        let cp = SQLiteCheckpointer::connect("sqlite::memory:").await.unwrap();
        let state = sample_state();
        let id = state.session_id.clone();
        cp.save(Checkpoint::new(state)).await.unwrap();

        let loaded = cp.load_latest(&id).await.unwrap().expect("present");
        assert_eq!(loaded.state.evaluation_attempts, 2);
        assert_eq!(cp.list_sessions().await.unwrap(), vec![id.clone()]);

        cp.delete(&id).await.unwrap();
        assert!(cp.load_latest(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_overwrites_latest() {
        let cp = SQLiteCheckpointer::connect("sqlite::memory:").await.unwrap();
        let mut state = sample_state();
        let id = state.session_id.clone();
        cp.save(Checkpoint::new(state.clone())).await.unwrap();

        state.evaluation_attempts = 3;
        cp.save(Checkpoint::new(state)).await.unwrap();

        let loaded = cp.load_latest(&id).await.unwrap().unwrap();
        assert_eq!(loaded.state.evaluation_attempts, 3);
    }
}
