//! Session checkpointing and engine construction configuration.
//!
//! `WorkflowState` is designed to be fully serializable at any node
//! boundary so a workflow instance can be suspended at `review_code` for
//! arbitrary real time — between process restarts, not just between async
//! calls in one process. This module supplies:
//!
//! - [`checkpointer`] — the [`Checkpointer`] trait plus a volatile
//!   [`InMemoryCheckpointer`] implementation.
//! - [`checkpointer_sqlite`] (behind the `sqlite` feature) — a durable
//!   SQLite-backed implementation.
//! - [`config`] — the engine-construction knobs: role-to-model mapping,
//!   default retry bounds, catalog source location, default locale.
//! - [`session_manager`] — the thin, optional `Engine` + `Checkpointer`
//!   pairing a host process uses to look workflows up by id and resume them.

pub mod checkpointer;
#[cfg(feature = "sqlite")]
pub mod checkpointer_sqlite;
pub mod config;
pub mod session_manager;

pub use checkpointer::{Checkpoint, Checkpointer, CheckpointerError, CheckpointerKind, InMemoryCheckpointer};
#[cfg(feature = "sqlite")]
pub use checkpointer_sqlite::SQLiteCheckpointer;
pub use config::{CatalogSource, EngineConfig, ModelRoleConfig};
pub use session_manager::{SessionManager, SessionManagerError};
