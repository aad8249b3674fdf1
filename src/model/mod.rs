//! The abstract model-client capability.
//!
//! `reviewloom` never talks to a vendor directly: every component that needs
//! a completion holds an `Arc<dyn ModelClient>` tagged with the
//! [`ModelRole`] it plays — one trait, one `async fn`, no inheritance.

pub mod testing;

use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;

/// Which of the three model roles a client is bound to.
///
/// Roles may map to the same underlying vendor endpoint, but the engine
/// always holds three independently-configurable instances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelRole {
    /// Seeds defects into freshly generated code.
    Generative,
    /// Verifies artifacts and grades learner reviews.
    Review,
    /// Produces the final comparison report.
    Summary,
}

impl ModelRole {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelRole::Generative => "generative",
            ModelRole::Review => "review",
            ModelRole::Summary => "summary",
        }
    }
}

/// A single, blocking completion call. Connection validation is lazy: a
/// client may be constructed before its vendor is reachable, and only the
/// first failing `invoke` surfaces an error.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Which role this instance plays, for tracing/diagnostics only — the
    /// engine's routing never switches on this, only on which field of
    /// [`RoleBoundClients`] it called through.
    fn role(&self) -> ModelRole;

    /// Invoke the model with a fully-assembled prompt and return its raw
    /// text response. Retries are the caller's responsibility, not the
    /// client's — a failed call is not assumed idempotent.
    async fn invoke(&self, prompt: &str) -> Result<String, ModelError>;
}

/// Errors surfaced by [`ModelClient::invoke`].
#[derive(Debug, Error, Diagnostic)]
pub enum ModelError {
    /// The vendor call itself failed (network, auth, rate limit, etc.).
    #[error("model invocation failed ({role}): {message}")]
    #[diagnostic(
        code(reviewloom::model::invocation_failed),
        help("This is surfaced to the workflow as a ModelError; generation and review-grading do not retry automatically.")
    )]
    InvocationFailed { role: ModelRole, message: String },

    /// The vendor returned successfully but with an empty body, which this
    /// crate treats identically to a hard failure.
    #[error("model returned an empty response ({role})")]
    #[diagnostic(code(reviewloom::model::empty_response))]
    EmptyResponse { role: ModelRole },
}

impl std::fmt::Display for ModelRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The three role-tagged clients the engine holds by reference. Cloning is
/// cheap — every field is an `Arc`.
#[derive(Clone)]
pub struct RoleBoundClients {
    pub generative: std::sync::Arc<dyn ModelClient>,
    pub review: std::sync::Arc<dyn ModelClient>,
    pub summary: std::sync::Arc<dyn ModelClient>,
}

impl RoleBoundClients {
    #[must_use]
    pub fn new(
        generative: std::sync::Arc<dyn ModelClient>,
        review: std::sync::Arc<dyn ModelClient>,
        summary: std::sync::Arc<dyn ModelClient>,
    ) -> Self {
        Self {
            generative,
            review,
            summary,
        }
    }
}
