//! Catalog error taxonomy.
//!
//! A `thiserror` enum with `miette::Diagnostic` help text attached to every
//! variant, distinguishing setup-time failures from runtime read failures
//! that the engine treats as retryable.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    /// The seed documents could not be read or parsed. Fatal at
    /// construction time — this is the `SetupError` path.
    #[error("failed to load defect catalog seed: {reason}")]
    #[diagnostic(
        code(reviewloom::catalog::seed_load),
        help("Check that both locale seed files exist and are valid JSON.")
    )]
    SeedLoad { reason: String },

    /// A `DefectSelection` was constructed with an illegal shape.
    #[error("invalid defect selection: {reason}")]
    #[diagnostic(code(reviewloom::catalog::invalid_selection))]
    InvalidSelection { reason: String },

    /// A requested category code does not exist (or is inactive).
    #[error("unknown or inactive category: {code}")]
    #[diagnostic(code(reviewloom::catalog::unknown_category))]
    UnknownCategory { code: String },

    /// A requested defect code does not exist.
    #[error("unknown defect: {code}")]
    #[diagnostic(code(reviewloom::catalog::unknown_defect))]
    UnknownDefect { code: String },

    /// A read against a live store failed transiently. The engine surfaces
    /// this as a retryable error rather than corrupting workflow state.
    #[error("catalog read failed: {reason}")]
    #[diagnostic(
        code(reviewloom::catalog::read_failed),
        help("This is treated as retryable by the workflow engine.")
    )]
    ReadFailed { reason: String },
}
