//! # reviewloom: an educational peer-review training engine
//!
//! `reviewloom` drives a bounded, re-entrant workflow that (a) asks a
//! generative model to synthesize a source-code artifact seeded with a
//! requested set of defects, (b) verifies the artifact against its ground
//! truth manifest, regenerating within a bounded number of attempts when it
//! falls short, (c) accepts a learner's written review of the artifact,
//! (d) grades that review against the manifest across a bounded number of
//! iterations, issuing targeted guidance, and (e) produces a final
//! comparative report.
//!
//! ## Core Concepts
//!
//! - [`catalog`] — the read-mostly store of defect categories and defects
//! - [`prompt`] — pure prompt-assembly functions
//! - [`parser`] — tolerant extraction of code/JSON from model output
//! - [`model`] — the abstract `ModelClient` capability
//! - [`components`] — Generator / Evaluator / Grader / Report, built atop
//!   the catalog, prompt builder, and model clients
//! - [`workflow`] — the graph-structured state machine tying it all
//!   together
//! - [`runtimes`] — session checkpointing so a workflow instance can be
//!   suspended between "generate" and "submit review" for arbitrary time
//!
//! ## Quick Start
//!
//! ```no_run
//! use reviewloom::catalog::DefectSelection;
//! use reviewloom::types::{Difficulty, Locale, Phase, WorkflowStep};
//! use reviewloom::workflow::{Engine, GenerationParams, ReviewLimits};
//!
//! # async fn example(engine: Engine) -> Result<(), Box<dyn std::error::Error>> {
//! let selection = DefectSelection::from_category(vec!["logical".into()], 3, Difficulty::Medium)?;
//! let generation = GenerationParams {
//!     difficulty: Difficulty::Medium,
//!     ..GenerationParams::default()
//! };
//! let (_session_id, mut state) =
//!     engine.new_workflow(selection, generation, ReviewLimits::default(), Locale::En, Phase::Full, None)?;
//!
//! state = engine.advance(state).await;
//! assert_eq!(state.current_step, WorkflowStep::Review);
//!
//! state = engine.submit_review(state, "Line 4: the loop never terminates").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Guide
//!
//! - [`types`] — locale, difficulty, phase, and other small shared enums
//! - [`catalog`] — defect catalog store, seeding, and usage telemetry
//! - [`prompt`] — the five prompt templates
//! - [`parser`] — code-block and JSON extraction with layered fallbacks
//! - [`model`] — the abstract model-client capability and test doubles
//! - [`components`] — Generator, Evaluator, Grader, Report builder
//! - [`workflow`] — state, nodes, branch conditions, and the engine
//! - [`runtimes`] — checkpointing and engine configuration
//! - [`event_bus`] — lightweight structured-event emission for node
//!   diagnostics
//! - [`telemetry`] — `tracing` initialization helpers

pub mod catalog;
pub mod components;
pub mod event_bus;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod runtimes;
pub mod telemetry;
pub mod types;
pub mod utils;
pub mod workflow;
