//! The seven node functions. Each takes the engine (for its
//! components) and mutates `WorkflowState` in place; none ever returns an
//! `Err` to the caller — failures are written to `state.error` instead,
//! since the engine never throws across its public API boundary.

use crate::components::EvaluationResult;
use crate::types::WorkflowStep;
use crate::workflow::branch::{BranchA, BranchB, should_continue_review, should_regenerate_or_review, step_for_branch_a, step_for_branch_b};
use crate::workflow::engine::Engine;
use crate::workflow::state::{ReviewAttempt, WorkflowState};

/// Whether the engine's `Advance` loop should keep dispatching nodes or
/// stop — either because the workflow suspended (awaiting a review) or
/// because it reached a terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NodeOutcome {
    Continue,
    Halt,
}

pub(crate) fn terminalize(state: &mut WorkflowState, message: &str) {
    state.error = Some(message.to_string());
    state.current_step = WorkflowStep::Complete;
}

/// `generate_code`: entry node. A `GeneratorError` always surfaces — nothing
/// retries this node automatically on a generation failure.
pub(crate) async fn generate_code(engine: &Engine, state: &mut WorkflowState) -> NodeOutcome {
    engine.emit(state, "generate_code", "invoking generative client");
    let domain = state.generation.domain.clone();
    match engine
        .generator
        .generate(&state.selection, state.generation.length, state.generation.difficulty, state.locale, domain.as_deref())
        .await
    {
        Ok(artifact) => {
            state.code_artifact = Some(artifact);
            state.current_step = WorkflowStep::Evaluate;
            NodeOutcome::Continue
        }
        Err(e) => {
            terminalize(state, &e.to_string());
            NodeOutcome::Halt
        }
    }
}

/// `evaluate_code`: increments `evaluation_attempts` before Branch A is
/// consulted, regardless of outcome. A `ModelError` is folded into a
/// "missing all" [`EvaluationResult`] so it drives the retry loop like
/// any other invalid evaluation; only once attempts are exhausted *and* the
/// failure was a genuine model error (not a tolerated parse failure) does
/// the workflow surface a terminal error instead of proceeding to
/// `review_code`.
pub(crate) async fn evaluate_code(engine: &Engine, state: &mut WorkflowState) -> NodeOutcome {
    let Some(artifact) = state.code_artifact.clone() else {
        terminalize(state, "evaluate_code: no code artifact present");
        return NodeOutcome::Halt;
    };

    state.evaluation_attempts += 1;
    engine.emit(
        state,
        "evaluate_code",
        format!("attempt {}/{}", state.evaluation_attempts, state.max_evaluation_attempts),
    );

    match engine.evaluator.evaluate(&artifact, state.locale).await {
        Ok(result) => {
            state.last_model_error = None;
            state.evaluation_result = Some(result);
        }
        Err(e) => {
            state.last_model_error = Some(e.to_string());
            state.evaluation_result = Some(EvaluationResult {
                found: Vec::new(),
                missing: artifact.manifest.clone(),
                valid: false,
                feedback: "model invocation failed".to_string(),
            });
        }
    }

    let branch = should_regenerate_or_review(state);
    if branch == BranchA::ReviewCode
        && state.evaluation_attempts >= state.max_evaluation_attempts
        && let Some(message) = state.last_model_error.clone()
    {
        terminalize(state, &message);
        return NodeOutcome::Halt;
    }

    if branch == BranchA::RegenerateCode {
        let evaluation = state.evaluation_result.clone().expect("just set above");
        state.regeneration_feedback = Some(engine.evaluator.build_regeneration_feedback(&artifact, &evaluation, state.locale));
    }
    state.current_step = step_for_branch_a(branch);
    NodeOutcome::Continue
}

/// `regenerate_code`: defense-in-depth re-check of the attempts bound, then
/// a `generative` call against the feedback prompt `evaluate_code` stashed.
pub(crate) async fn regenerate_code(engine: &Engine, state: &mut WorkflowState) -> NodeOutcome {
    if state.evaluation_attempts >= state.max_evaluation_attempts {
        state.current_step = WorkflowStep::Review;
        return NodeOutcome::Continue;
    }
    let Some(artifact) = state.code_artifact.clone() else {
        terminalize(state, "regenerate_code: no code artifact present");
        return NodeOutcome::Halt;
    };
    let prompt = state.regeneration_feedback.clone().unwrap_or_default();
    engine.emit(state, "regenerate_code", "invoking generative client with regeneration feedback");

    match engine.generator.regenerate(&prompt, artifact.manifest.clone(), artifact.domain.clone()).await {
        Ok(new_artifact) => {
            state.code_artifact = Some(new_artifact);
            state.current_step = WorkflowStep::Evaluate;
            NodeOutcome::Continue
        }
        Err(e) => {
            terminalize(state, &e.to_string());
            NodeOutcome::Halt
        }
    }
}

/// `review_code`: the sole suspension point. Returns `Halt` both when it
/// suspends (no pending review) and implicitly lets the caller re-invoke
/// `Advance` later — calling it again with still-no-`pending_review` is a
/// fixed point.
pub(crate) fn review_code(state: &mut WorkflowState) -> NodeOutcome {
    let Some(review_text) = state.pending_review.take() else {
        state.current_step = WorkflowStep::Review;
        return NodeOutcome::Halt;
    };
    state.review_history.push(ReviewAttempt {
        iteration_number: state.current_iteration,
        review_text,
        analysis: None,
        guidance: None,
    });
    state.current_step = WorkflowStep::Analyze;
    NodeOutcome::Continue
}

/// `analyze_review`: attaches analysis to the just-appended `ReviewAttempt`,
/// increments `current_iteration`, then consults Branch B. Guidance is only
/// generated when Branch B says to continue — a review that already
/// satisfies `sufficient` gets no guidance text, since there won't be a
/// next iteration to apply it to.
pub(crate) async fn analyze_review(engine: &Engine, state: &mut WorkflowState) -> NodeOutcome {
    let Some(artifact) = state.code_artifact.clone() else {
        terminalize(state, "analyze_review: no code artifact present");
        return NodeOutcome::Halt;
    };
    let Some(attempt_idx) = state.review_history.len().checked_sub(1) else {
        terminalize(state, "analyze_review: no pending review attempt");
        return NodeOutcome::Halt;
    };
    let review_text = state.review_history[attempt_idx].review_text.clone();
    let manifest = artifact.manifest.clone();

    match engine.grader.analyze_review(&artifact, &manifest, &review_text, state.locale).await {
        Ok(analysis) => {
            state.review_history[attempt_idx].analysis = Some(analysis.clone());
            state.current_iteration += 1;

            let branch = should_continue_review(state);
            if branch == BranchB::ReviewCode {
                let guidance = engine
                    .grader
                    .generate_guidance(&artifact, &manifest, &review_text, &analysis, state.current_iteration, state.max_iterations, state.locale)
                    .await;
                state.review_history[attempt_idx].guidance = Some(guidance);
            }
            state.current_step = step_for_branch_b(branch);
            NodeOutcome::Continue
        }
        Err(e) => {
            terminalize(state, &e.to_string());
            NodeOutcome::Halt
        }
    }
}

/// `generate_comparison_report`: builds the final report from the latest
/// analysis. Never errors to the engine — a parse failure already
/// degraded into a fallback report inside [`crate::components::ReportGenerator`].
pub(crate) async fn generate_comparison_report(engine: &Engine, state: &mut WorkflowState) -> NodeOutcome {
    let Some(artifact) = state.code_artifact.clone() else {
        terminalize(state, "generate_comparison_report: no code artifact present");
        return NodeOutcome::Halt;
    };
    let Some(analysis) = state.review_history.last().and_then(|a| a.analysis.clone()) else {
        terminalize(state, "generate_comparison_report: no review analysis available");
        return NodeOutcome::Halt;
    };
    let review_history_summary = summarize_review_history(state);
    let report = engine
        .report
        .build_comparison_report(&artifact.manifest, &analysis, &review_history_summary, state.locale)
        .await;
    state.comparison_report = Some(report);
    state.current_step = WorkflowStep::Summarize;
    NodeOutcome::Continue
}

fn summarize_review_history(state: &WorkflowState) -> String {
    state
        .review_history
        .iter()
        .map(|attempt| {
            attempt.analysis.as_ref().map_or_else(
                || format!("iteration {}: ungraded", attempt.iteration_number),
                |a| format!("iteration {}: {}/{} identified", attempt.iteration_number, a.identified_count, a.total_problems),
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// `generate_summary`: always terminal. Synthesises a minimal text summary
/// only when no `ComparisonReport` was produced (e.g. a generation-only
/// phase run that never entered the review loop).
pub(crate) fn generate_summary(state: &mut WorkflowState) -> NodeOutcome {
    if state.comparison_report.is_none() {
        if let Some(analysis) = state.review_history.last().and_then(|a| a.analysis.clone()) {
            state.summary_text = Some(format!(
                "Identified {}/{} defects ({:.1}% accuracy).",
                analysis.identified_count, analysis.total_problems, analysis.accuracy
            ));
        } else if let Some(artifact) = state.code_artifact.as_ref() {
            state.summary_text = Some(format!("Generated a {} artifact seeded with {} defects.", artifact.domain, artifact.expected_count));
        }
    }
    state.current_step = WorkflowStep::Complete;
    NodeOutcome::Halt
}
