//! Branch conditions A and B. Pure functions over `&WorkflowState`;
//! the priority order within each is part of the contract and is tested directly here in addition to the
//! engine-level scenario tests.

use crate::types::{Phase, WorkflowStep};
use crate::workflow::state::WorkflowState;

/// Where `evaluate_code` routes to next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchA {
    RegenerateCode,
    ReviewCode,
}

/// Where `analyze_review` routes to next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchB {
    GenerateComparisonReport,
    ReviewCode,
}

/// `shouldRegenerateOrReview` — evaluated in order, first match wins.
///
/// Rule 1 (attempts exhausted) always beats rule 2 (valid), which always
/// beats rule 3 (generation-only phase), which always beats rule 4
/// (missing > 0 and attempts remain). Rule 5 is the default.
#[must_use]
pub fn should_regenerate_or_review(state: &WorkflowState) -> BranchA {
    if state.evaluation_attempts >= state.max_evaluation_attempts {
        return BranchA::ReviewCode;
    }
    let Some(evaluation) = state.evaluation_result.as_ref() else {
        return BranchA::ReviewCode;
    };
    if evaluation.valid {
        return BranchA::ReviewCode;
    }
    if state.phase == Phase::Generation {
        return BranchA::ReviewCode;
    }
    if !evaluation.missing.is_empty() && state.evaluation_attempts < state.max_evaluation_attempts {
        return BranchA::RegenerateCode;
    }
    BranchA::ReviewCode
}

/// `shouldContinueReview` — evaluated in order, first match wins.
///
/// Rule 1 (iteration exhausted) always beats rule 2 (sufficient), which
/// always beats rule 3 (generation-only phase, defensive), which always
/// beats rule 4 (all-identified, which also flips `review_sufficient`).
/// Rule 5 continues; rule 6 is the default.
#[must_use]
pub fn should_continue_review(state: &mut WorkflowState) -> BranchB {
    if state.current_iteration > state.max_iterations {
        return BranchB::GenerateComparisonReport;
    }
    if state.review_sufficient {
        return BranchB::GenerateComparisonReport;
    }
    if state.phase == Phase::Generation {
        return BranchB::GenerateComparisonReport;
    }
    let latest_sufficient = state
        .review_history
        .last()
        .and_then(|attempt| attempt.analysis.as_ref())
        .is_some_and(|analysis| analysis.total_problems > 0 && analysis.identified_count >= analysis.total_problems);
    if latest_sufficient {
        state.review_sufficient = true;
        return BranchB::GenerateComparisonReport;
    }
    if state.current_iteration <= state.max_iterations && matches!(state.phase, Phase::Review | Phase::Full) {
        return BranchB::ReviewCode;
    }
    BranchB::GenerateComparisonReport
}

/// Used by the engine to route within `Advance`'s main loop.
#[must_use]
pub fn step_for_branch_a(branch: BranchA) -> WorkflowStep {
    match branch {
        BranchA::RegenerateCode => WorkflowStep::Regenerate,
        BranchA::ReviewCode => WorkflowStep::Review,
    }
}

#[must_use]
pub fn step_for_branch_b(branch: BranchB) -> WorkflowStep {
    match branch {
        BranchB::GenerateComparisonReport => WorkflowStep::Report,
        BranchB::ReviewCode => WorkflowStep::Review,
    }
}
