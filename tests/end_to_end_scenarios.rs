//! Concrete end-to-end scenarios driven against `Engine` with
//! `ScriptedModelClient` doubles — no real model vendor involved, exercising
//! the real trait against in-memory fakes.

mod common;

use reviewloom::catalog::DefectSelection;
use reviewloom::types::{Locale, Phase, WorkflowStep};
use reviewloom::workflow::ReviewLimits;

use common::{engine_with_scripts, found_missing_json, short_generation_params, single_defect_catalog, two_defect_catalog, GENERATION_RESPONSE, TWO_DEFECT_GENERATION_RESPONSE};

/// Scenario 1: happy path, single attempt.
#[tokio::test]
async fn scenario_1_happy_path_single_attempt() {
    let engine = engine_with_scripts(
        single_defect_catalog(),
        vec![GENERATION_RESPONSE.to_string()],
        vec![found_missing_json(&["Off By One"], &[], true)],
        vec![],
    );
    let selection = DefectSelection::explicit(vec!["logical_off_by_one".into()]).unwrap();
    let (_id, state) = engine
        .new_workflow(selection, short_generation_params(), ReviewLimits::default(), Locale::En, Phase::Full, None)
        .unwrap();

    let state = engine.advance(state).await;

    assert_eq!(state.current_step, WorkflowStep::Review);
    assert_eq!(state.evaluation_attempts, 1);
    assert!(state.code_artifact.is_some());
}

/// Scenario 2: one regeneration then success.
#[tokio::test]
async fn scenario_2_one_regeneration_then_success() {
    let engine = engine_with_scripts(
        single_defect_catalog(),
        vec![GENERATION_RESPONSE.to_string(), GENERATION_RESPONSE.to_string()],
        vec![
            found_missing_json(&[], &["Off By One"], false),
            found_missing_json(&["Off By One"], &[], true),
        ],
        vec![],
    );
    let selection = DefectSelection::explicit(vec!["logical_off_by_one".into()]).unwrap();
    let (_id, state) = engine
        .new_workflow(selection, short_generation_params(), ReviewLimits::default(), Locale::En, Phase::Full, None)
        .unwrap();

    let state = engine.advance(state).await;

    assert_eq!(state.evaluation_attempts, 2);
    assert_eq!(state.current_step, WorkflowStep::Review);
}

/// Scenario 3: exhausted regeneration — `max_evaluation_attempts = 2`,
/// evaluator always reports the defect missing.
#[tokio::test]
async fn scenario_3_exhausted_regeneration_forces_review() {
    let engine = engine_with_scripts(
        single_defect_catalog(),
        vec![GENERATION_RESPONSE.to_string(), GENERATION_RESPONSE.to_string()],
        vec![
            found_missing_json(&[], &["Off By One"], false),
            found_missing_json(&[], &["Off By One"], false),
        ],
        vec![],
    );
    let selection = DefectSelection::explicit(vec!["logical_off_by_one".into()]).unwrap();
    let limits = ReviewLimits {
        max_iterations: 3,
        max_evaluation_attempts: 2,
    };
    let (_id, state) = engine
        .new_workflow(selection, short_generation_params(), limits, Locale::En, Phase::Full, None)
        .unwrap();

    let state = engine.advance(state).await;

    assert_eq!(state.evaluation_attempts, 2);
    assert_eq!(state.current_step, WorkflowStep::Review);
    assert!(state.code_artifact.is_some(), "most recent (still defective) artifact is retained");
}

/// Scenario 4: review grading, sufficient on first try.
#[tokio::test]
async fn scenario_4_review_sufficient_on_first_try() {
    let engine = engine_with_scripts(
        single_defect_catalog(),
        vec![GENERATION_RESPONSE.to_string()],
        vec![
            found_missing_json(&["Off By One"], &[], true),
            r#"{"identified_problems": ["Off By One"], "missed_problems": []}"#.to_string(),
        ],
        vec![r#"{"performance_summary": {}, "encouragement": "well done"}"#.to_string()],
    );
    let selection = DefectSelection::explicit(vec!["logical_off_by_one".into()]).unwrap();
    let (_id, state) = engine
        .new_workflow(selection, short_generation_params(), ReviewLimits::default(), Locale::En, Phase::Full, None)
        .unwrap();
    let state = engine.advance(state).await;
    assert_eq!(state.current_step, WorkflowStep::Review);

    let state = engine.submit_review(state, "Line 5: A is present because the loop bound is off").await.unwrap();

    assert!(state.review_sufficient);
    assert_eq!(state.current_iteration, 2);
    assert_eq!(state.current_step, WorkflowStep::Complete);
    assert!(state.comparison_report.is_some());
}

/// Scenario 5: review iterations exhausted without sufficiency —
/// `max_iterations = 2`, manifest = [A, B], learner identifies only A twice.
#[tokio::test]
async fn scenario_5_review_iterations_exhausted_without_sufficiency() {
    let engine = engine_with_scripts(
        two_defect_catalog(),
        vec![TWO_DEFECT_GENERATION_RESPONSE.to_string()],
        vec![
            found_missing_json(&["Off By One", "Null Check Missing"], &[], true),
            r#"{"identified_problems": ["Off By One"], "missed_problems": ["Null Check Missing"]}"#.to_string(),
            "Look again at the null handling near the loop.".to_string(),
            r#"{"identified_problems": ["Off By One"], "missed_problems": ["Null Check Missing"]}"#.to_string(),
        ],
        vec!["fallback summary".to_string()],
    );
    let selection = DefectSelection::explicit(vec!["logical_off_by_one".into(), "logical_null_check_missing".into()]).unwrap();
    let limits = ReviewLimits {
        max_iterations: 2,
        max_evaluation_attempts: 3,
    };
    let (_id, state) = engine
        .new_workflow(selection, short_generation_params(), limits, Locale::En, Phase::Full, None)
        .unwrap();
    let state = engine.advance(state).await;
    assert_eq!(state.current_step, WorkflowStep::Review);

    let state = engine.submit_review(state, "Line 3: off by one in the loop bound").await.unwrap();
    assert_eq!(state.current_step, WorkflowStep::Review);
    assert!(!state.review_sufficient);
    assert_eq!(state.current_iteration, 2);

    let state = engine.submit_review(state, "Line 3: still just the off by one").await.unwrap();

    assert_eq!(state.current_iteration, 3);
    assert!(state.current_iteration > state.max_iterations);
    assert_eq!(state.current_step, WorkflowStep::Complete);
    let analysis = state.review_history.last().unwrap().analysis.as_ref().unwrap();
    assert_eq!(analysis.identified_count, 1);
    assert_eq!(analysis.total_problems, 2);
    assert_eq!(analysis.accuracy, 50.0);
}

/// Scenario 6: cancellation mid-review.
#[tokio::test]
async fn scenario_6_cancellation_mid_review() {
    let engine = engine_with_scripts(
        single_defect_catalog(),
        vec![GENERATION_RESPONSE.to_string()],
        vec![found_missing_json(&["Off By One"], &[], true)],
        vec![],
    );
    let selection = DefectSelection::explicit(vec!["logical_off_by_one".into()]).unwrap();
    let (_id, state) = engine
        .new_workflow(selection, short_generation_params(), ReviewLimits::default(), Locale::En, Phase::Full, None)
        .unwrap();
    let state = engine.advance(state).await;
    assert_eq!(state.current_step, WorkflowStep::Review);

    let state = engine.cancel(state);

    assert_eq!(state.current_step, WorkflowStep::Complete);
    assert_eq!(state.error.as_deref(), Some("cancelled"));

    let state_again = engine.advance(state.clone()).await;
    assert_eq!(state_again.current_step, state.current_step);
    assert_eq!(state_again.error, state.error);
}
