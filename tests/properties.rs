//! Property tests for universal invariants and round-trip laws, run against
//! the real components and engine (no mocked invariants) with
//! `proptest`-generated inputs, exercising pure transforms and component
//! contracts rather than only the happy-path unit cases.

mod common;

use std::sync::Arc;

use proptest::prelude::*;
use reviewloom::catalog::{CatalogStore, DefectSelection};
use reviewloom::components::CodeEvaluator;
use reviewloom::model::testing::ScriptedModelClient;
use reviewloom::model::ModelRole;
use reviewloom::types::{Locale, Phase, WorkflowStep};
use reviewloom::utils::line_numbers::{prepend_line_numbers, strip_line_numbers};
use reviewloom::workflow::ReviewLimits;

use common::{engine_with_scripts, found_missing_json, short_generation_params, two_defect_catalog};

fn code_line() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_ ;{}()]{0,20}"
}

proptest! {
    /// Round-trip law: prepend then strip recovers the original code. A
    /// trailing empty line is excluded from the generated input: joining
    /// lines with `\n` and re-splitting via `str::lines` is inherently lossy
    /// there (`"a\n"` and `"a\n\n"` both yield the single line `"a"`), which
    /// is a property of `str::lines` itself rather than of the prepend/strip
    /// pair.
    #[test]
    fn line_number_prepend_strip_round_trips(mut lines in prop::collection::vec(code_line(), 0..20)) {
        if matches!(lines.last(), Some(last) if last.is_empty()) {
            lines.pop();
        }
        let code = lines.join("\n");
        let numbered = prepend_line_numbers(&code);
        prop_assert_eq!(strip_line_numbers(&numbered), code);
    }
}

proptest! {
    /// Evaluation result invariant: found and missing always exactly
    /// partition the manifest, independent of which subset the scripted
    /// model claims to have found.
    #[test]
    fn evaluation_found_and_missing_partition_manifest(found_mask in prop::collection::vec(any::<bool>(), 1..6)) {
        let names = ["Off By One", "Null Check Missing", "Dangling Pointer", "Resource Leak", "Race Condition"];
        let codes = ["logical_off_by_one", "logical_null_check_missing", "logical_dangling_pointer", "logical_resource_leak", "logical_race_condition"];
        let en_defects: Vec<String> = names[..found_mask.len()]
            .iter()
            .map(|n| format!(r#"{{"name": "{n}", "description": "d", "implementation_guide": "g"}}"#))
            .collect();
        let en_catalog = format!(r#"{{"Logical": [{}]}}"#, en_defects.join(", "));
        let zh_catalog = format!(r#"{{"邏輯錯誤": [{}]}}"#, en_defects.join(", "));
        let catalog = CatalogStore::from_seed_str(&en_catalog, &zh_catalog).unwrap();

        let selected_codes: Vec<String> = codes[..found_mask.len()].iter().map(|c| c.to_string()).collect();
        let manifest = catalog
            .resolve_selection(&DefectSelection::explicit(selected_codes).unwrap())
            .unwrap();

        let found_names: Vec<&str> = manifest
            .iter()
            .zip(found_mask.iter())
            .filter(|&(_, &found)| found)
            .map(|(d, _)| d.display_name(Locale::En))
            .collect();

        let client = Arc::new(ScriptedModelClient::new(
            ModelRole::Review,
            vec![found_missing_json(&found_names, &[], found_names.len() == manifest.len())],
        ));
        let evaluator = CodeEvaluator::new(client);
        let artifact = reviewloom::components::CodeArtifact {
            annotated: "public class X {}".to_string(),
            clean: "public class X {}".to_string(),
            manifest: manifest.clone(),
            expected_count: manifest.len(),
            domain: "banking".to_string(),
        };

        let result = tokio::runtime::Runtime::new().unwrap().block_on(evaluator.evaluate(&artifact, Locale::En)).unwrap();

        let found_codes: std::collections::HashSet<_> = result.found.iter().map(|d| d.code.clone()).collect();
        let missing_codes: std::collections::HashSet<_> = result.missing.iter().map(|d| d.code.clone()).collect();
        prop_assert!(found_codes.is_disjoint(&missing_codes));
        let manifest_codes: std::collections::HashSet<_> = manifest.iter().map(|d| d.code.clone()).collect();
        let union: std::collections::HashSet<_> = found_codes.union(&missing_codes).cloned().collect();
        prop_assert_eq!(union, manifest_codes);
    }
}

proptest! {
    /// `evaluation_attempts` and `current_iteration` stay within their
    /// documented bounds across every scripted engine run, regardless of
    /// how many regeneration rounds happen or whether the review loop
    /// exhausts its iteration budget.
    #[test]
    fn attempts_and_iterations_stay_in_bounds(
        max_evaluation_attempts in 1u32..5,
        max_iterations in 1u32..5,
        always_missing in any::<bool>(),
    ) {
        let generative_count = max_evaluation_attempts as usize;
        let review_responses: Vec<String> = (0..generative_count)
            .map(|i| {
                let last = i + 1 == generative_count;
                found_missing_json(&["Off By One"], if last && !always_missing { &[] } else { &["Off By One"] }, last && !always_missing)
            })
            .collect();

        let engine = engine_with_scripts(
            common::single_defect_catalog(),
            (0..generative_count).map(|_| common::GENERATION_RESPONSE.to_string()).collect(),
            review_responses,
            vec![],
        );
        let selection = DefectSelection::explicit(vec!["logical_off_by_one".into()]).unwrap();
        let limits = ReviewLimits { max_iterations, max_evaluation_attempts };
        let (_id, state) = engine
            .new_workflow(selection, short_generation_params(), limits, Locale::En, Phase::Full, None)
            .unwrap();

        let state = tokio::runtime::Runtime::new().unwrap().block_on(engine.advance(state));

        prop_assert!(state.evaluation_attempts <= max_evaluation_attempts);
        prop_assert!(state.current_iteration >= 1 && state.current_iteration <= max_iterations + 1);
    }
}

/// Suspension idempotence: re-`advance`-ing a state parked at `review`
/// with no `pending_review` is a no-op fixed point.
#[tokio::test]
async fn suspension_at_review_is_a_fixed_point() {
    let engine = engine_with_scripts(
        common::single_defect_catalog(),
        vec![common::GENERATION_RESPONSE.to_string()],
        vec![found_missing_json(&["Off By One"], &[], true)],
        vec![],
    );
    let selection = DefectSelection::explicit(vec!["logical_off_by_one".into()]).unwrap();
    let (_id, state) = engine
        .new_workflow(selection, short_generation_params(), ReviewLimits::default(), Locale::En, Phase::Full, None)
        .unwrap();
    let state = engine.advance(state).await;
    assert_eq!(state.current_step, WorkflowStep::Review);

    let state_again = engine.advance(state.clone()).await;

    let serialized_a = serde_json::to_string(&state).unwrap();
    let serialized_b = serde_json::to_string(&state_again).unwrap();
    assert_eq!(serialized_a, serialized_b);
}

/// Round-trip law: `WorkflowState` survives a serialize/deserialize cycle
/// with byte-identical re-serialization, for a state reached mid-review
/// (covers every populated field: artifact, evaluation result, review
/// history).
#[tokio::test]
async fn workflow_state_serde_round_trips() {
    let engine = engine_with_scripts(
        two_defect_catalog(),
        vec![common::TWO_DEFECT_GENERATION_RESPONSE.to_string()],
        vec![
            found_missing_json(&["Off By One", "Null Check Missing"], &[], true),
            r#"{"identified_problems": ["Off By One"], "missed_problems": ["Null Check Missing"]}"#.to_string(),
        ],
        vec!["fallback".to_string()],
    );
    let selection = DefectSelection::explicit(vec!["logical_off_by_one".into(), "logical_null_check_missing".into()]).unwrap();
    let limits = ReviewLimits {
        max_iterations: 1,
        max_evaluation_attempts: 2,
    };
    let (_id, state) = engine
        .new_workflow(selection, short_generation_params(), limits, Locale::En, Phase::Full, None)
        .unwrap();
    let state = engine.advance(state).await;
    let state = engine.submit_review(state, "Line 2: off by one in the loop bound").await.unwrap();

    let serialized = serde_json::to_string(&state).unwrap();
    let roundtripped: reviewloom::workflow::WorkflowState = serde_json::from_str(&serialized).unwrap();
    let reserialized = serde_json::to_string(&roundtripped).unwrap();

    assert_eq!(serialized, reserialized);
}
