//! Locale-tagged prompt vocabulary.
//!
//! This is the one place a small string-keyed lookup table is legitimate in
//! this crate: it only ever feeds prompt wording, never program control
//! flow. Compare to `Localized<T>` (`utils::localized`), which replaces the
//! analogous lookup at the data-model layer with a typed accessor.

use crate::types::Locale;

/// Resolve a prompt-vocabulary string for `locale`. `key` must name an
/// entry in [`TABLE`] — this is programmer error, not model-output
/// tolerance, so it panics rather than degrading silently.
#[must_use]
pub fn t(locale: Locale, key: &str) -> &'static str {
    let (_, en, zh) = TABLE
        .iter()
        .find(|(k, _, _)| *k == key)
        .unwrap_or_else(|| panic!("no locale_strings entry for key {key:?}"));
    match locale {
        Locale::En => en,
        Locale::Zh => zh,
    }
}

/// `(key, english, chinese)` rows. Kept as a flat table (not an enum) since
/// new keys are added independently of any Rust type that would need a
/// matching arm — see the Design Note this crate follows for why dynamic
/// *data-model* field access was replaced with typed records but prompt
/// vocabulary, which never drives control flow, keeps a lookup table.
const TABLE: &[(&str, &str, &str)] = &[
    (
        "instruction_prefix",
        "You are an assistant helping build a peer-review training exercise. Respond precisely to the instructions below.",
        "你是一位協助建構同儕審查訓練練習的助理。請精確地回應以下指示。",
    ),
    (
        "code_generation_intro",
        "Write a source code artifact seeded with exactly the requested defects.",
        "請撰寫一段程式碼，並精確地植入下列所要求的缺陷。",
    ),
    (
        "code_generation_annotated_label",
        "First, emit the annotated version with `// ERROR N: <defect name>` markers at each defect site.",
        "首先，請產生含有 `// ERROR N: <缺陷名稱>` 標記的標註版本，標示每個缺陷的位置。",
    ),
    (
        "code_generation_clean_label",
        "Then emit the clean version with every marker comment stripped.",
        "接著，請產生移除所有標記註解的乾淨版本。",
    ),
    (
        "evaluation_intro",
        "Verify whether the code below actually contains every requested defect.",
        "請驗證下方程式碼是否確實包含每一個所要求的缺陷。",
    ),
    (
        "evaluation_json_demand",
        "Respond with a single JSON object only: {\"found_errors\": [...], \"missing_errors\": [...], \"valid\": bool, \"feedback\": \"...\"}.",
        "請僅回覆一個 JSON 物件：{\"found_errors\": [...], \"missing_errors\": [...], \"valid\": bool, \"feedback\": \"...\"}。",
    ),
    (
        "regeneration_intro",
        "Revise the code below: keep every already-found defect verbatim and inject each missing defect.",
        "請修改下方程式碼：完整保留每個已找到的缺陷，並植入每個遺漏的缺陷。",
    ),
    (
        "review_analysis_intro",
        "Grade the learner's review below against the ground-truth defect list.",
        "請依據真實缺陷清單，為下方學員的審查內容評分。",
    ),
    (
        "review_analysis_json_demand",
        "Respond with a single JSON object only: {\"identified_problems\": [...], \"missed_problems\": [...], \"identified_count\": int, \"total_problems\": int, \"identified_percentage\": float, \"review_sufficient\": bool}.",
        "請僅回覆一個 JSON 物件：{\"identified_problems\": [...], \"missed_problems\": [...], \"identified_count\": int, \"total_problems\": int, \"identified_percentage\": float, \"review_sufficient\": bool}。",
    ),
    (
        "comparison_report_intro",
        "Produce a structured comparison report summarizing the learner's performance.",
        "請產生一份結構化的比較報告，總結學員的表現。",
    ),
    (
        "identified_count_key",
        "identified_count",
        "已識別數量",
    ),
    (
        "total_problems_key",
        "total_problems",
        "問題總數",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_key_in_both_locales() {
        assert!(t(Locale::En, "instruction_prefix").starts_with("You are"));
        assert!(t(Locale::Zh, "instruction_prefix").starts_with("你是"));
    }
}
