//! Report Generator: produces the final [`ComparisonReport`].
//!
//! Never surfaces an error to the engine — a parse failure synthesises a
//! deterministic fallback report instead.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Defect;
use crate::components::grader::ReviewAnalysis;
use crate::model::ModelClient;
use crate::parser::json::{get_f64, get_str, get_str_array, get_u64, parse_with_known_keys};
use crate::prompt::PromptBuilder;
use crate::types::Locale;

/// Counts mirrored from the referenced [`ReviewAnalysis`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub identified_count: usize,
    pub total_problems: usize,
    pub accuracy: f64,
}

/// Final educational report.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub performance_summary: PerformanceSummary,
    pub correctly_identified: Vec<String>,
    pub missed: Vec<String>,
    pub improvement_tips: Vec<String>,
    pub language_specific_guidance: Vec<String>,
    pub encouragement: String,
    pub detailed_feedback: Vec<String>,
}

/// Composes the prompt builder and the `summary` model client.
#[derive(Clone)]
pub struct ReportGenerator {
    prompts: PromptBuilder,
    client: Arc<dyn ModelClient>,
}

impl ReportGenerator {
    #[must_use]
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            prompts: PromptBuilder,
            client,
        }
    }

    #[tracing::instrument(skip(self, evaluation_defects, latest_analysis, review_history_summary))]
    pub async fn build_comparison_report(
        &self,
        evaluation_defects: &[Defect],
        latest_analysis: &ReviewAnalysis,
        review_history_summary: &str,
        locale: Locale,
    ) -> ComparisonReport {
        let analysis_summary = format!(
            "identified {}/{} ({:.1}% accuracy)",
            latest_analysis.identified_count, latest_analysis.total_problems, latest_analysis.accuracy
        );
        let prompt = self
            .prompts
            .comparison_report(evaluation_defects, &analysis_summary, review_history_summary, locale);

        let response = match self.client.invoke(&prompt).await {
            Ok(text) if !text.trim().is_empty() => text,
            _ => return Self::fallback_report(latest_analysis, evaluation_defects, locale),
        };

        let value = parse_with_known_keys(
            &response,
            &[
                "performance_summary",
                "correctly_identified",
                "missed",
                "improvement_tips",
                "language_specific_guidance",
                "encouragement",
                "detailed_feedback",
            ],
        );
        if value.get("error").is_some() && value.get("encouragement").is_none() {
            return Self::fallback_report(latest_analysis, evaluation_defects, locale);
        }

        let performance_summary = value
            .get("performance_summary")
            .map(|v| PerformanceSummary {
                identified_count: get_u64(v, &["identified_count"]).unwrap_or(latest_analysis.identified_count as u64) as usize,
                total_problems: get_u64(v, &["total_problems"]).unwrap_or(latest_analysis.total_problems as u64) as usize,
                accuracy: get_f64(v, &["accuracy"]).unwrap_or(latest_analysis.accuracy),
            })
            .unwrap_or_else(|| Self::summary_from_analysis(latest_analysis));

        ComparisonReport {
            performance_summary,
            correctly_identified: get_str_array(&value, &["correctly_identified"]),
            missed: get_str_array(&value, &["missed"]),
            improvement_tips: get_str_array(&value, &["improvement_tips"]),
            language_specific_guidance: get_str_array(&value, &["language_specific_guidance"]),
            encouragement: get_str(&value, &["encouragement"]).unwrap_or_default().to_string(),
            detailed_feedback: get_str_array(&value, &["detailed_feedback"]),
        }
    }

    fn summary_from_analysis(analysis: &ReviewAnalysis) -> PerformanceSummary {
        PerformanceSummary {
            identified_count: analysis.identified_count,
            total_problems: analysis.total_problems,
            accuracy: analysis.accuracy,
        }
    }

    fn fallback_report(analysis: &ReviewAnalysis, evaluation_defects: &[Defect], locale: Locale) -> ComparisonReport {
        let correctly_identified: Vec<String> = evaluation_defects
            .iter()
            .filter(|d| analysis.identified.iter().any(|i| i.defect_code == d.code))
            .map(|d| d.display_name(locale).to_string())
            .collect();
        let missed: Vec<String> = evaluation_defects
            .iter()
            .filter(|d| analysis.missed.iter().any(|m| m.defect_code == d.code))
            .map(|d| d.display_name(locale).to_string())
            .collect();

        ComparisonReport {
            performance_summary: Self::summary_from_analysis(analysis),
            correctly_identified,
            missed,
            improvement_tips: vec!["Re-read the code line by line, checking boundary conditions and null handling.".to_string()],
            language_specific_guidance: vec!["Pay attention to Java-specific pitfalls such as off-by-one loop bounds and unchecked null dereferences.".to_string()],
            encouragement: "Good effort — keep practicing and your defect-spotting accuracy will keep improving.".to_string(),
            detailed_feedback: Vec::new(),
        }
    }
}
