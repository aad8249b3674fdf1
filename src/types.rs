//! Small shared enums used throughout the crate.
//!
//! These are the core domain vocabulary: locale, difficulty, and the
//! workflow's phase/step identifiers. Keeping them as exhaustively-matched
//! enums (rather than free strings) is what lets locale fallback and
//! workflow routing be checked by the compiler instead of by string
//! comparison scattered through the codebase.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported locales. Field selection and JSON key selection both switch on
/// this rather than concatenating strings at the call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Zh,
}

impl Locale {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Difficulty tier for a single defect. Immutable once assigned to a
/// catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Per-category draw range `(min, max)` used by `SampleDefects`: each
    /// category independently draws a uniform random count in this range,
    /// without replacement, clamped to that category's pool size
    /// (easy→(1,2), medium→(1,3), hard→(1,4)).
    #[must_use]
    pub fn per_category_draw_range(&self) -> (usize, usize) {
        match self {
            Difficulty::Easy => (1, 2),
            Difficulty::Medium => (1, 3),
            Difficulty::Hard => (1, 4),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Length bucket used by the code-generation prompt's structural hints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthBucket {
    Short,
    Medium,
    Long,
}

impl LengthBucket {
    /// `(classes, methods, loc)` as three human-readable range strings.
    #[must_use]
    pub fn structural_hint(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            LengthBucket::Short => ("1 class", "1-2 methods", "15-30 lines"),
            LengthBucket::Medium => ("1 class", "3-5 methods", "40-80 lines"),
            LengthBucket::Long => ("1-2 classes", "4-8 methods", "100-150 lines"),
        }
    }
}

/// Which loop(s) of the workflow a run exercises.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Generation,
    Review,
    Full,
}

/// The workflow's seven real nodes plus the terminal marker.
///
/// Serializes as a lowercase string, matching the "Persisted state layout"
/// rule in the external-interfaces contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    Generate,
    Evaluate,
    Regenerate,
    Review,
    Analyze,
    Report,
    Summarize,
    Complete,
}

/// A domain tag drawn uniformly when the caller doesn't supply one.
pub const DOMAINS: &[&str] = &[
    "user_management",
    "file_processing",
    "data_validation",
    "calculation",
    "inventory_system",
    "notification_service",
    "logging",
    "banking",
    "e-commerce",
    "student_management",
];

/// Usage-telemetry action recorded against a defect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageAction {
    Viewed,
    Practiced,
    Mastered,
    Failed,
}
