//! Catalog entities: `DefectCategory`, `Defect`, `DefectSelection`, and the
//! usage-telemetry event shape.

use serde::{Deserialize, Serialize};

use crate::catalog::error::CatalogError;
use crate::types::{Difficulty, UsageAction};
use crate::utils::Localized;

/// A named grouping of defects.
///
/// `code` is the stable, opaque identifier derived at seed time; it
/// never changes once assigned.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DefectCategory {
    pub code: String,
    pub display_name: Localized<String>,
    pub sort_order: u32,
    pub active: bool,
}

impl DefectCategory {
    #[must_use]
    pub fn display_name(&self, locale: crate::types::Locale) -> &str {
        self.display_name.pick_or_code(locale, &self.code)
    }
}

/// A single pedagogical defect belonging to one category.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Defect {
    pub code: String,
    pub category_code: String,
    pub display_name: Localized<String>,
    pub description: Localized<String>,
    pub implementation_guide: Localized<String>,
    pub difficulty: Difficulty,
    /// Monotonically-increasing usage counter; written only via
    /// [`crate::catalog::store::CatalogStore::record_usage`].
    pub usage_count: u64,
}

impl Defect {
    #[must_use]
    pub fn display_name(&self, locale: crate::types::Locale) -> &str {
        self.display_name.pick_or_code(locale, &self.code)
    }

    #[must_use]
    pub fn description(&self, locale: crate::types::Locale) -> &str {
        self.description.pick_or_code(locale, &self.code)
    }

    #[must_use]
    pub fn implementation_guide(&self, locale: crate::types::Locale) -> &str {
        self.implementation_guide.pick_or_code(locale, &self.code)
    }
}

/// The set of defects chosen for one generation.
///
/// Exactly one of the two shapes is populated — never both, never neither.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum DefectSelection {
    /// Draw defects from the given categories at the given difficulty via
    /// `SampleDefects`; `count` only bounds the requested size at
    /// construction (`[1, 10]`) — the per-category draw ranges in
    /// `Difficulty::per_category_draw_range` are what actually size the
    /// result.
    ByCategory {
        category_codes: Vec<String>,
        count: usize,
        difficulty: Difficulty,
    },
    /// Use this explicit list of defect codes directly; `count` is implied
    /// by its length.
    Explicit { defect_codes: Vec<String> },
}

impl DefectSelection {
    /// Build a category-based selection, validating `count` falls in
    /// `[1, 10]` per the data-model invariant.
    pub fn from_category(
        category_codes: Vec<String>,
        count: usize,
        difficulty: Difficulty,
    ) -> Result<Self, CatalogError> {
        if category_codes.is_empty() {
            return Err(CatalogError::InvalidSelection {
                reason: "category-based selection needs at least one category code".into(),
            });
        }
        if !(1..=10).contains(&count) {
            return Err(CatalogError::InvalidSelection {
                reason: format!("count must be in [1, 10], got {count}"),
            });
        }
        Ok(Self::ByCategory {
            category_codes,
            count,
            difficulty,
        })
    }

    /// Build an explicit-defect selection. Rejects an empty list, since a
    /// selection with both shapes empty is illegal.
    pub fn explicit(defect_codes: Vec<String>) -> Result<Self, CatalogError> {
        if defect_codes.is_empty() {
            return Err(CatalogError::InvalidSelection {
                reason: "explicit selection needs at least one defect code".into(),
            });
        }
        Ok(Self::Explicit { defect_codes })
    }

    #[must_use]
    pub fn is_explicit(&self) -> bool {
        matches!(self, DefectSelection::Explicit { .. })
    }
}

/// Best-effort telemetry record for [`RecordUsage`](crate::catalog::store::CatalogStore::record_usage).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DefectUsageEvent {
    pub defect_code: String,
    pub actor: Option<String>,
    pub action: UsageAction,
    pub context: Option<serde_json::Value>,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}
