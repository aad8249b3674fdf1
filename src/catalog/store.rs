//! The read-mostly defect catalog store.
//!
//! A plain struct over an in-memory snapshot, no interior mutability needed
//! for reads, one `RwLock`-guarded counter map for the only thing that
//! mutates (`usage_count`).

use std::sync::Arc;

use parking_lot::RwLock;
use rand::Rng;
use rustc_hash::FxHashMap;

use crate::catalog::error::CatalogError;
use crate::catalog::model::{Defect, DefectCategory, DefectSelection, DefectUsageEvent};
use crate::catalog::seed::{self, SeedIngest};
use crate::catalog::sink::{NullUsageSink, SharedUsageSink};
use crate::types::{Locale, UsageAction};

/// In-memory, read-mostly store of categories and defects.
///
/// Cloning is cheap (`Arc` inside); callers typically hold one
/// `Arc<CatalogStore>` shared across every workflow instance — the catalog
/// is immutable from the workflow's point of view aside from usage counts.
pub struct CatalogStore {
    categories: Vec<DefectCategory>,
    defects: Vec<Defect>,
    /// `defect.code` -> usage_count, mutated only by `record_usage`.
    usage_counts: RwLock<FxHashMap<String, u64>>,
    usage_sink: SharedUsageSink,
}

impl CatalogStore {
    /// Build a store from already-ingested seed data and a usage sink.
    #[must_use]
    pub fn new(categories: Vec<DefectCategory>, defects: Vec<Defect>, usage_sink: SharedUsageSink) -> Self {
        let usage_counts = defects.iter().map(|d| (d.code.clone(), d.usage_count)).collect();
        Self {
            categories,
            defects,
            usage_counts: RwLock::new(usage_counts),
            usage_sink,
        }
    }

    /// Build a store from the two parallel seed JSON strings, failing fast per the `SetupError` contract if either
    /// document is malformed.
    pub fn from_seed_str(en_json: &str, zh_json: &str) -> Result<Self, CatalogError> {
        let SeedIngest { categories, defects } = seed::ingest(en_json, zh_json)?;
        Ok(Self::new(categories, defects, Arc::new(NullUsageSink)))
    }

    /// As [`from_seed_str`](Self::from_seed_str), but reads the documents
    /// from disk first.
    pub fn from_seed_files(en_path: &std::path::Path, zh_path: &std::path::Path) -> Result<Self, CatalogError> {
        let en_json = std::fs::read_to_string(en_path).map_err(|e| CatalogError::SeedLoad {
            reason: format!("reading {}: {e}", en_path.display()),
        })?;
        let zh_json = std::fs::read_to_string(zh_path).map_err(|e| CatalogError::SeedLoad {
            reason: format!("reading {}: {e}", zh_path.display()),
        })?;
        Self::from_seed_str(&en_json, &zh_json)
    }

    #[must_use]
    pub fn with_usage_sink(mut self, sink: SharedUsageSink) -> Self {
        self.usage_sink = sink;
        self
    }

    /// Active categories, ordered by sort order.
    #[must_use]
    pub fn list_categories(&self) -> Vec<&DefectCategory> {
        let mut active: Vec<&DefectCategory> = self.categories.iter().filter(|c| c.active).collect();
        active.sort_by_key(|c| c.sort_order);
        active
    }

    /// Active defects in an active category.
    #[must_use]
    pub fn list_defects(&self, category_code: &str) -> Vec<&Defect> {
        if !self.category_is_active(category_code) {
            return Vec::new();
        }
        self.defects.iter().filter(|d| d.category_code == category_code).collect()
    }

    /// Look up a single defect by its stable code, regardless of its
    /// category's active flag (an explicit lookup by code is not a
    /// "surfacing" operation).
    #[must_use]
    pub fn get_defect(&self, code: &str) -> Option<&Defect> {
        self.defects.iter().find(|d| d.code == code)
    }

    fn category_is_active(&self, category_code: &str) -> bool {
        self.categories
            .iter()
            .find(|c| c.code == category_code)
            .is_some_and(|c| c.active)
    }

    /// Resolve a `DefectSelection` into the concrete defect list and its
    /// manifest.
    pub fn resolve_selection(&self, selection: &DefectSelection) -> Result<Vec<Defect>, CatalogError> {
        match selection {
            DefectSelection::Explicit { defect_codes } => defect_codes
                .iter()
                .map(|code| {
                    self.get_defect(code)
                        .cloned()
                        .ok_or_else(|| CatalogError::UnknownDefect { code: code.clone() })
                })
                .collect(),
            DefectSelection::ByCategory {
                category_codes,
                count,
                difficulty,
            } => self.sample_defects(category_codes, *count, *difficulty),
        }
    }

    /// `SampleDefects`: each requested category independently draws a
    /// uniform random count in `difficulty`'s `per_category_draw_range`
    /// (clamped to that category's pool size, without replacement), and the
    /// draws are pooled across categories — the sole code path, with no
    /// further trim to `count` (see DESIGN.md's Open Question entry for why
    /// the other candidate formula was dropped). Ties in category iteration
    /// order are broken by sort order.
    fn sample_defects(
        &self,
        category_codes: &[String],
        _count: usize,
        difficulty: crate::types::Difficulty,
    ) -> Result<Vec<Defect>, CatalogError> {
        let mut categories: Vec<&DefectCategory> = category_codes
            .iter()
            .map(|code| {
                self.categories
                    .iter()
                    .find(|c| &c.code == code && c.active)
                    .ok_or_else(|| CatalogError::UnknownCategory { code: code.clone() })
            })
            .collect::<Result<_, _>>()?;
        categories.sort_by_key(|c| c.sort_order);

        let (min_draw, max_draw) = difficulty.per_category_draw_range();
        let mut rng = rand::rng();
        let mut pooled: Vec<Defect> = Vec::new();

        for category in &categories {
            let mut pool: Vec<&Defect> = self.defects.iter().filter(|d| d.category_code == category.code).collect();
            if pool.is_empty() {
                continue;
            }
            let draw = rng.random_range(min_draw..=max_draw).min(pool.len());
            for _ in 0..draw {
                let idx = rng.random_range(0..pool.len());
                pooled.push(pool.remove(idx).clone());
            }
        }

        Ok(pooled)
    }

    /// Best-effort telemetry append; never blocks, never surfaces failures
    /// to the workflow.
    pub fn record_usage(&self, defect_code: &str, actor: Option<String>, action: UsageAction, context: Option<serde_json::Value>) {
        if let Some(mut counts) = self.usage_counts.try_write() {
            *counts.entry(defect_code.to_string()).or_insert(0) += 1;
        }
        self.usage_sink.record(DefectUsageEvent {
            defect_code: defect_code.to_string(),
            actor,
            action,
            context,
            recorded_at: chrono::Utc::now(),
        });
    }

    /// Current usage counter for a defect, 0 if never recorded.
    #[must_use]
    pub fn usage_count(&self, defect_code: &str) -> u64 {
        self.usage_counts.read().get(defect_code).copied().unwrap_or(0)
    }

    /// Resolve a field for display in `locale`, exposed for components
    /// that only have a code and need a human label (e.g. report
    /// generation referencing a defect the manifest already resolved).
    #[must_use]
    pub fn defect_display_name(&self, code: &str, locale: Locale) -> String {
        self.get_defect(code)
            .map(|d| d.display_name(locale).to_string())
            .unwrap_or_else(|| code.to_string())
    }
}
