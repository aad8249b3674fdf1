//! Catalog seed ingestion: two parallel locale documents in, `DefectCategory`
//! and `Defect` records out.
//!
//! Seed format: each locale document is a JSON object mapping a
//! category display name to an array of
//! `{name, description, implementation_guide}` defect objects. The English
//! and Chinese category names are paired by a fixed mapping; defects within
//! a matched category pair are zipped positionally.

use serde::Deserialize;
use serde_json::Map;

use crate::catalog::error::CatalogError;
use crate::catalog::model::{Defect, DefectCategory};
use crate::types::Difficulty;
use crate::utils::Localized;

#[derive(Debug, Deserialize)]
struct SeedDefect {
    name: String,
    description: String,
    implementation_guide: String,
}

/// A `serde_json::Map` rather than a hash map: with the `preserve_order`
/// feature this keeps categories in the order they appear in the source
/// document, which `ingest` depends on for `sort_order` assignment.
type SeedDocument = Map<String, serde_json::Value>;

/// The fixed English↔Chinese category-name mapping.
const CATEGORY_MAPPING: &[(&str, &str)] = &[
    ("Logical", "邏輯錯誤"),
    ("Syntax", "語法錯誤"),
    ("Code Quality", "程式碼品質"),
    ("Standard Violation", "標準違規"),
    ("Java Specific", "Java 特定錯誤"),
];

fn english_for(zh_name: &str) -> Option<&'static str> {
    CATEGORY_MAPPING
        .iter()
        .find(|(_, zh)| *zh == zh_name)
        .map(|(en, _)| *en)
}

fn chinese_for(en_name: &str) -> Option<&'static str> {
    CATEGORY_MAPPING
        .iter()
        .find(|(en, _)| *en == en_name)
        .map(|(_, zh)| *zh)
}

/// Derive the stable `category_code`: lowercase the English category name,
/// replace spaces with underscores.
#[must_use]
pub fn category_code(english_name: &str) -> String {
    english_name.to_lowercase().replace(' ', "_")
}

/// Derive a slug: lowercase alphanumerics and underscores only.
#[must_use]
pub fn slug(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect::<String>()
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Derive the stable `error_code`: `{category_code}_{slug(defect_name)}`.
#[must_use]
pub fn error_code(category_code: &str, defect_name: &str) -> String {
    format!("{category_code}_{}", slug(defect_name))
}

/// Result of ingesting both locale documents: parallel category and defect
/// lists, sort order assigned by first-seen English category order.
pub struct SeedIngest {
    pub categories: Vec<DefectCategory>,
    pub defects: Vec<Defect>,
}

/// `Defect::difficulty` is an immutable per-defect attribute, but the
/// seed format carries no difficulty field at all. This crate resolves
/// that silence by cycling Easy/Medium/Hard
/// deterministically over each category's defect list in seed order, so
/// every category has a spread of difficulties for `SampleDefects` to draw
/// against (decision recorded in DESIGN.md).
fn difficulty_for_index(index: usize) -> Difficulty {
    match index % 3 {
        0 => Difficulty::Easy,
        1 => Difficulty::Medium,
        _ => Difficulty::Hard,
    }
}

/// Parse and merge the English and Chinese seed documents.
pub fn ingest(en_json: &str, zh_json: &str) -> Result<SeedIngest, CatalogError> {
    let en_doc: SeedDocument = serde_json::from_str(en_json).map_err(|e| CatalogError::SeedLoad {
        reason: format!("english seed: {e}"),
    })?;
    let zh_doc: SeedDocument = serde_json::from_str(zh_json).map_err(|e| CatalogError::SeedLoad {
        reason: format!("chinese seed: {e}"),
    })?;

    let mut categories = Vec::new();
    let mut defects = Vec::new();

    for (sort_order, (en_category, en_defects_value)) in en_doc.iter().enumerate() {
        let en_defects: Vec<SeedDefect> = serde_json::from_value(en_defects_value.clone()).map_err(|e| CatalogError::SeedLoad {
            reason: format!("english seed category '{en_category}': {e}"),
        })?;
        let code = category_code(en_category);
        let zh_category = chinese_for(en_category);
        let zh_defects: Option<Vec<SeedDefect>> = match zh_category.and_then(|zh_name| zh_doc.get(zh_name)) {
            Some(value) => Some(serde_json::from_value(value.clone()).map_err(|e| CatalogError::SeedLoad {
                reason: format!("chinese seed category '{}': {e}", zh_category.unwrap_or_default()),
            })?),
            None => None,
        };

        categories.push(DefectCategory {
            code: code.clone(),
            display_name: match zh_category {
                Some(zh) => Localized::new(en_category.clone(), zh.to_string()),
                None => Localized::en_only(en_category.clone()),
            },
            sort_order: sort_order as u32,
            active: true,
        });

        for (i, en_defect) in en_defects.iter().enumerate() {
            let zh_defect = zh_defects.as_ref().and_then(|list| list.get(i));
            let defect_code = error_code(&code, &en_defect.name);
            defects.push(Defect {
                code: defect_code,
                category_code: code.clone(),
                display_name: localize_pair(&en_defect.name, zh_defect.map(|d| d.name.as_str())),
                description: localize_pair(
                    &en_defect.description,
                    zh_defect.map(|d| d.description.as_str()),
                ),
                implementation_guide: localize_pair(
                    &en_defect.implementation_guide,
                    zh_defect.map(|d| d.implementation_guide.as_str()),
                ),
                difficulty: difficulty_for_index(i),
                usage_count: 0,
            });
        }
    }

    // Any Chinese-only categories with no English counterpart are
    // unreachable under this fixed five-pair mapping, so a document
    // outside that set is a seed-authoring error we surface immediately
    // rather than silently drop.
    for zh_category in zh_doc.keys() {
        if english_for(zh_category).is_none() {
            return Err(CatalogError::SeedLoad {
                reason: format!("chinese category '{zh_category}' has no English mapping"),
            });
        }
    }

    Ok(SeedIngest { categories, defects })
}

fn localize_pair(en: &str, zh: Option<&str>) -> Localized<String> {
    match zh {
        Some(zh) => Localized::new(en.to_string(), zh.to_string()),
        None => Localized::en_only(en.to_string()),
    }
}
