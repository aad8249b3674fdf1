//! Shared fixtures for the integration tests.

use std::sync::Arc;

use reviewloom::catalog::CatalogStore;
use reviewloom::model::testing::ScriptedModelClient;
use reviewloom::model::{ModelRole, RoleBoundClients};
use reviewloom::types::{Difficulty, LengthBucket};
use reviewloom::workflow::{Engine, GenerationParams};

pub const SINGLE_DEFECT_EN: &str = r#"{"Logical": [{"name": "Off By One", "description": "loop bound is wrong", "implementation_guide": "use <= instead of <"}]}"#;
pub const SINGLE_DEFECT_ZH: &str = r#"{"邏輯錯誤": [{"name": "差一錯誤", "description": "loop bound is wrong", "implementation_guide": "use <= instead of <"}]}"#;

pub const TWO_DEFECT_EN: &str = r#"{"Logical": [
    {"name": "Off By One", "description": "loop bound is wrong", "implementation_guide": "use <= instead of <"},
    {"name": "Null Check Missing", "description": "no null guard", "implementation_guide": "add a null check"}
]}"#;
pub const TWO_DEFECT_ZH: &str = r#"{"邏輯錯誤": [
    {"name": "差一錯誤", "description": "loop bound is wrong", "implementation_guide": "use <= instead of <"},
    {"name": "缺少空值檢查", "description": "no null guard", "implementation_guide": "add a null check"}
]}"#;

pub fn single_defect_catalog() -> Arc<CatalogStore> {
    Arc::new(CatalogStore::from_seed_str(SINGLE_DEFECT_EN, SINGLE_DEFECT_ZH).unwrap())
}

pub fn two_defect_catalog() -> Arc<CatalogStore> {
    Arc::new(CatalogStore::from_seed_str(TWO_DEFECT_EN, TWO_DEFECT_ZH).unwrap())
}

pub const GENERATION_RESPONSE: &str =
    "```java\npublic class Loop {\n    // ERROR 1: Off By One\n    void run() {}\n}\n```\n```java\npublic class Loop {\n    void run() {}\n}\n```";

pub const TWO_DEFECT_GENERATION_RESPONSE: &str = "```java\npublic class Loop {\n    // ERROR 1: Off By One\n    // ERROR 2: Null Check Missing\n    void run() {}\n}\n```\n```java\npublic class Loop {\n    void run() {}\n}\n```";

/// Build an `Engine` over a given catalog with scripted `generative`,
/// `review`, and `summary` responses consumed in call order.
pub fn engine_with_scripts(catalog: Arc<CatalogStore>, generative: Vec<String>, review: Vec<String>, summary: Vec<String>) -> Engine {
    let generative = Arc::new(ScriptedModelClient::new(ModelRole::Generative, generative));
    let review = Arc::new(ScriptedModelClient::new(ModelRole::Review, review));
    let summary = Arc::new(ScriptedModelClient::new(ModelRole::Summary, summary));
    Engine::new(catalog, RoleBoundClients::new(generative, review, summary))
}

pub fn short_generation_params() -> GenerationParams {
    GenerationParams {
        length: LengthBucket::Short,
        difficulty: Difficulty::Medium,
        domain: Some("banking".to_string()),
    }
}

pub fn found_missing_json(found: &[&str], missing: &[&str], valid: bool) -> String {
    let found = found.iter().map(|s| format!("\"{s}\"")).collect::<Vec<_>>().join(", ");
    let missing = missing.iter().map(|s| format!("\"{s}\"")).collect::<Vec<_>>().join(", ");
    format!(r#"{{"found_errors": [{found}], "missing_errors": [{missing}], "valid": {valid}}}"#)
}
