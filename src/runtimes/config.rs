//! Engine construction configuration:
//! role-to-model mapping, default retry bounds, catalog data source
//! location, and default locale — all injected at engine construction, none
//! of it read by a node mid-workflow.

use crate::model::ModelRole;
use crate::types::Locale;

/// Model id + temperature for one role. Roles may point at the same vendor
/// model but are always independently configurable.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelRoleConfig {
    pub role: ModelRole,
    pub model_id: String,
    pub temperature: f32,
}

impl ModelRoleConfig {
    #[must_use]
    pub fn new(role: ModelRole, model_id: impl Into<String>, temperature: f32) -> Self {
        Self {
            role,
            model_id: model_id.into(),
            temperature,
        }
    }
}

/// Where the catalog's two locale seed documents
/// live. Ingestion itself is handled by [`crate::catalog::seed::ingest`];
/// this just names the source the caller resolves paths against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogSource {
    /// Filesystem paths to the English and Chinese seed documents.
    Files { en_path: String, zh_path: String },
    /// Already-loaded JSON text (e.g. embedded via `include_str!`).
    Inline { en_json: String, zh_json: String },
}

/// The full set of knobs injected at engine construction rather than
/// discovered at runtime.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub generative: ModelRoleConfig,
    pub review: ModelRoleConfig,
    pub summary: ModelRoleConfig,
    pub default_max_iterations: u32,
    pub default_max_evaluation_attempts: u32,
    pub catalog_source: CatalogSource,
    pub default_locale: Locale,
}

impl EngineConfig {
    /// Read role/model env vars, falling back to reasonable defaults; a
    /// `.env` file is loaded first if present via `dotenvy::dotenv().ok()`,
    /// for optional local overrides.
    #[must_use]
    pub fn from_env(catalog_source: CatalogSource) -> Self {
        dotenvy::dotenv().ok();

        let role = |env_prefix: &str, role: ModelRole, default_model: &str, default_temp: f32| {
            let model_id = std::env::var(format!("{env_prefix}_MODEL")).unwrap_or_else(|_| default_model.to_string());
            let temperature = std::env::var(format!("{env_prefix}_TEMPERATURE"))
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_temp);
            ModelRoleConfig::new(role, model_id, temperature)
        };

        Self {
            generative: role("REVIEWLOOM_GENERATIVE", ModelRole::Generative, "claude-sonnet", 0.9),
            review: role("REVIEWLOOM_REVIEW", ModelRole::Review, "claude-sonnet", 0.2),
            summary: role("REVIEWLOOM_SUMMARY", ModelRole::Summary, "claude-sonnet", 0.5),
            default_max_iterations: std::env::var("REVIEWLOOM_MAX_ITERATIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            default_max_evaluation_attempts: std::env::var("REVIEWLOOM_MAX_EVALUATION_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            catalog_source,
            default_locale: match std::env::var("REVIEWLOOM_DEFAULT_LOCALE").as_deref() {
                Ok("zh") => Locale::Zh,
                _ => Locale::En,
            },
        }
    }

    #[must_use]
    pub fn review_limits(&self) -> crate::workflow::state::ReviewLimits {
        crate::workflow::state::ReviewLimits {
            max_iterations: self.default_max_iterations,
            max_evaluation_attempts: self.default_max_evaluation_attempts,
        }
    }
}
