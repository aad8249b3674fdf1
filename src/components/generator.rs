//! Code Generator: produces a [`CodeArtifact`] seeded with a
//! requested set of defects.

use std::sync::Arc;

use miette::Diagnostic;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{CatalogError, CatalogStore, Defect, DefectSelection};
use crate::model::{ModelClient, ModelError};
use crate::parser::extract_code_variants;
use crate::prompt::PromptBuilder;
use crate::types::{Difficulty, LengthBucket, Locale, DOMAINS};

/// Model-produced source with seeded defects.
///
/// `clean` is expected to be derivable from `annotated` by stripping marker
/// comments; the generator
/// does not re-derive it from `annotated` itself, trusting the model's own
/// clean block when one was present.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CodeArtifact {
    pub annotated: String,
    pub clean: String,
    pub manifest: Vec<Defect>,
    pub expected_count: usize,
    pub domain: String,
}

impl CodeArtifact {
    #[must_use]
    pub fn manifest_codes(&self) -> Vec<String> {
        self.manifest.iter().map(|d| d.code.clone()).collect()
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum GeneratorError {
    #[error("failed to resolve defect selection: {0}")]
    #[diagnostic(code(reviewloom::generator::selection))]
    Selection(#[from] CatalogError),

    #[error("generative model invocation failed: {0}")]
    #[diagnostic(
        code(reviewloom::generator::model),
        help("Generation does not retry automatically on a ModelError; this surfaces to the workflow.")
    )]
    Model(#[from] ModelError),

    #[error("generative model returned a response with no usable code")]
    #[diagnostic(code(reviewloom::generator::empty_parse))]
    EmptyParse,
}

/// Composes the catalog, prompt builder, and `generative` model client.
#[derive(Clone)]
pub struct CodeGenerator {
    catalog: Arc<CatalogStore>,
    prompts: PromptBuilder,
    client: Arc<dyn ModelClient>,
}

impl CodeGenerator {
    #[must_use]
    pub fn new(catalog: Arc<CatalogStore>, client: Arc<dyn ModelClient>) -> Self {
        Self {
            catalog,
            prompts: PromptBuilder,
            client,
        }
    }

    /// Pick a domain uniformly from [`DOMAINS`].
    #[must_use]
    pub fn random_domain() -> &'static str {
        let idx = rand::rng().random_range(0..DOMAINS.len());
        DOMAINS[idx]
    }

    #[tracing::instrument(skip(self, selection), fields(locale = %locale, difficulty = %difficulty))]
    pub async fn generate(
        &self,
        selection: &DefectSelection,
        length: LengthBucket,
        difficulty: Difficulty,
        locale: Locale,
        domain: Option<&str>,
    ) -> Result<CodeArtifact, GeneratorError> {
        let manifest = self.catalog.resolve_selection(selection)?;
        let domain = domain.map_or_else(|| Self::random_domain().to_string(), ToString::to_string);

        let prompt = self
            .prompts
            .code_generation(length, difficulty, &manifest, &domain, manifest.len(), locale);
        let variants = self.invoke_and_extract(&prompt).await?;

        let expected_count = manifest.len();
        Ok(CodeArtifact {
            annotated: variants.annotated,
            clean: variants.clean,
            manifest,
            expected_count,
            domain,
        })
    }

    /// Re-invoke the `generative` client with an already-assembled
    /// regeneration prompt, keeping the same
    /// manifest and domain and replacing only the code variants.
    #[tracing::instrument(skip(self, prompt, manifest))]
    pub async fn regenerate(&self, prompt: &str, manifest: Vec<Defect>, domain: String) -> Result<CodeArtifact, GeneratorError> {
        let variants = self.invoke_and_extract(prompt).await?;
        let expected_count = manifest.len();
        Ok(CodeArtifact {
            annotated: variants.annotated,
            clean: variants.clean,
            manifest,
            expected_count,
            domain,
        })
    }

    async fn invoke_and_extract(&self, prompt: &str) -> Result<crate::parser::code::CodeVariants, GeneratorError> {
        let response = self.client.invoke(prompt).await?;
        if response.trim().is_empty() {
            return Err(GeneratorError::EmptyParse);
        }
        let variants = extract_code_variants(&response);
        if variants.annotated.trim().is_empty() && variants.clean.trim().is_empty() {
            return Err(GeneratorError::EmptyParse);
        }
        Ok(variants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelRole, testing::ScriptedModelClient};

    fn store() -> Arc<CatalogStore> {
        let en = r#"{"Logical": [{"name": "Off By One", "description": "d", "implementation_guide": "g"}]}"#;
        let zh = r#"{"邏輯錯誤": [{"name": "差一", "description": "d", "implementation_guide": "g"}]}"#;
        Arc::new(CatalogStore::from_seed_str(en, zh).unwrap())
    }

    #[tokio::test]
    async fn generates_artifact_from_two_block_response() {
        let response = "```java\nint x; // ERROR 1: Off By One\n```\n```java\nint x;\n```".to_string();
        let client = Arc::new(ScriptedModelClient::new(ModelRole::Generative, vec![response]));
        let generator = CodeGenerator::new(store(), client);
        let selection = DefectSelection::explicit(vec!["logical_off_by_one".into()]).unwrap();
        let artifact = generator
            .generate(&selection, LengthBucket::Short, Difficulty::Easy, Locale::En, Some("banking"))
            .await
            .unwrap();
        assert_eq!(artifact.expected_count, 1);
        assert_eq!(artifact.domain, "banking");
        assert!(artifact.annotated.contains("ERROR 1"));
        assert_eq!(artifact.clean.trim(), "int x;");
    }

    #[tokio::test]
    async fn regenerate_reuses_the_supplied_manifest_and_domain() {
        let response = "```java\nint x; // ERROR 1: Off By One\n```\n```java\nint x;\n```".to_string();
        let client = Arc::new(ScriptedModelClient::new(ModelRole::Generative, vec![response]));
        let generator = CodeGenerator::new(store(), client);
        let manifest = vec![];
        let artifact = generator
            .regenerate("inject the missing defect", manifest.clone(), "banking".to_string())
            .await
            .unwrap();
        assert_eq!(artifact.domain, "banking");
        assert_eq!(artifact.expected_count, manifest.len());
    }

    #[tokio::test]
    async fn empty_response_is_a_generator_error() {
        let client = Arc::new(ScriptedModelClient::new(ModelRole::Generative, vec![String::new()]));
        let generator = CodeGenerator::new(store(), client);
        let selection = DefectSelection::explicit(vec!["logical_off_by_one".into()]).unwrap();
        let result = generator
            .generate(&selection, LengthBucket::Short, Difficulty::Easy, Locale::En, None)
            .await;
        assert!(matches!(result, Err(GeneratorError::EmptyParse)));
    }
}
