//! Wiring: build generators and the enricher from resolved config.

use anyhow::{Result, bail};

use skillforge_core::catalog;
use skillforge_core::enrich::Enricher;
use skillforge_core::generate::{
    DemoGenerator, Generator, GeneratorRegistry, OllamaGenerator, OpenAiGenerator,
};
use skillforge_core::model::UploadedDocument;
use skillforge_core::search::WebSearchClient;

use crate::config::SkillforgeConfig;

/// Build the registry with every backend the config can support.
pub fn build_registry(config: &SkillforgeConfig) -> GeneratorRegistry {
    let mut registry = GeneratorRegistry::new();
    registry.register(DemoGenerator::new());
    registry.register(OllamaGenerator::new(
        config.ollama_url.clone(),
        config.ollama_model.clone(),
    ));
    registry.register(OpenAiGenerator::new(
        config.openai_endpoint.clone(),
        config.openai_api_key.clone(),
    ));
    registry
}

/// Construct the configured generator, standalone (the registry holds
/// borrows; the enricher needs ownership).
pub fn build_generator(config: &SkillforgeConfig, name: &str) -> Result<Box<dyn Generator>> {
    match name {
        "demo" => Ok(Box::new(DemoGenerator::new())),
        "ollama" => Ok(Box::new(OllamaGenerator::new(
            config.ollama_url.clone(),
            config.ollama_model.clone(),
        ))),
        "openai" => Ok(Box::new(OpenAiGenerator::new(
            config.openai_endpoint.clone(),
            config.openai_api_key.clone(),
        ))),
        other => {
            let mut available: Vec<String> = build_registry(config)
                .list()
                .into_iter()
                .map(String::from)
                .collect();
            available.sort();
            bail!(
                "unknown generator backend {other:?} (available: {})",
                available.join(", ")
            )
        }
    }
}

/// Build the full enrichment pipeline: built-in catalogs plus uploaded
/// documents, web search when any API key is configured, and the active
/// generator for content synthesis.
pub fn build_enricher(
    config: &SkillforgeConfig,
    backend: &str,
    uploaded: &[UploadedDocument],
) -> Result<Enricher> {
    let mut enricher = Enricher::new();
    enricher.add_internal_entries(catalog::uploaded_entries(uploaded));
    if config.search.any_backend() {
        enricher =
            enricher.with_locator(Box::new(WebSearchClient::new(config.search.clone())));
    }
    let generator = build_generator(config, backend)?;
    Ok(enricher.with_generator(generator))
}
