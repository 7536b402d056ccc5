//! Plan and content generation backends.
//!
//! Each concrete generator (OpenAI, Ollama, the offline demo) implements
//! the [`Generator`] trait. The trait is intentionally object-safe so it
//! can be stored as `Box<dyn Generator>` in the [`GeneratorRegistry`].

pub mod demo;
pub mod ollama;
pub mod openai;
pub mod prompt;

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use crate::model::WorkerProfile;

pub use demo::DemoGenerator;
pub use ollama::{OllamaGenerator, OllamaStatus};
pub use openai::OpenAiGenerator;

/// Adapter interface for text-generation backends.
///
/// All three operations return plain text. Plan generation must follow the
/// `## Week N: Title` Markdown convention; that contract lives in the
/// prompts, and [`DemoGenerator`] honors it directly.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Registry name for this generator (e.g. "openai").
    fn name(&self) -> &str;

    /// Generate a full training plan in Markdown from a worker profile.
    async fn generate_plan(&self, profile: &WorkerProfile) -> Result<String>;

    /// Generate study content from a prepared prompt.
    async fn generate_content(&self, prompt: &str) -> Result<String>;

    /// Answer a tutoring question given the current plan as context.
    async fn tutor_reply(&self, message: &str, context: &str) -> Result<String>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn Generator) {}
};

/// A collection of registered [`Generator`] implementations, keyed by name.
#[derive(Default)]
pub struct GeneratorRegistry {
    generators: HashMap<String, Box<dyn Generator>>,
}

impl GeneratorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a generator under the name returned by
    /// [`Generator::name`]. A generator already registered under the same
    /// name is replaced and returned.
    pub fn register(&mut self, generator: impl Generator + 'static) -> Option<Box<dyn Generator>> {
        let name = generator.name().to_string();
        self.generators.insert(name, Box::new(generator))
    }

    /// Look up a generator by name.
    pub fn get(&self, name: &str) -> Option<&dyn Generator> {
        self.generators.get(name).map(|b| b.as_ref())
    }

    /// List the names of all registered generators.
    ///
    /// The order is not guaranteed (HashMap iteration order).
    pub fn list(&self) -> Vec<&str> {
        self.generators.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("generators", &self.generators.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeGenerator {
        generator_name: String,
    }

    impl FakeGenerator {
        fn new(name: &str) -> Self {
            Self {
                generator_name: name.to_string(),
            }
        }
    }

    #[async_trait]
    impl Generator for FakeGenerator {
        fn name(&self) -> &str {
            &self.generator_name
        }

        async fn generate_plan(&self, _profile: &WorkerProfile) -> Result<String> {
            Ok("## Week 1: Placeholder\n".to_string())
        }

        async fn generate_content(&self, _prompt: &str) -> Result<String> {
            Ok(String::new())
        }

        async fn tutor_reply(&self, _message: &str, _context: &str) -> Result<String> {
            Ok(String::new())
        }
    }

    #[test]
    fn registry_starts_empty() {
        let registry = GeneratorRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.list().is_empty());
    }

    #[test]
    fn register_and_get() {
        let mut registry = GeneratorRegistry::new();
        let old = registry.register(FakeGenerator::new("alpha"));
        assert!(old.is_none());

        let generator = registry.get("alpha");
        assert!(generator.is_some());
        assert_eq!(generator.unwrap().name(), "alpha");
    }

    #[test]
    fn register_replaces_existing() {
        let mut registry = GeneratorRegistry::new();
        registry.register(FakeGenerator::new("alpha"));
        let old = registry.register(FakeGenerator::new("alpha"));
        assert!(old.is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn get_missing_returns_none() {
        let registry = GeneratorRegistry::new();
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn list_returns_all_names() {
        let mut registry = GeneratorRegistry::new();
        registry.register(FakeGenerator::new("alpha"));
        registry.register(FakeGenerator::new("beta"));

        let mut names = registry.list();
        names.sort();
        assert_eq!(names, vec!["alpha", "beta"]);
    }
}
