//! Resource enrichment: rewrite bare resource mentions into links.
//!
//! The [`Enricher`] walks the plan Markdown line by line. Each unlinked
//! mention runs through an ordered strategy pipeline until one produces a
//! link:
//!
//! 1. catalog match (internal first when the profile allows both sources),
//!    accepted only when the match carries topical evidence;
//! 2. web search, when the profile allows public sources and a locator is
//!    configured;
//! 3. content synthesis, when a generator is configured;
//! 4. the generic catalog match kept from step 1, however weak.
//!
//! A mention can therefore only stay unlinked when the selected catalogs
//! are empty and neither a locator nor a generator is available. Already
//! linked lines are left untouched, so enrichment is idempotent.

use tracing::{debug, info};

use crate::catalog::{self, CatalogEntry, KindFilter};
use crate::generate::Generator;
use crate::model::{ResourceKind, ResourceLink, WorkerProfile};
use crate::plan::parser;
use crate::search::ResourceLocator;
use crate::synth;

/// The enrichment orchestrator. Built with the catalogs, optionally armed
/// with a web locator and a generator.
pub struct Enricher {
    internal: Vec<CatalogEntry>,
    public: Vec<CatalogEntry>,
    locator: Option<Box<dyn ResourceLocator>>,
    generator: Option<Box<dyn Generator>>,
}

impl Enricher {
    /// An enricher over the built-in catalogs, with no network or
    /// generation backends.
    pub fn new() -> Self {
        Self::with_catalogs(catalog::internal_catalog(), catalog::public_catalog())
    }

    pub fn with_catalogs(internal: Vec<CatalogEntry>, public: Vec<CatalogEntry>) -> Self {
        Self {
            internal,
            public,
            locator: None,
            generator: None,
        }
    }

    /// Extend the internal catalog with uploaded-document entries.
    pub fn add_internal_entries(&mut self, entries: Vec<CatalogEntry>) {
        self.internal.extend(entries);
    }

    pub fn with_locator(mut self, locator: Box<dyn ResourceLocator>) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn with_generator(mut self, generator: Box<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Enrich a Markdown plan, returning the rewritten document.
    ///
    /// Only unlinked mention lines change; everything else passes through
    /// byte for byte.
    pub async fn enrich(&self, markdown: &str, profile: &WorkerProfile) -> String {
        let mut out = String::with_capacity(markdown.len() + 256);
        let mut resolved = 0usize;

        for line in markdown.lines() {
            match parser::unlinked_mention(line) {
                Some(mention) => {
                    let link = self
                        .resolve(mention.title, mention.kind, profile)
                        .await;
                    match link.as_url() {
                        Some(url) => {
                            resolved += 1;
                            out.push_str(&line[..mention.prefix_end]);
                            out.push_str(&format!("[{}]({url})", mention.title));
                        }
                        None => out.push_str(line),
                    }
                }
                None => out.push_str(line),
            }
            out.push('\n');
        }

        if !markdown.ends_with('\n') && out.ends_with('\n') {
            out.pop();
        }

        info!(resolved, "plan enrichment finished");
        out
    }

    /// Run the strategy pipeline for one mention.
    pub async fn resolve(
        &self,
        title: &str,
        kind: ResourceKind,
        profile: &WorkerProfile,
    ) -> ResourceLink {
        let source = profile.knowledge_source;
        let topic = catalog::detect_topic(title);

        // Stage 1: catalog lookup. Internal entries take precedence when
        // both sources are allowed.
        let mut generic_fallback: Option<&CatalogEntry> = None;
        let mut catalogs: Vec<&[CatalogEntry]> = Vec::new();
        if source.includes_internal() {
            catalogs.push(&self.internal);
        }
        if source.includes_public() {
            catalogs.push(&self.public);
        }
        for entries in catalogs {
            match catalog::find_best_match_scored(title, KindFilter::Kind(kind), entries) {
                Some((entry, quality)) if quality.is_topical() => {
                    debug!(title, entry = %entry.id, ?quality, "catalog match");
                    return entry.link();
                }
                Some((entry, quality)) => {
                    debug!(title, entry = %entry.id, ?quality, "weak catalog match, held back");
                    if generic_fallback.is_none() {
                        generic_fallback = Some(entry);
                    }
                }
                None => {}
            }
        }

        // Stage 2: web search.
        if source.includes_public() {
            if let Some(locator) = &self.locator {
                if let Some(link) = locator.locate(title, kind, topic).await {
                    debug!(title, "web search match");
                    return link;
                }
            }
        }

        // Stage 3: synthesize the content ourselves.
        if let Some(generator) = &self.generator {
            debug!(title, "synthesizing content");
            return synth::synthesize(title, kind, topic, profile, generator.as_ref())
                .await
                .link;
        }

        // Stage 4: better a loosely related resource than none.
        match generic_fallback {
            Some(entry) => {
                debug!(title, entry = %entry.id, "falling back to generic catalog entry");
                entry.link()
            }
            None => ResourceLink::None,
        }
    }
}

impl Default for Enricher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use crate::model::KnowledgeSource;

    struct FakeLocator {
        link: Option<ResourceLink>,
    }

    #[async_trait]
    impl ResourceLocator for FakeLocator {
        async fn locate(
            &self,
            _title: &str,
            _kind: ResourceKind,
            _topic: &str,
        ) -> Option<ResourceLink> {
            self.link.clone()
        }
    }

    struct FakeGenerator;

    #[async_trait]
    impl Generator for FakeGenerator {
        fn name(&self) -> &str {
            "fake"
        }
        async fn generate_plan(&self, _profile: &WorkerProfile) -> Result<String> {
            Ok(String::new())
        }
        async fn generate_content(&self, _prompt: &str) -> Result<String> {
            Ok("synthesized body".to_owned())
        }
        async fn tutor_reply(&self, _message: &str, _context: &str) -> Result<String> {
            Ok(String::new())
        }
    }

    fn entry(id: &str, title: &str, kind: ResourceKind, topic: &str, url: &str) -> CatalogEntry {
        CatalogEntry {
            id: id.into(),
            title: title.into(),
            kind,
            topic: topic.into(),
            description: String::new(),
            url: url.into(),
        }
    }

    fn profile(source: KnowledgeSource) -> WorkerProfile {
        WorkerProfile {
            knowledge_source: source,
            ..WorkerProfile::default()
        }
    }

    #[tokio::test]
    async fn internal_catalog_wins_over_public_for_both() {
        let internal = vec![entry(
            "int",
            "Hydraulic Pump Guide",
            ResourceKind::Pdf,
            "hydraulics",
            "internal:int",
        )];
        let public = vec![entry(
            "pub",
            "Hydraulic Pump Guide",
            ResourceKind::Pdf,
            "hydraulics",
            "https://example.com/pub.pdf",
        )];
        let enricher = Enricher::with_catalogs(internal, public);
        let link = enricher
            .resolve(
                "Hydraulic Pump Guide",
                ResourceKind::Pdf,
                &profile(KnowledgeSource::Both),
            )
            .await;
        assert_eq!(link, ResourceLink::InternalRef("int".into()));
    }

    #[tokio::test]
    async fn internal_source_never_touches_public_catalog() {
        let public = vec![entry(
            "pub",
            "Hydraulic Pump Guide",
            ResourceKind::Pdf,
            "hydraulics",
            "https://example.com/pub.pdf",
        )];
        let enricher = Enricher::with_catalogs(Vec::new(), public);
        let link = enricher
            .resolve(
                "Hydraulic Pump Guide",
                ResourceKind::Pdf,
                &profile(KnowledgeSource::Internal),
            )
            .await;
        assert!(link.is_none());
    }

    #[tokio::test]
    async fn weak_match_defers_to_locator() {
        // Catalog has nothing topical for this title, so the locator runs.
        let internal = vec![entry(
            "int",
            "Welding Basics",
            ResourceKind::Video,
            "welding",
            "internal:int",
        )];
        let enricher = Enricher::with_catalogs(internal, Vec::new()).with_locator(Box::new(
            FakeLocator {
                link: Some(ResourceLink::YouTube("abc".into())),
            },
        ));
        let link = enricher
            .resolve(
                "Conveyor Belt Alignment",
                ResourceKind::Video,
                &profile(KnowledgeSource::Both),
            )
            .await;
        assert_eq!(link, ResourceLink::YouTube("abc".into()));
    }

    #[tokio::test]
    async fn synthesis_runs_when_search_finds_nothing() {
        let enricher = Enricher::with_catalogs(Vec::new(), Vec::new())
            .with_locator(Box::new(FakeLocator { link: None }))
            .with_generator(Box::new(FakeGenerator));
        let link = enricher
            .resolve(
                "Conveyor Belt Alignment",
                ResourceKind::Pdf,
                &profile(KnowledgeSource::Both),
            )
            .await;
        assert_eq!(link, ResourceLink::GeneratedInline("synthesized body".into()));
    }

    #[tokio::test]
    async fn generic_catalog_entry_is_last_resort() {
        let internal = vec![entry(
            "int",
            "Welding Basics",
            ResourceKind::Video,
            "welding",
            "internal:int",
        )];
        let enricher = Enricher::with_catalogs(internal, Vec::new());
        let link = enricher
            .resolve(
                "Conveyor Belt Alignment",
                ResourceKind::Video,
                &profile(KnowledgeSource::Both),
            )
            .await;
        assert_eq!(link, ResourceLink::InternalRef("int".into()));
    }

    #[tokio::test]
    async fn nothing_available_leaves_mention_unlinked() {
        let enricher = Enricher::with_catalogs(Vec::new(), Vec::new());
        let link = enricher
            .resolve(
                "Anything",
                ResourceKind::Pdf,
                &profile(KnowledgeSource::Both),
            )
            .await;
        assert!(link.is_none());
    }

    #[tokio::test]
    async fn enrich_rewrites_only_unlinked_mentions() {
        let internal = vec![entry(
            "int",
            "Hydraulic Pump Guide",
            ResourceKind::Pdf,
            "hydraulics",
            "internal:int",
        )];
        let enricher = Enricher::with_catalogs(internal, Vec::new());
        let md = "## Week 1: Hydraulics\n\
                  - **pdf:** Hydraulic Pump Guide\n\
                  - **video:** [Already Linked](https://example.com)\n\
                  free prose stays untouched\n";
        let out = enricher
            .enrich(md, &profile(KnowledgeSource::Internal))
            .await;
        assert!(out.contains("- **pdf:** [Hydraulic Pump Guide](internal:int)"));
        assert!(out.contains("- **video:** [Already Linked](https://example.com)"));
        assert!(out.contains("free prose stays untouched"));
    }

    #[tokio::test]
    async fn enrich_is_idempotent() {
        let internal = vec![entry(
            "int",
            "Hydraulic Pump Guide",
            ResourceKind::Pdf,
            "hydraulics",
            "internal:int",
        )];
        let enricher = Enricher::with_catalogs(internal, Vec::new());
        let md = "## Week 1: Hydraulics\n- **pdf:** Hydraulic Pump Guide\n";
        let p = profile(KnowledgeSource::Internal);
        let once = enricher.enrich(md, &p).await;
        let twice = enricher.enrich(&once, &p).await;
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn unresolvable_mention_passes_through_unchanged() {
        let enricher = Enricher::with_catalogs(Vec::new(), Vec::new());
        let md = "## Week 1: X\n- **pdf:** No Backing Resource\n";
        let out = enricher.enrich(md, &profile(KnowledgeSource::Both)).await;
        assert_eq!(out, md);
    }
}
