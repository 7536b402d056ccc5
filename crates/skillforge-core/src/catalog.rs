//! The resource catalog and the best-effort matcher.
//!
//! Two built-in catalogs ship with the tool: the curated internal document
//! set and a public list of well-known external resources. Uploaded
//! documents extend the internal catalog at runtime.
//!
//! [`find_best_match`] is a total fallback chain: given a non-empty
//! catalog it always returns *something*. Callers must not assume the
//! answer is topically relevant; [`MatchQuality`] tells them how good it
//! actually is.

use serde::{Deserialize, Serialize};

use crate::model::{ResourceKind, ResourceLink, UploadedDocument};

/// Domain topic keywords used for fuzzy topic matching and web-query
/// enhancement.
pub const TOPIC_KEYWORDS: [&str; 9] = [
    "plc",
    "electrical",
    "mechanical",
    "hydraulics",
    "pneumatics",
    "safety",
    "controls",
    "automation",
    "manufacturing",
];

/// Topic assigned when a title matches no keyword.
pub const DEFAULT_TOPIC: &str = "industrial";

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub kind: ResourceKind,
    /// Space-separated topic words, matched as substrings.
    pub topic: String,
    pub description: String,
    /// Plain URL or an `internal:<id>` reference.
    pub url: String,
}

impl CatalogEntry {
    /// The entry's URL as a typed link.
    pub fn link(&self) -> ResourceLink {
        ResourceLink::parse(&self.url)
    }
}

/// Kind constraint for a catalog lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindFilter {
    Kind(ResourceKind),
    Any,
}

impl KindFilter {
    fn accepts(self, entry: &CatalogEntry) -> bool {
        match self {
            Self::Kind(kind) => entry.kind == kind,
            Self::Any => true,
        }
    }
}

/// How a match was found. The generic stages exist to honor the "always
/// resolve a link" policy; enrichment treats them as weak evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchQuality {
    /// Query words found in the entry's title or topic.
    Keyword,
    /// A domain topic keyword in the query matched the entry's topic.
    Topic,
    /// Any entry of the requested kind.
    TypeOnly,
    /// First entry of the whole catalog.
    AnyEntry,
}

impl MatchQuality {
    /// Keyword and topic matches carry topical evidence; the rest are
    /// generic fallbacks.
    pub fn is_topical(self) -> bool {
        matches!(self, Self::Keyword | Self::Topic)
    }
}

/// Lowercase and strip everything but letters, digits and spaces.
fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect()
}

/// Detect the domain topic of a title, defaulting to
/// [`DEFAULT_TOPIC`].
pub fn detect_topic(title: &str) -> &'static str {
    let clean = normalize(title);
    TOPIC_KEYWORDS
        .iter()
        .find(|kw| clean.contains(*kw))
        .copied()
        .unwrap_or(DEFAULT_TOPIC)
}

/// Find the best catalog entry for a title and kind.
///
/// Returns `None` only when the catalog is empty. This is a deliberate
/// best-effort-over-correctness policy.
pub fn find_best_match<'a>(
    title: &str,
    filter: KindFilter,
    catalog: &'a [CatalogEntry],
) -> Option<&'a CatalogEntry> {
    find_best_match_scored(title, filter, catalog).map(|(entry, _)| entry)
}

/// [`find_best_match`] with the match quality attached.
pub fn find_best_match_scored<'a>(
    title: &str,
    filter: KindFilter,
    catalog: &'a [CatalogEntry],
) -> Option<(&'a CatalogEntry, MatchQuality)> {
    let clean_title = normalize(title);
    let words: Vec<&str> = clean_title
        .split(' ')
        .filter(|word| word.len() > 2)
        .collect();

    let typed: Vec<&CatalogEntry> = catalog.iter().filter(|e| filter.accepts(e)).collect();

    // Stages 1-2 against the requested kind.
    if let Some(entry) = word_match(&words, &typed) {
        return Some((entry, MatchQuality::Keyword));
    }
    if let Some(entry) = topic_match(&clean_title, &typed) {
        return Some((entry, MatchQuality::Topic));
    }

    // Stage 3: any entry of the requested kind.
    if let Some(entry) = typed.first() {
        return Some((entry, MatchQuality::TypeOnly));
    }

    // Stage 4: the requested kind yielded nothing at all; retry the
    // topical stages ignoring the kind constraint.
    if filter != KindFilter::Any {
        let all: Vec<&CatalogEntry> = catalog.iter().collect();
        if let Some(entry) = word_match(&words, &all) {
            return Some((entry, MatchQuality::Keyword));
        }
        if let Some(entry) = topic_match(&clean_title, &all) {
            return Some((entry, MatchQuality::Topic));
        }
    }

    // Stage 5: first entry of the whole catalog, or nothing.
    catalog.first().map(|entry| (entry, MatchQuality::AnyEntry))
}

/// Stage 1: per query word, collect entries whose title or topic contains
/// the word; rank candidates by how many query words appear in their
/// title, first maximum wins.
fn word_match<'a>(words: &[&str], entries: &[&'a CatalogEntry]) -> Option<&'a CatalogEntry> {
    for word in words {
        let candidates: Vec<&CatalogEntry> = entries
            .iter()
            .filter(|e| {
                normalize(&e.title).contains(word) || normalize(&e.topic).contains(word)
            })
            .copied()
            .collect();

        if candidates.is_empty() {
            continue;
        }

        let mut best = candidates[0];
        let mut best_count = title_word_count(words, best);
        for candidate in &candidates[1..] {
            let count = title_word_count(words, candidate);
            if count > best_count {
                best = candidate;
                best_count = count;
            }
        }
        return Some(best);
    }
    None
}

fn title_word_count(words: &[&str], entry: &CatalogEntry) -> usize {
    let title = normalize(&entry.title);
    words.iter().filter(|word| title.contains(**word)).count()
}

/// Stage 2: a domain topic keyword found in the query selects any entry
/// whose topic contains that keyword.
fn topic_match<'a>(clean_title: &str, entries: &[&'a CatalogEntry]) -> Option<&'a CatalogEntry> {
    let keyword = TOPIC_KEYWORDS.iter().find(|kw| clean_title.contains(*kw))?;
    entries
        .iter()
        .find(|e| normalize(&e.topic).contains(keyword))
        .copied()
}

// ---------------------------------------------------------------------------
// Built-in catalogs
// ---------------------------------------------------------------------------

fn entry(
    id: &str,
    title: &str,
    kind: ResourceKind,
    topic: &str,
    description: &str,
    url: &str,
) -> CatalogEntry {
    CatalogEntry {
        id: id.to_owned(),
        title: title.to_owned(),
        kind,
        topic: topic.to_owned(),
        description: description.to_owned(),
        url: url.to_owned(),
    }
}

/// The curated internal document set. Entries reference themselves with
/// `internal:` links; the CLI resolves those to stored content.
pub fn internal_catalog() -> Vec<CatalogEntry> {
    use ResourceKind::Pdf;
    vec![
        entry(
            "plc-basics",
            "Siemens PLC Basics Guide",
            Pdf,
            "plc siemens programming automation controls troubleshooting maintenance",
            "Basic guide to Siemens PLC programming and troubleshooting",
            "internal:plc-basics",
        ),
        entry(
            "lockout-tagout",
            "Lockout Tagout Safety Procedures",
            Pdf,
            "safety lockout tagout loto maintenance procedures electrical mechanical",
            "Complete lockout tagout procedures and safety guidelines",
            "internal:lockout-tagout",
        ),
        entry(
            "hydraulic-systems",
            "Hydraulic Systems Maintenance",
            Pdf,
            "hydraulic hydraulics maintenance systems fluid pump mechanical industrial",
            "Hydraulic system maintenance and troubleshooting guide",
            "internal:hydraulic-systems",
        ),
        entry(
            "electrical-safety",
            "Electrical Safety Standards",
            Pdf,
            "electrical safety standards procedures maintenance industrial equipment",
            "Electrical safety standards and maintenance procedures",
            "internal:electrical-safety",
        ),
        entry(
            "maintenance-checklist",
            "Preventive Maintenance Checklist",
            Pdf,
            "maintenance preventive checklist procedures inspection industrial equipment safety",
            "Comprehensive preventive maintenance checklist and procedures",
            "internal:maintenance-checklist",
        ),
        entry(
            "industrial-overview",
            "Industrial Equipment Overview",
            Pdf,
            "industrial equipment overview maintenance safety procedures general",
            "General overview of industrial equipment and maintenance procedures",
            "internal:industrial-overview",
        ),
    ]
}

/// The public resource list: well-known external training material across
/// the domain topics.
pub fn public_catalog() -> Vec<CatalogEntry> {
    use ResourceKind::{Interactive, Pdf, Video};
    vec![
        entry(
            "pub-plc-video",
            "PLC Programming Tutorial for Beginners",
            Video,
            "plc programming automation controls",
            "Introductory PLC programming walkthrough",
            "https://www.youtube.com/watch?v=pKZR4BLLItA",
        ),
        entry(
            "pub-plc-sim",
            "PLC Ladder Logic Simulator",
            Interactive,
            "plc programming automation simulator",
            "Browser-based ladder logic practice environment",
            "https://www.plcsimulator.online/",
        ),
        entry(
            "pub-electrical-video",
            "Industrial Electrical Systems Explained",
            Video,
            "electrical circuits wiring controls",
            "Overview of industrial electrical distribution and control",
            "https://www.youtube.com/watch?v=mc979OhitAg",
        ),
        entry(
            "pub-electrical-pdf",
            "Electrical Safety in the Workplace",
            Pdf,
            "electrical safety standards procedures",
            "OSHA electrical safety reference document",
            "https://www.osha.gov/sites/default/files/publications/3075.pdf",
        ),
        entry(
            "pub-hydraulics-video",
            "Hydraulic Systems Fundamentals",
            Video,
            "hydraulics fluid pump mechanical",
            "How hydraulic power systems work, component by component",
            "https://www.youtube.com/watch?v=fFUn2Y2Yno8",
        ),
        entry(
            "pub-pneumatics-pdf",
            "Pneumatic Systems Handbook",
            Pdf,
            "pneumatics air compressor valve mechanical",
            "Reference handbook for compressed-air systems",
            "https://www.smcusa.com/assets/pneumatics-basics.pdf",
        ),
        entry(
            "pub-safety-video",
            "Lockout Tagout Training",
            Video,
            "safety lockout tagout procedures maintenance",
            "LOTO procedure demonstration for maintenance staff",
            "https://www.youtube.com/watch?v=fXYcQEzNnmE",
        ),
        entry(
            "pub-maintenance-pdf",
            "Preventive Maintenance Best Practices",
            Pdf,
            "maintenance preventive inspection manufacturing",
            "Planning and executing preventive maintenance programs",
            "https://www.nist.gov/system/files/documents/2019/01/14/pm-guide.pdf",
        ),
        entry(
            "pub-automation-interactive",
            "Factory Automation Simulator",
            Interactive,
            "automation manufacturing controls simulator",
            "Interactive simulation of an automated production line",
            "https://www.factoryio.com/",
        ),
    ]
}

/// Convert uploaded-document metadata into internal catalog entries.
pub fn uploaded_entries(documents: &[UploadedDocument]) -> Vec<CatalogEntry> {
    documents
        .iter()
        .map(|doc| CatalogEntry {
            id: doc.id.clone(),
            title: doc.title.clone(),
            kind: ResourceKind::Pdf,
            topic: doc.topics.join(" "),
            description: doc.description.clone(),
            url: format!("internal:{}", doc.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_catalog() -> Vec<CatalogEntry> {
        vec![
            entry(
                "a",
                "Hydraulic Pump Maintenance",
                ResourceKind::Pdf,
                "hydraulics pump",
                "",
                "https://example.com/a",
            ),
            entry(
                "b",
                "PLC Ladder Logic Basics",
                ResourceKind::Video,
                "plc programming",
                "",
                "https://example.com/b",
            ),
            entry(
                "c",
                "General Safety Overview",
                ResourceKind::Video,
                "safety",
                "",
                "https://example.com/c",
            ),
        ]
    }

    #[test]
    fn empty_catalog_returns_none() {
        assert!(find_best_match("anything", KindFilter::Any, &[]).is_none());
    }

    #[test]
    fn non_empty_catalog_never_returns_none() {
        let catalog = small_catalog();
        for title in ["hydraulic pump", "plc", "zzz unrelated qqq", ""] {
            for filter in [
                KindFilter::Any,
                KindFilter::Kind(ResourceKind::Video),
                KindFilter::Kind(ResourceKind::Pdf),
                KindFilter::Kind(ResourceKind::Interactive),
            ] {
                assert!(
                    find_best_match(title, filter, &catalog).is_some(),
                    "no match for {title:?} with {filter:?}"
                );
            }
        }
    }

    #[test]
    fn exact_title_match_returns_that_entry() {
        let catalog = small_catalog();
        let found = find_best_match(
            "Hydraulic Pump Maintenance!",
            KindFilter::Kind(ResourceKind::Pdf),
            &catalog,
        )
        .unwrap();
        assert_eq!(found.id, "a");
    }

    #[test]
    fn word_match_ranks_by_title_overlap() {
        let catalog = vec![
            entry(
                "one-hit",
                "Hydraulic Reference",
                ResourceKind::Pdf,
                "hydraulics",
                "",
                "u1",
            ),
            entry(
                "two-hits",
                "Hydraulic Pump Reference",
                ResourceKind::Pdf,
                "hydraulics",
                "",
                "u2",
            ),
        ];
        let found = find_best_match(
            "hydraulic pump overview",
            KindFilter::Kind(ResourceKind::Pdf),
            &catalog,
        )
        .unwrap();
        assert_eq!(found.id, "two-hits");
    }

    #[test]
    fn topic_keyword_fallback_applies() {
        let catalog = small_catalog();
        // No title word overlaps, but "safety" is a domain keyword.
        let (found, quality) = find_best_match_scored(
            "safety",
            KindFilter::Kind(ResourceKind::Video),
            &catalog,
        )
        .unwrap();
        assert_eq!(found.id, "c");
        assert!(quality.is_topical());
    }

    #[test]
    fn type_only_fallback_when_nothing_topical() {
        let catalog = small_catalog();
        let (found, quality) = find_best_match_scored(
            "zzz unrelated qqq",
            KindFilter::Kind(ResourceKind::Video),
            &catalog,
        )
        .unwrap();
        assert_eq!(found.kind, ResourceKind::Video);
        assert_eq!(quality, MatchQuality::TypeOnly);
    }

    #[test]
    fn missing_kind_retries_without_type_constraint() {
        let catalog = vec![entry(
            "a",
            "Hydraulic Pump Maintenance",
            ResourceKind::Pdf,
            "hydraulics pump",
            "",
            "u",
        )];
        // No interactive entries exist; the hydraulic pdf should still win
        // on word evidence.
        let (found, quality) = find_best_match_scored(
            "hydraulic pump",
            KindFilter::Kind(ResourceKind::Interactive),
            &catalog,
        )
        .unwrap();
        assert_eq!(found.id, "a");
        assert_eq!(quality, MatchQuality::Keyword);
    }

    #[test]
    fn final_fallback_is_first_entry() {
        let catalog = vec![entry(
            "only",
            "Welding Basics",
            ResourceKind::Pdf,
            "welding",
            "",
            "u",
        )];
        let (found, quality) = find_best_match_scored(
            "zzz",
            KindFilter::Kind(ResourceKind::Video),
            &catalog,
        )
        .unwrap();
        assert_eq!(found.id, "only");
        assert_eq!(quality, MatchQuality::AnyEntry);
    }

    #[test]
    fn short_words_are_ignored_in_queries() {
        let catalog = small_catalog();
        // "to" and "of" are <= 2 chars and must not drive matching.
        let (_, quality) =
            find_best_match_scored("to of it", KindFilter::Any, &catalog).unwrap();
        assert!(!quality.is_topical());
    }

    #[test]
    fn detect_topic_finds_keyword_or_defaults() {
        assert_eq!(detect_topic("Intro to PLC Programming"), "plc");
        assert_eq!(detect_topic("Hydraulics 101"), "hydraulics");
        assert_eq!(detect_topic("Time Management"), DEFAULT_TOPIC);
    }

    #[test]
    fn built_in_catalogs_are_well_formed() {
        let internal = internal_catalog();
        assert!(!internal.is_empty());
        for e in &internal {
            assert_eq!(e.url, format!("internal:{}", e.id));
        }
        let public = public_catalog();
        assert!(!public.is_empty());
        assert!(public.iter().any(|e| e.kind == ResourceKind::Video));
        assert!(public.iter().any(|e| e.kind == ResourceKind::Pdf));
        assert!(public.iter().any(|e| e.kind == ResourceKind::Interactive));
    }
}
