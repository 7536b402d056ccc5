//! Markdown plan parser.
//!
//! Turns LLM output following the `## Week N: Title` / `**type**: ...`
//! convention into ordered [`Week`] records. The parser is deliberately
//! lossy and never fails: lines that match no pattern are ignored, a
//! document without week headers parses to zero weeks, and a document
//! whose weeks all come out empty gets a fixed default resource set so the
//! UI never shows an empty week.
//!
//! Resource lines are tested against an ordered, first-match-wins list of
//! matchers; a line can produce at most one resource.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Resource, ResourceKind, ResourceLink, Week};

/// `## Week 3: Hydraulic Systems`
static WEEK_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^## Week (\d+): (.+)$").expect("week header regex"));

/// The `**type**:` / `**type:**` prefix shared by linked and unlinked
/// resource lines. Both colon placements occur in the wild.
static RESOURCE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\*\*(video|pdf|interactive)(?::\*\*|\*\*:?)\s*").expect("prefix regex")
});

/// `**video**: [Title](url)`; the `generated:` variant of the URL is the
/// same pattern, [`ResourceLink::parse`] sorts the schemes out.
static LINKED_RESOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\*\*(video|pdf|interactive)(?::\*\*|\*\*:?)\s*\[([^\]]+)\]\(([^)]+)\)")
        .expect("linked resource regex")
});

/// An unlinked resource mention found on a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlinkedMention<'a> {
    pub kind: ResourceKind,
    /// The trimmed text after the `**type**:` prefix.
    pub title: &'a str,
    /// Byte offset of the end of the prefix, for in-place rewriting.
    pub prefix_end: usize,
}

/// Match a line against the linked-resource pattern.
pub fn linked_resource(line: &str) -> Option<(ResourceKind, String, ResourceLink)> {
    let caps = LINKED_RESOURCE.captures(line)?;
    let kind: ResourceKind = caps[1].parse().ok()?;
    let title = caps[2].trim().to_owned();
    let link = ResourceLink::parse(caps[3].trim());
    Some((kind, title, link))
}

/// Match a line against the unlinked-mention pattern.
///
/// The enrichment orchestrator uses this same matcher to find rewrite
/// targets, so "unlinked" has one definition: a resource prefix whose
/// trailing text carries neither a Markdown link nor a bare URL.
pub fn unlinked_mention(line: &str) -> Option<UnlinkedMention<'_>> {
    let m = RESOURCE_PREFIX.find(line)?;
    let caps = RESOURCE_PREFIX.captures(line)?;
    let kind: ResourceKind = caps[1].parse().ok()?;
    let title = line[m.end()..].trim();
    if title.is_empty() || title.contains('[') || title.contains("http") {
        return None;
    }
    Some(UnlinkedMention {
        kind,
        title,
        prefix_end: m.end(),
    })
}

/// Parse a Markdown plan into weeks. Never fails; see the module docs for
/// the lossy-by-design rules.
pub fn parse(markdown: &str) -> Vec<Week> {
    let mut weeks: Vec<Week> = Vec::new();
    let mut current: Option<Week> = None;

    for line in markdown.lines() {
        if let Some(caps) = WEEK_HEADER.captures(line) {
            if let Some(week) = current.take() {
                weeks.push(week);
            }
            // The regex guarantees digits; a number too large for u32 is
            // not a week header we recognize.
            if let Ok(number) = caps[1].parse::<u32>() {
                current = Some(Week {
                    number,
                    title: caps[2].trim().to_owned(),
                    resources: Vec::new(),
                });
            }
            continue;
        }

        let Some(week) = current.as_mut() else {
            // Text before the first week header is ignored.
            continue;
        };

        if let Some(resource) = match_resource_line(line, week) {
            week.resources.push(resource);
        }
    }

    if let Some(week) = current.take() {
        weeks.push(week);
    }

    // Never show an empty plan: when *every* week parsed without
    // resources, install the fixed default set. A single empty week among
    // populated ones stays empty.
    if !weeks.is_empty() && weeks.iter().all(|w| w.resources.is_empty()) {
        for week in &mut weeks {
            week.resources = default_resources(week.number, &week.title);
        }
    }

    weeks
}

/// First-match-wins resource matchers for one line.
fn match_resource_line(line: &str, week: &Week) -> Option<Resource> {
    let position = week.resources.len() + 1;

    if let Some((kind, title, link)) = linked_resource(line) {
        return Some(build_resource(week, position, kind, title, link));
    }

    if let Some(mention) = unlinked_mention(line) {
        return Some(build_resource(
            week,
            position,
            mention.kind,
            mention.title.to_owned(),
            ResourceLink::None,
        ));
    }

    None
}

fn build_resource(
    week: &Week,
    position: usize,
    kind: ResourceKind,
    title: String,
    link: ResourceLink,
) -> Resource {
    Resource {
        id: format!("{}-{}", week.number, position),
        title,
        kind,
        duration_label: "30 min".to_owned(),
        link,
        completed: false,
        description: format!("{kind} training resource for {}", week.title),
    }
}

/// The fixed 3-item default set: one video, one pdf, one interactive,
/// titled from the week, all unlinked.
fn default_resources(week_number: u32, week_title: &str) -> Vec<Resource> {
    let entries = [
        (
            ResourceKind::Video,
            format!("{week_title} - Video Training"),
            "30 min",
            format!("Video training for {week_title}"),
        ),
        (
            ResourceKind::Pdf,
            format!("{week_title} - Technical Documentation"),
            "45 min",
            format!("Technical documentation for {week_title}"),
        ),
        (
            ResourceKind::Interactive,
            format!("{week_title} - Interactive Module"),
            "60 min",
            format!("Interactive training module for {week_title}"),
        ),
    ];

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (kind, title, duration, description))| Resource {
            id: format!("{}-{}", week_number, i + 1),
            title,
            kind,
            duration_label: duration.to_owned(),
            link: ResourceLink::None,
            completed: false,
            description,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_week_header_number_and_title() {
        let weeks = parse("## Week 1: PLC Fundamentals\n");
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].number, 1);
        assert_eq!(weeks[0].title, "PLC Fundamentals");
    }

    #[test]
    fn parses_linked_resource() {
        let weeks = parse("## Week 2: Safety\n**video**: [Intro](http://x)\n");
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].number, 2);
        assert_eq!(weeks[0].title, "Safety");

        let resources = &weeks[0].resources;
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].id, "2-1");
        assert_eq!(resources[0].kind, ResourceKind::Video);
        assert_eq!(resources[0].title, "Intro");
        assert_eq!(resources[0].link, ResourceLink::External("http://x".into()));
    }

    #[test]
    fn parses_unlinked_resource() {
        let weeks = parse("## Week 1: Hydraulics\n- **pdf**: Hydraulic Maintenance Guide\n");
        let resources = &weeks[0].resources;
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].title, "Hydraulic Maintenance Guide");
        assert_eq!(resources[0].link, ResourceLink::None);
    }

    #[test]
    fn linked_line_yields_exactly_one_resource() {
        // The unlinked matcher would also hit this line; first match wins.
        let weeks = parse("## Week 1: Safety\n**video**: [Intro](http://x)\n");
        assert_eq!(weeks[0].resources.len(), 1);
    }

    #[test]
    fn generated_scheme_is_same_code_path() {
        let weeks = parse("## Week 1: PLC\n**pdf**: [Guide](generated:hello%20doc)\n");
        assert_eq!(
            weeks[0].resources[0].link,
            ResourceLink::GeneratedInline("hello doc".into())
        );
    }

    #[test]
    fn accepts_both_colon_placements_and_mixed_case() {
        let md = "## Week 1: Controls\n\
                  - **Video:** Motor Control Basics\n\
                  - **PDF**: Wiring Diagrams\n";
        let weeks = parse(md);
        assert_eq!(weeks[0].resources.len(), 2);
        assert_eq!(weeks[0].resources[0].kind, ResourceKind::Video);
        assert_eq!(weeks[0].resources[1].kind, ResourceKind::Pdf);
    }

    #[test]
    fn ids_are_week_and_position() {
        let md = "## Week 3: Pneumatics\n\
                  **video**: Air Systems Overview\n\
                  **pdf**: Valve Reference\n";
        let weeks = parse(md);
        assert_eq!(weeks[0].resources[0].id, "3-1");
        assert_eq!(weeks[0].resources[1].id, "3-2");
    }

    #[test]
    fn week_without_resources_stays_empty_when_others_have_some() {
        let md = "## Week 1: Intro\n\
                  ## Week 2: Depth\n\
                  **video**: Deep Dive\n";
        let weeks = parse(md);
        assert_eq!(weeks.len(), 2);
        assert!(weeks[0].resources.is_empty());
        assert_eq!(weeks[1].resources.len(), 1);
    }

    #[test]
    fn trailing_lines_belong_to_last_week() {
        let md = "## Week 1: Intro\n\
                  ## Week 2: Last\n\
                  some prose\n\
                  **interactive**: Final Exercise\n";
        let weeks = parse(md);
        assert_eq!(weeks[1].resources.len(), 1);
        assert_eq!(weeks[1].resources[0].title, "Final Exercise");
    }

    #[test]
    fn unmatched_lines_are_silently_ignored() {
        let md = "## Week 1: Intro\n\
                  random prose line\n\
                  **banner**: not a known kind\n\
                  **video**: Real Resource\n";
        let weeks = parse(md);
        assert_eq!(weeks[0].resources.len(), 1);
    }

    #[test]
    fn no_week_header_yields_zero_weeks() {
        assert!(parse("# Title\njust text\n**video**: orphan\n").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn all_empty_weeks_get_default_resources() {
        let md = "## Week 1: Basics\n## Week 2: Advanced\n";
        let weeks = parse(md);
        assert_eq!(weeks.len(), 2);
        for week in &weeks {
            assert_eq!(week.resources.len(), 3);
            let kinds: Vec<ResourceKind> = week.resources.iter().map(|r| r.kind).collect();
            assert_eq!(
                kinds,
                vec![
                    ResourceKind::Video,
                    ResourceKind::Pdf,
                    ResourceKind::Interactive
                ]
            );
            for resource in &week.resources {
                assert!(resource.title.contains(&week.title));
                assert!(resource.link.is_none());
            }
        }
        assert_eq!(weeks[1].resources[0].id, "2-1");
    }

    #[test]
    fn default_rule_does_not_fire_when_any_week_has_resources() {
        let md = "## Week 1: Basics\n## Week 2: Advanced\n**video**: Something\n";
        let weeks = parse(md);
        assert!(weeks[0].resources.is_empty());
        assert_eq!(weeks[1].resources.len(), 1);
    }

    #[test]
    fn week_numbers_need_not_be_contiguous() {
        let md = "## Week 1: A\n**video**: V\n## Week 5: B\n**pdf**: P\n";
        let weeks = parse(md);
        assert_eq!(weeks[0].number, 1);
        assert_eq!(weeks[1].number, 5);
        assert_eq!(weeks[1].resources[0].id, "5-1");
    }

    #[test]
    fn unlinked_mention_rejects_linked_and_url_text() {
        assert!(unlinked_mention("**video**: [T](http://x)").is_none());
        assert!(unlinked_mention("**video**: see http://example.com").is_none());
        assert!(unlinked_mention("**video**:   ").is_none());
        let m = unlinked_mention("- **video**: Plain Title").unwrap();
        assert_eq!(m.kind, ResourceKind::Video);
        assert_eq!(m.title, "Plain Title");
    }
}
