//! Domain types shared across the workspace.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The kind of a training resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Video,
    Pdf,
    Interactive,
}

impl ResourceKind {
    /// All kinds, in the order the default-resource rule uses them.
    pub const ALL: [ResourceKind; 3] = [Self::Video, Self::Pdf, Self::Interactive];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Video => "video",
            Self::Pdf => "pdf",
            Self::Interactive => "interactive",
        };
        f.write_str(s)
    }
}

impl FromStr for ResourceKind {
    type Err = ResourceKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "pdf" => Ok(Self::Pdf),
            "interactive" => Ok(Self::Interactive),
            other => Err(ResourceKindParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ResourceKind`] string.
#[derive(Debug, Clone, Error)]
#[error("invalid resource kind: {0:?} (expected video, pdf, or interactive)")]
pub struct ResourceKindParseError(pub String);

// ---------------------------------------------------------------------------

/// Where resource links may come from during enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeSource {
    /// Only the curated internal catalog (plus uploaded documents).
    Internal,
    /// Only the public catalog and web search.
    Public,
    /// Internal entries first, then public; web search enabled.
    Both,
}

impl KnowledgeSource {
    /// Whether this source allows reaching out to the public web.
    pub fn includes_public(self) -> bool {
        matches!(self, Self::Public | Self::Both)
    }

    /// Whether this source consults the internal catalog.
    pub fn includes_internal(self) -> bool {
        matches!(self, Self::Internal | Self::Both)
    }
}

impl Default for KnowledgeSource {
    fn default() -> Self {
        Self::Both
    }
}

impl fmt::Display for KnowledgeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Internal => "internal",
            Self::Public => "public",
            Self::Both => "both",
        };
        f.write_str(s)
    }
}

impl FromStr for KnowledgeSource {
    type Err = KnowledgeSourceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "internal" => Ok(Self::Internal),
            "public" => Ok(Self::Public),
            "both" => Ok(Self::Both),
            other => Err(KnowledgeSourceParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`KnowledgeSource`] string.
#[derive(Debug, Clone, Error)]
#[error("invalid knowledge source: {0:?} (expected internal, public, or both)")]
pub struct KnowledgeSourceParseError(pub String);

// ---------------------------------------------------------------------------

/// Self-reported proficiency in one technical area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    #[default]
    None,
    Basic,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    /// Skill gaps (none/basic) get priority in the generation prompt.
    pub fn is_gap(self) -> bool {
        matches!(self, Self::None | Self::Basic)
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Resource links
// ---------------------------------------------------------------------------

/// A resolved (or unresolved) resource link.
///
/// This is the one place that knows the pseudo-URL schemes; everything else
/// works with the variants. `GeneratedInline` holds the decoded text, not
/// the percent-encoded wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResourceLink {
    /// No link resolved yet.
    None,
    /// Plain external http(s) URL.
    External(String),
    /// YouTube video id.
    YouTube(String),
    /// Synthesized content embedded inline.
    GeneratedInline(String),
    /// Reference to an internal catalog entry by id.
    InternalRef(String),
}

impl ResourceLink {
    /// Parse a URL string into a link. Never fails: unknown forms are
    /// treated as external links.
    pub fn parse(url: &str) -> Self {
        if let Some(id) = url.strip_prefix("youtube:") {
            return Self::YouTube(id.to_owned());
        }
        if let Some(id) = url.strip_prefix("internal:") {
            return Self::InternalRef(id.to_owned());
        }
        if let Some(encoded) = url.strip_prefix("generated:") {
            return Self::GeneratedInline(decode_inline(encoded));
        }
        // data:text/plain;charset=utf-8,<encoded> is the other inline form
        // the synthesizer historically produced.
        if let Some(rest) = url.strip_prefix("data:text/plain") {
            if let Some((_, encoded)) = rest.split_once(',') {
                return Self::GeneratedInline(decode_inline(encoded));
            }
        }
        Self::External(url.to_owned())
    }

    /// Render the link back to its URL form, or `None` when unresolved.
    pub fn as_url(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::External(url) => Some(url.clone()),
            Self::YouTube(id) => Some(format!("youtube:{id}")),
            Self::GeneratedInline(content) => {
                Some(format!("generated:{}", urlencoding::encode(content)))
            }
            Self::InternalRef(id) => Some(format!("internal:{id}")),
        }
    }

    /// The browser-openable form of a YouTube link.
    pub fn watch_url(&self) -> Option<String> {
        match self {
            Self::YouTube(id) => Some(format!("https://www.youtube.com/watch?v={id}")),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn is_some(&self) -> bool {
        !self.is_none()
    }
}

fn decode_inline(encoded: &str) -> String {
    urlencoding::decode(encoded)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| encoded.to_owned())
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// One resource inside a training week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// `"<week>-<position>"`, 1-based. Not stable across regenerations.
    pub id: String,
    pub title: String,
    pub kind: ResourceKind,
    /// Free-text label ("30 min"), never a validated duration.
    pub duration_label: String,
    pub link: ResourceLink,
    /// Toggled by `skillforge complete`; the parser always starts a
    /// resource unchecked, so regenerating a plan clears it.
    pub completed: bool,
    pub description: String,
}

/// One week of a training plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Week {
    /// Unique and ascending, but not required to be contiguous.
    pub number: u32,
    pub title: String,
    pub resources: Vec<Resource>,
}

/// A parsed training plan. Replaced wholesale on every regeneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPlan {
    pub weeks: Vec<Week>,
    /// The (possibly enriched) Markdown the weeks were parsed from.
    pub source_markdown: String,
}

/// One entry in the persisted plan-generation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRecord {
    pub generated_at: DateTime<Utc>,
    pub generator: String,
    pub profile_name: String,
    pub markdown: String,
}

// ---------------------------------------------------------------------------
// Worker profile
// ---------------------------------------------------------------------------

/// The employee profile a plan is generated for. Deserialized from the
/// profile TOML file the CLI takes as input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerProfile {
    pub full_name: String,
    pub current_role: String,
    pub position: String,
    pub development_goal: String,
    pub equipment_used: Vec<String>,
    /// Free text, e.g. "Visual", "Reading/Writing", "Kinesthetic".
    pub learning_style: String,
    /// Free text, e.g. "English", "Spanish", "Spanish and English".
    pub language: String,
    /// Target duration in months; one month is four plan weeks.
    pub target_months: u32,
    /// Free text, e.g. "1-2" or "3-5".
    pub hours_per_week: String,
    pub preferred_schedule: String,
    pub mechanical: SkillLevel,
    pub electrical: SkillLevel,
    pub hydraulics: SkillLevel,
    pub pneumatics: SkillLevel,
    pub controls: SkillLevel,
    pub safety_ehs: SkillLevel,
    pub knowledge_source: KnowledgeSource,
}

impl Default for WorkerProfile {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            current_role: String::new(),
            position: String::new(),
            development_goal: String::new(),
            equipment_used: Vec::new(),
            learning_style: String::new(),
            language: String::new(),
            target_months: 1,
            hours_per_week: "1-2".to_owned(),
            preferred_schedule: String::new(),
            mechanical: SkillLevel::None,
            electrical: SkillLevel::None,
            hydraulics: SkillLevel::None,
            pneumatics: SkillLevel::None,
            controls: SkillLevel::None,
            safety_ehs: SkillLevel::None,
            knowledge_source: KnowledgeSource::Both,
        }
    }
}

impl WorkerProfile {
    /// Plan length in weeks: exactly four per target month, minimum four.
    pub fn total_weeks(&self) -> u32 {
        self.target_months.max(1) * 4
    }

    /// Lower bound of the free-text hours range ("3-5" -> 3), default 2.
    pub fn hours_lower_bound(&self) -> u32 {
        self.hours_per_week
            .split('-')
            .next()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(2)
    }

    /// Language the generated content must be written in.
    pub fn content_language(&self) -> &'static str {
        let lang = self.language.to_lowercase();
        let spanish = lang.contains("spanish") || lang.contains("español");
        if spanish && lang.contains("english") {
            "Spanish with technical terms in English"
        } else if spanish {
            "Spanish"
        } else {
            "English"
        }
    }

    /// Skill areas at none/basic level, formatted for the prompt.
    pub fn priority_skills(&self) -> String {
        let areas = [
            ("mechanical", self.mechanical),
            ("electrical", self.electrical),
            ("hydraulics", self.hydraulics),
            ("pneumatics", self.pneumatics),
            ("controls", self.controls),
            ("safety/EHS", self.safety_ehs),
        ];
        let gaps: Vec<String> = areas
            .iter()
            .filter(|(_, level)| level.is_gap())
            .map(|(name, level)| format!("{name} (currently {level})"))
            .collect();
        if gaps.is_empty() {
            "All technical areas for advancement".to_owned()
        } else {
            gaps.join(", ")
        }
    }
}

/// Metadata for a document uploaded into the internal catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub id: String,
    pub title: String,
    pub topics: Vec<String>,
    pub description: String,
    pub uploaded_at: DateTime<Utc>,
}
