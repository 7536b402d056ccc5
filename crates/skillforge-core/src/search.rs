//! Web search for training resources.
//!
//! [`WebSearchClient`] talks to the YouTube Data API for videos and to a
//! Google Custom Search Engine for documents and interactive content. Both
//! are optional: a client built without the relevant API keys simply
//! reports no results, and so does any network or decode failure. The
//! enrichment pipeline treats a `None` here as "move on to the next
//! strategy", never as an error.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{ResourceKind, ResourceLink};

/// Words whose presence in a result title suggests off-topic content.
const NOISE_WORDS: [&str; 5] = ["music", "song", "game", "movie", "entertainment"];

/// Locates a link for a resource mention. Implemented by
/// [`WebSearchClient`] in production and by fakes in tests.
#[async_trait]
pub trait ResourceLocator: Send + Sync {
    /// Best link for the given title/kind/topic, or `None` when nothing
    /// suitable was found. Must not fail: lookup problems are logged and
    /// swallowed.
    async fn locate(&self, title: &str, kind: ResourceKind, topic: &str) -> Option<ResourceLink>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn ResourceLocator) {}
};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// API keys and endpoints for the web search backends.
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    pub youtube_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub google_cse_id: Option<String>,
    /// Override for tests; defaults to the real YouTube API.
    pub youtube_base_url: Option<String>,
    /// Override for tests; defaults to the real Custom Search API.
    pub google_base_url: Option<String>,
}

impl SearchConfig {
    /// Read keys from `SKILLFORGE_YOUTUBE_API_KEY`,
    /// `SKILLFORGE_GOOGLE_API_KEY` and `SKILLFORGE_GOOGLE_CSE_ID`.
    pub fn from_env() -> Self {
        Self {
            youtube_api_key: std::env::var("SKILLFORGE_YOUTUBE_API_KEY").ok(),
            google_api_key: std::env::var("SKILLFORGE_GOOGLE_API_KEY").ok(),
            google_cse_id: std::env::var("SKILLFORGE_GOOGLE_CSE_ID").ok(),
            youtube_base_url: None,
            google_base_url: None,
        }
    }

    /// Whether any backend is usable at all.
    pub fn any_backend(&self) -> bool {
        self.youtube_api_key.is_some()
            || (self.google_api_key.is_some() && self.google_cse_id.is_some())
    }
}

// ---------------------------------------------------------------------------
// Query construction and scoring
// ---------------------------------------------------------------------------

/// Build the search query for a resource title: the title plus topic and
/// domain context to keep generic titles on-topic.
pub fn build_query(title: &str, topic: &str) -> String {
    format!("{title} {topic} industrial training tutorial maintenance")
}

/// Score a search result against the query. Query words in the result
/// title are worth three points, words in the description one, an exact
/// phrase match five; noise words subtract two each. Floored at zero.
pub fn relevance_score(query: &str, result_title: &str, result_description: &str) -> u32 {
    let query_lower = query.to_lowercase();
    let title_lower = result_title.to_lowercase();
    let desc_lower = result_description.to_lowercase();

    let mut score: i64 = 0;
    for word in query_lower.split_whitespace().filter(|w| w.len() > 2) {
        if title_lower.contains(word) {
            score += 3;
        }
        if desc_lower.contains(word) {
            score += 1;
        }
    }
    if title_lower.contains(&query_lower) {
        score += 5;
    }
    for noise in NOISE_WORDS {
        if title_lower.contains(noise) {
            score -= 2;
        }
    }
    score.max(0) as u32
}

/// Highest-scored item; ties break toward the earlier result, matching
/// the backend's own ordering.
fn first_max<T>(items: impl Iterator<Item = (T, u32)>) -> Option<T> {
    let mut best: Option<(T, u32)> = None;
    for (item, score) in items {
        match &best {
            Some((_, best_score)) if *best_score >= score => {}
            _ => best = Some((item, score)),
        }
    }
    best.map(|(item, _)| item)
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
enum SearchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned status {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Deserialize)]
struct YouTubeSearchResponse {
    #[serde(default)]
    items: Vec<YouTubeItem>,
}

#[derive(Debug, Deserialize)]
struct YouTubeItem {
    id: YouTubeItemId,
    snippet: YouTubeSnippet,
}

#[derive(Debug, Deserialize)]
struct YouTubeItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YouTubeSnippet {
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct CseSearchResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const GOOGLE_CSE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// The production [`ResourceLocator`].
#[derive(Debug, Clone)]
pub struct WebSearchClient {
    http: reqwest::Client,
    config: SearchConfig,
}

impl WebSearchClient {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn youtube_url(&self) -> &str {
        self.config
            .youtube_base_url
            .as_deref()
            .unwrap_or(YOUTUBE_SEARCH_URL)
    }

    fn google_url(&self) -> &str {
        self.config
            .google_base_url
            .as_deref()
            .unwrap_or(GOOGLE_CSE_URL)
    }

    /// Search YouTube and return the most relevant video id.
    async fn search_youtube(&self, query: &str) -> Result<Option<ResourceLink>, SearchError> {
        let Some(key) = self.config.youtube_api_key.as_deref() else {
            debug!("no YouTube API key configured, skipping video search");
            return Ok(None);
        };

        let response = self
            .http
            .get(self.youtube_url())
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", "5"),
                ("q", query),
                ("key", key),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SearchError::Status(response.status()));
        }
        let body: YouTubeSearchResponse = response.json().await?;

        let scored = body.items.into_iter().filter_map(|item| {
            let id = item.id.video_id?;
            let score = relevance_score(query, &item.snippet.title, &item.snippet.description);
            Some((id, score))
        });

        Ok(first_max(scored).map(ResourceLink::YouTube))
    }

    /// Search the custom search engine and return the most relevant hit.
    async fn search_google(&self, query: &str) -> Result<Option<ResourceLink>, SearchError> {
        let (Some(key), Some(cse_id)) = (
            self.config.google_api_key.as_deref(),
            self.config.google_cse_id.as_deref(),
        ) else {
            debug!("no Google CSE credentials configured, skipping document search");
            return Ok(None);
        };

        let response = self
            .http
            .get(self.google_url())
            .query(&[("key", key), ("cx", cse_id), ("num", "5"), ("q", query)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SearchError::Status(response.status()));
        }
        let body: CseSearchResponse = response.json().await?;

        let scored = body.items.into_iter().map(|item| {
            let score = relevance_score(query, &item.title, &item.snippet);
            (item.link, score)
        });

        Ok(first_max(scored).map(ResourceLink::External))
    }
}

#[async_trait]
impl ResourceLocator for WebSearchClient {
    async fn locate(&self, title: &str, kind: ResourceKind, topic: &str) -> Option<ResourceLink> {
        let query = build_query(title, topic);
        let result = match kind {
            ResourceKind::Video => self.search_youtube(&query).await,
            ResourceKind::Pdf => {
                let query = format!("{query} filetype:pdf");
                self.search_google(&query).await
            }
            ResourceKind::Interactive => {
                let query = format!("{query} simulator interactive training");
                self.search_google(&query).await
            }
        };
        match result {
            Ok(link) => {
                if link.is_none() {
                    debug!(title, %kind, "web search found nothing");
                }
                link
            }
            Err(err) => {
                warn!(title, %kind, %err, "web search failed, continuing without it");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_includes_topic_and_domain_context() {
        let query = build_query("Pump Basics", "hydraulics");
        assert_eq!(
            query,
            "Pump Basics hydraulics industrial training tutorial maintenance"
        );
    }

    #[test]
    fn first_max_breaks_ties_toward_earlier_results() {
        let items = vec![("a", 3), ("b", 5), ("c", 5), ("d", 1)].into_iter();
        assert_eq!(first_max(items), Some("b"));
        assert_eq!(first_max(std::iter::empty::<(&str, u32)>()), None);
    }

    #[test]
    fn scoring_rewards_title_words_over_description_words() {
        let in_title = relevance_score("hydraulic pump", "Hydraulic Pump Guide", "");
        let in_desc = relevance_score("hydraulic pump", "Guide", "hydraulic pump details");
        assert!(in_title > in_desc);
    }

    #[test]
    fn scoring_rewards_exact_phrase() {
        let exact = relevance_score("plc basics", "plc basics", "");
        let scattered = relevance_score("plc basics", "basics of the plc", "");
        assert!(exact > scattered);
    }

    #[test]
    fn scoring_penalizes_noise_and_floors_at_zero() {
        assert_eq!(relevance_score("plc", "music song game movie", ""), 0);
        let clean = relevance_score("safety training", "Safety Training Video", "");
        let noisy = relevance_score("safety training", "Safety Training Music Video", "");
        assert!(noisy < clean);
    }

    #[test]
    fn short_query_words_do_not_score() {
        assert_eq!(relevance_score("to do it", "to do it all day", ""), 5);
        assert_eq!(relevance_score("ab cd", "ab cd", ""), 5);
    }

    #[tokio::test]
    async fn locate_without_keys_returns_none() {
        let client = WebSearchClient::new(SearchConfig::default());
        for kind in ResourceKind::ALL {
            assert!(client.locate("PLC Basics", kind, "plc").await.is_none());
        }
    }
}
