//! Local Ollama generator.
//!
//! Talks to a locally running Ollama daemon over its plain HTTP API. No
//! authentication; availability is probed via `/api/tags`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::WorkerProfile;

use super::Generator;
use super::prompt;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "mistral";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
struct TagModel {
    name: String,
}

/// Result of probing the local daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OllamaStatus {
    /// Daemon is up; lists the locally available model names.
    Available { models: Vec<String> },
    /// Daemon unreachable.
    Unavailable { reason: String },
}

/// Generator backed by a local Ollama daemon.
pub struct OllamaGenerator {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    pub fn new(base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
        }
    }

    /// Probe the daemon. Never fails: unreachability is a status, not an
    /// error.
    pub async fn check_status(&self) -> OllamaStatus {
        let url = format!("{}/api/tags", self.base_url);
        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let models = response
                    .json::<TagsResponse>()
                    .await
                    .map(|tags| tags.models.into_iter().map(|m| m.name).collect())
                    .unwrap_or_default();
                OllamaStatus::Available { models }
            }
            Ok(response) => OllamaStatus::Unavailable {
                reason: format!("daemon returned status {}", response.status()),
            },
            Err(err) => OllamaStatus::Unavailable {
                reason: err.to_string(),
            },
        }
    }

    async fn generate(&self, full_prompt: String, temperature: f32) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt: full_prompt,
            stream: false,
            options: GenerateOptions { temperature },
        };

        debug!(model = %self.model, %url, "sending ollama generate request");
        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("ollama request failed (is the daemon running?)")?
            .error_for_status()
            .context("ollama returned an error status")?;
        let body: GenerateResponse = response
            .json()
            .await
            .context("unreadable ollama response")?;
        Ok(body.response)
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate_plan(&self, profile: &WorkerProfile) -> Result<String> {
        let full = format!(
            "{}\n\n{}",
            prompt::PLAN_SYSTEM_PROMPT,
            prompt::build_plan_prompt(profile)
        );
        self.generate(full, 0.3).await
    }

    async fn generate_content(&self, content_prompt: &str) -> Result<String> {
        let full = format!("{}\n\n{content_prompt}", prompt::CONTENT_SYSTEM_PROMPT);
        self.generate(full, 0.7).await
    }

    async fn tutor_reply(&self, message: &str, context: &str) -> Result<String> {
        let full = format!(
            "{}\n\n{}",
            prompt::TUTOR_SYSTEM_PROMPT,
            prompt::build_tutor_prompt(message, context)
        );
        self.generate(full, 0.7).await
    }
}
