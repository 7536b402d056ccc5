//! OpenAI-compatible chat-completions generator.
//!
//! Speaks the standard `/v1/chat/completions` shape but also accepts the
//! trimmed `{ "content": ... }` body that simple proxies return, so the
//! endpoint can point at either the real API or a relay.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::WorkerProfile;

use super::Generator;
use super::prompt;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

const PLAN_MODEL: &str = "gpt-4";
const CONTENT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body, tolerant of both the standard API shape and the
/// flattened proxy shape.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Generator backed by an OpenAI-compatible endpoint.
pub struct OpenAiGenerator {
    http: reqwest::Client,
    endpoint: String,
    /// Bearer token; optional because proxies often authenticate upstream.
    api_key: Option<String>,
}

impl OpenAiGenerator {
    pub fn new(endpoint: Option<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()),
            api_key,
        }
    }

    async fn chat(
        &self,
        model: &str,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
            max_tokens,
        };

        debug!(model, endpoint = %self.endpoint, "sending chat completion request");
        let mut builder = self.http.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder
            .send()
            .await
            .context("chat completion request failed")?;
        let status = response.status();
        let body: ChatResponse = response
            .json()
            .await
            .with_context(|| format!("unreadable chat completion response (status {status})"))?;

        if let Some(err) = body.error {
            bail!("chat completion error: {}", err.message);
        }
        if let Some(content) = body.content {
            return Ok(content);
        }
        if let Some(choice) = body.choices.into_iter().next() {
            return Ok(choice.message.content);
        }
        bail!("chat completion response contained no content (status {status})")
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate_plan(&self, profile: &WorkerProfile) -> Result<String> {
        let user = prompt::build_plan_prompt(profile);
        self.chat(PLAN_MODEL, prompt::PLAN_SYSTEM_PROMPT, &user, 0.3, 4000)
            .await
    }

    async fn generate_content(&self, content_prompt: &str) -> Result<String> {
        self.chat(
            CONTENT_MODEL,
            prompt::CONTENT_SYSTEM_PROMPT,
            content_prompt,
            0.7,
            1500,
        )
        .await
    }

    async fn tutor_reply(&self, message: &str, context: &str) -> Result<String> {
        let user = prompt::build_tutor_prompt(message, context);
        self.chat(CONTENT_MODEL, prompt::TUTOR_SYSTEM_PROMPT, &user, 0.7, 400)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parses_proxy_shape() {
        let body: ChatResponse = serde_json::from_str(r#"{"content": "hello"}"#).unwrap();
        assert_eq!(body.content.as_deref(), Some("hello"));
        assert!(body.choices.is_empty());
    }

    #[test]
    fn response_parses_standard_shape() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "hi"}}]}"#,
        )
        .unwrap();
        assert_eq!(body.choices[0].message.content, "hi");
    }

    #[test]
    fn response_parses_error_shape() {
        let body: ChatResponse =
            serde_json::from_str(r#"{"error": {"message": "rate limited"}}"#).unwrap();
        assert_eq!(body.error.unwrap().message, "rate limited");
    }
}
