// OpenAI Completion Provider
//
// Implements MilestoneSuggester against an OpenAI-compatible completions API.
// One request per suggestion: no retry, no fallback text.

use async_trait::async_trait;
use memorylane_core::{
    build_milestone_prompt, MilestoneSuggester, TimelineError, MILESTONE_MAX_TOKENS,
};
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::Instrument;

use crate::types::{CompletionRequest, CompletionResponse};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo-instruct";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors from the completion provider
#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("OPENAI_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("Invalid provider configuration: {0}")]
    Config(String),

    #[error("Failed to send completion request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("OpenAI API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("No choices in completion response")]
    EmptyResponse,
}

/// Connection settings for the completion provider
#[derive(Clone)]
pub struct CompletionConfig {
    pub api_key: String,
    /// Base URL without the `/completions` suffix
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CompletionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_COMPLETION_MODEL.to_string(),
            max_tokens: MILESTONE_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Build from environment variables
    ///
    /// - `OPENAI_API_KEY` (required)
    /// - `OPENAI_BASE_URL` (default: https://api.openai.com/v1)
    /// - `OPENAI_MODEL` (default: gpt-3.5-turbo-instruct)
    /// - `OPENAI_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, SuggestionError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build using an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SuggestionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = var("OPENAI_API_KEY").ok_or(SuggestionError::MissingApiKey)?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = var("OPENAI_BASE_URL") {
            config = config.with_base_url(base_url.trim());
        }
        if let Some(model) = var("OPENAI_MODEL") {
            config = config.with_model(model.trim());
        }
        if let Some(raw) = var("OPENAI_TIMEOUT_SECS") {
            let secs = match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(SuggestionError::Config(format!(
                        "OPENAI_TIMEOUT_SECS must be a positive number of seconds, got '{}'",
                        raw
                    )))
                }
            };
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn completions_url(&self) -> String {
        format!("{}/completions", self.base_url)
    }
}

/// OpenAI completions client
#[derive(Clone)]
pub struct OpenAiCompletionClient {
    client: Client,
    config: CompletionConfig,
}

impl fmt::Debug for OpenAiCompletionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiCompletionClient")
            .field("config", &self.config)
            .finish()
    }
}

impl OpenAiCompletionClient {
    pub fn new(config: CompletionConfig) -> Result<Self, SuggestionError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Create a client from the OPENAI_* environment variables
    pub fn from_env() -> Result<Self, SuggestionError> {
        Self::new(CompletionConfig::from_env()?)
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Request a completion and return the first choice's text, untrimmed
    pub async fn complete(&self, prompt: &str) -> Result<String, SuggestionError> {
        let request = CompletionRequest {
            model: &self.config.model,
            prompt,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SuggestionError::Api { status, body });
        }

        let completion: CompletionResponse = response.json().await?;

        if let Some(usage) = &completion.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                response_model = completion.model.as_deref().unwrap_or(""),
                "Completion received"
            );
        }

        completion
            .first_text()
            .map(str::to_string)
            .ok_or(SuggestionError::EmptyResponse)
    }
}

#[async_trait]
impl MilestoneSuggester for OpenAiCompletionClient {
    async fn suggest(&self, titles: &[String]) -> memorylane_core::Result<String> {
        let span = tracing::info_span!(
            "milestone.suggest",
            "gen_ai.operation.name" = "text_completion",
            "gen_ai.request.model" = %self.config.model,
            "gen_ai.request.max_tokens" = self.config.max_tokens,
            titles = titles.len(),
        );

        async {
            let prompt = build_milestone_prompt(titles);
            let text = self.complete(&prompt).await.map_err(|e| {
                tracing::warn!(error = %e, "Milestone completion failed");
                TimelineError::suggestion(e.to_string())
            })?;
            Ok(text.trim().to_string())
        }
        .instrument(span)
        .await
    }
}
