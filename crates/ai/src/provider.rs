//! AI provider backends.
//!
//! Every vendor is reached through [`CompletionProvider::complete_json`]: send
//! one prompt, get the raw text of the model's JSON answer back.

use crate::prompt::SYSTEM_PROMPT;
use deck_core::{Error, Result};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Upper bound for one provider request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Output token budget for providers that require one.
const MAX_OUTPUT_TOKENS: u32 = 4096;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// A text-generation backend that answers a prompt with JSON text.
pub trait CompletionProvider: Send + Sync {
    /// Which backend this is.
    fn kind(&self) -> ProviderKind;

    /// Model identifier sent upstream.
    fn model(&self) -> &str;

    /// Send the prompt and return the model's raw answer.
    fn complete_json(&self, prompt: &str) -> Result<String>;
}

/// Supported AI vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Gemini,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [Self::OpenAi, Self::Anthropic, Self::Gemini];

    /// Lowercase identifier used in configuration and records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
        }
    }

    /// Model used when none is configured.
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Anthropic => "claude-3-5-sonnet-latest",
            Self::Gemini => "gemini-1.5-flash",
        }
    }

    /// Environment variable holding the API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
        }
    }

    fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com",
            Self::Anthropic => "https://api.anthropic.com",
            Self::Gemini => "https://generativelanguage.googleapis.com",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "gpt" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "gemini" | "google" => Ok(Self::Gemini),
            other => Err(Error::UnknownProvider(other.to_string())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection settings for one provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl ProviderConfig {
    /// Settings with the vendor's default model and endpoint.
    pub fn new(kind: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            kind,
            api_key: api_key.into(),
            model: kind.default_model().to_string(),
            base_url: kind.default_base_url().to_string(),
        }
    }

    /// Override the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the endpoint (proxies, gateways).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Build the provider selected by the configuration.
pub fn create_provider(config: ProviderConfig) -> Result<Box<dyn CompletionProvider>> {
    if config.api_key.trim().is_empty() {
        return Err(Error::Config(format!(
            "missing API key for {} (set {})",
            config.kind,
            config.kind.api_key_env()
        )));
    }

    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| Error::Provider(format!("Failed to build HTTP client: {}", e)))?;

    let provider: Box<dyn CompletionProvider> = match config.kind {
        ProviderKind::OpenAi => Box::new(OpenAiProvider { client, config }),
        ProviderKind::Anthropic => Box::new(AnthropicProvider { client, config }),
        ProviderKind::Gemini => Box::new(GeminiProvider { client, config }),
    };
    Ok(provider)
}

/// Send a request and decode the JSON body, mapping failures to provider errors.
fn send_json<T: DeserializeOwned>(kind: ProviderKind, request: RequestBuilder) -> Result<T> {
    let response = request
        .send()
        .map_err(|e| Error::Provider(format!("{} request failed: {}", kind, e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(Error::Provider(format!(
            "{} returned {}: {}",
            kind,
            status,
            body.trim()
        )));
    }

    response
        .json::<T>()
        .map_err(|e| Error::InvalidResponse(format!("{} response body: {}", kind, e)))
}

/// OpenAI chat completions.
pub struct OpenAiProvider {
    client: Client,
    config: ProviderConfig,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

impl CompletionProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn complete_json(&self, prompt: &str) -> Result<String> {
        log::info!("Requesting slides from openai ({})", self.config.model);

        let body = json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt},
            ],
            "response_format": {"type": "json_object"},
        });

        let request = self
            .client
            .post(format!("{}/v1/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body);

        let response: OpenAiResponse = send_json(self.kind(), request)?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::InvalidResponse("openai returned no message content".to_string()))
    }
}

/// Anthropic messages API.
pub struct AnthropicProvider {
    client: Client,
    config: ProviderConfig,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicBlock>,
}

#[derive(Deserialize)]
struct AnthropicBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl CompletionProvider for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn complete_json(&self, prompt: &str) -> Result<String> {
        log::info!("Requesting slides from anthropic ({})", self.config.model);

        let body = json!({
            "model": self.config.model,
            "max_tokens": MAX_OUTPUT_TOKENS,
            "system": SYSTEM_PROMPT,
            "messages": [{"role": "user", "content": prompt}],
        });

        let request = self
            .client
            .post(format!("{}/v1/messages", self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);

        let response: AnthropicResponse = send_json(self.kind(), request)?;
        response
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| {
                Error::InvalidResponse("anthropic returned no text content".to_string())
            })
    }
}

/// Google Gemini generateContent.
pub struct GeminiProvider {
    client: Client,
    config: ProviderConfig,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

impl CompletionProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn complete_json(&self, prompt: &str) -> Result<String> {
        log::info!("Requesting slides from gemini ({})", self.config.model);

        let body = json!({
            "systemInstruction": {"parts": [{"text": SYSTEM_PROMPT}]},
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
            "generationConfig": {"responseMimeType": "application/json"},
        });

        let request = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.config.base_url, self.config.model
            ))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body);

        let response: GeminiResponse = send_json(self.kind(), request)?;
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::InvalidResponse(
                "gemini returned no text content".to_string(),
            ));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!("claude".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
        assert_eq!(" gemini ".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert!(matches!(
            "mistral".parse::<ProviderKind>(),
            Err(Error::UnknownProvider(name)) if name == "mistral"
        ));
    }

    #[test]
    fn test_provider_kind_round_trip_names() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_config_defaults_and_overrides() {
        let config = ProviderConfig::new(ProviderKind::Anthropic, "key")
            .with_base_url("http://localhost:8080/");
        assert_eq!(config.model, "claude-3-5-sonnet-latest");
        assert_eq!(config.base_url, "http://localhost:8080");

        let config = ProviderConfig::new(ProviderKind::Gemini, "key").with_model("gemini-2.0-pro");
        assert_eq!(config.model, "gemini-2.0-pro");
    }

    #[test]
    fn test_create_provider_requires_key() {
        let err = create_provider(ProviderConfig::new(ProviderKind::OpenAi, "  ")).err();
        assert!(matches!(err, Some(Error::Config(msg)) if msg.contains("OPENAI_API_KEY")));
    }

    #[test]
    fn test_create_provider_selects_backend() {
        let provider =
            create_provider(ProviderConfig::new(ProviderKind::Gemini, "key").with_model("m"))
                .unwrap();
        assert_eq!(provider.kind(), ProviderKind::Gemini);
        assert_eq!(provider.model(), "m");
    }

    #[test]
    fn test_anthropic_response_shape() {
        let response: AnthropicResponse = serde_json::from_str(
            r#"{"content": [{"type": "thinking"}, {"type": "text", "text": "[]"}]}"#,
        )
        .unwrap();
        let text = response
            .content
            .into_iter()
            .find(|b| b.kind == "text")
            .and_then(|b| b.text);
        assert_eq!(text.as_deref(), Some("[]"));
    }
}
