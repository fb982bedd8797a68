//! Google Gemini `generateContent` client restricted to structured JSON
//! output: every call carries a response schema and returns the raw JSON
//! text the model produced.

use crate::llm::{build_provider_client_with_timeout, sanitize_api_error};
use anyhow::Context;
use reqwest::Client;
use serde_json::Value;

mod types;
use types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const MAX_OUTPUT_TOKENS: u32 = 8192;

/// A candidate came back without any text, e.g. after a safety block.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Empty response from Gemini (finish reason: {finish_reason})")]
pub struct EmptyResponse {
    pub finish_reason: String,
}

/// One structured-output call.
#[derive(Debug, Clone, Copy)]
pub struct StructuredRequest<'a> {
    pub model: &'a str,
    pub system_instruction: Option<&'a str>,
    pub prompt: &'a str,
    pub response_schema: &'a Value,
    pub temperature: f64,
}

pub struct GeminiClient {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: Option<&str>) -> Self {
        Self::with_base_url(api_key, None, 120)
    }

    /// Blank keys are treated as absent; a trailing slash on `base_url` is
    /// ignored.
    pub fn with_base_url(api_key: Option<&str>, base_url: Option<&str>, timeout_secs: u64) -> Self {
        let api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(String::from);
        let base_url = base_url
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .to_string();

        Self {
            api_key,
            base_url,
            client: build_provider_client_with_timeout(timeout_secs),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> anyhow::Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "Gemini API key not found. Options:\n\
                 1. Set GEMINI_API_KEY env var\n\
                 2. Set api_key in ~/.psychsim/config.toml\n\
                 3. Get an API key from https://aistudio.google.com/app/apikey"
            )
        })
    }

    fn model_name(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/{}:generateContent",
            self.base_url,
            Self::model_name(model)
        )
    }

    fn build_request(request: &StructuredRequest<'_>) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: request.prompt.to_string(),
                }],
            }],
            system_instruction: request.system_instruction.map(|sys| Content {
                role: None,
                parts: vec![Part {
                    text: sys.to_string(),
                }],
            }),
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                response_mime_type: "application/json",
                response_schema: request.response_schema.clone(),
            },
        }
    }

    async fn ensure_success_status(
        response: reqwest::Response,
    ) -> anyhow::Result<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            let sanitized_error = sanitize_api_error(&error_text);
            anyhow::bail!("Gemini API error ({status}): {sanitized_error}");
        }

        Ok(response)
    }

    fn extract_text(result: &GenerateContentResponse) -> anyhow::Result<String> {
        let candidate = result
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .ok_or_else(|| anyhow::anyhow!("No response from Gemini"))?;

        let text = candidate
            .content
            .as_ref()
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            let finish_reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
            return Err(EmptyResponse {
                finish_reason: finish_reason.to_string(),
            }
            .into());
        }

        Ok(text)
    }

    /// Send one structured request and return the JSON text of the first
    /// candidate. Transport errors are scrubbed before they are returned.
    pub async fn generate_json(&self, request: &StructuredRequest<'_>) -> anyhow::Result<String> {
        let api_key = self.api_key()?;
        let body = Self::build_request(request);

        let response = self
            .client
            .post(self.endpoint(request.model))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|err| anyhow::anyhow!("{}", sanitize_api_error(&err.to_string())))
            .context("Gemini request failed")?;
        let response = Self::ensure_success_status(response).await?;

        let result: GenerateContentResponse = response
            .json()
            .await
            .context("Gemini returned an unreadable response body")?;

        if let Some(err) = result.error.as_ref() {
            anyhow::bail!("Gemini API error: {}", sanitize_api_error(&err.message));
        }

        if let Some(version) = result.model_version.as_deref() {
            tracing::debug!(model_version = version, "gemini response received");
        }

        Self::extract_text(&result)
    }
}
