//! Google Gemini generateContent backend.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{build_http_client, check_error_response, LlmClient, LlmError};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const MODEL: &str = "gemini-pro";

/// Gemini API request content part.
#[derive(Serialize)]
struct Part {
    text: String,
}

/// Gemini API request content block.
#[derive(Serialize)]
struct RequestContent {
    parts: Vec<Part>,
}

/// Gemini API generation settings.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

/// Gemini API request body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

/// Gemini API response part.
#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Gemini API response content block.
#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

/// Gemini API response candidate.
#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

/// Gemini API response.
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// Gemini API client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Creates a client against the public Gemini endpoint.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Creates a client against a custom endpoint (used by tests).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = build_http_client().expect("failed to build HTTP client");
        Self {
            client,
            api_key,
            base_url,
        }
    }

    fn api_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            MODEL
        )
    }
}

impl LlmClient for GeminiClient {
    fn send_request<'a>(
        &'a self,
        prompt: &'a str,
        max_tokens: u32,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let request = GeminiRequest {
                contents: vec![RequestContent {
                    parts: vec![Part {
                        text: prompt.to_string(),
                    }],
                }],
                generation_config: GenerationConfig {
                    max_output_tokens: max_tokens,
                },
            };

            let api_url = self.api_url();
            debug!(url = %api_url, model = MODEL, max_tokens, "Sending request to Gemini API");

            let response = self
                .client
                .post(&api_url)
                .query(&[("key", self.api_key.as_str())])
                .header("Content-Type", "application/json")
                .json(&request)
                .send()
                .await
                .map_err(|e| LlmError::NetworkError(e.to_string()))?;

            let response = check_error_response(response).await?;

            let gemini_response: GeminiResponse = response
                .json()
                .await
                .map_err(|e| LlmError::InvalidResponseFormat(e.to_string()))?;

            let text = gemini_response
                .candidates
                .first()
                .and_then(|c| c.content.parts.first())
                .map(|p| p.text.clone())
                .ok_or_else(|| {
                    LlmError::InvalidResponseFormat("No candidates in response".to_string())
                })?;

            debug!(response_len = text.len(), "Received Gemini API response");
            Ok(text)
        })
    }
}
