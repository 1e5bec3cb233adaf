//! Anthropic messages backend.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{build_http_client, check_error_response, LlmClient, LlmError};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const MODEL: &str = "claude-3-5-haiku-20241022";
const API_VERSION: &str = "2023-06-01";

/// Anthropic API request message.
#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Anthropic API request body.
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

/// Anthropic API response content block.
#[derive(Deserialize)]
struct Content {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

/// Anthropic API response.
#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<Content>,
}

/// Anthropic API client.
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicClient {
    /// Creates a client against the public Anthropic endpoint.
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
        format!("{}/v1/messages", self.base_url.trim_end_matches('/'))
    }
}

impl LlmClient for AnthropicClient {
    fn send_request<'a>(
        &'a self,
        prompt: &'a str,
        max_tokens: u32,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let request = AnthropicRequest {
                model: MODEL.to_string(),
                max_tokens,
                messages: vec![Message {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                }],
            };

            let api_url = self.api_url();
            debug!(url = %api_url, model = MODEL, max_tokens, "Sending request to Anthropic API");

            let response = self
                .client
                .post(&api_url)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", API_VERSION)
                .header("content-type", "application/json")
                .json(&request)
                .send()
                .await
                .map_err(|e| LlmError::NetworkError(e.to_string()))?;

            let response = check_error_response(response).await?;

            let anthropic_response: AnthropicResponse = response
                .json()
                .await
                .map_err(|e| LlmError::InvalidResponseFormat(e.to_string()))?;

            let text = anthropic_response
                .content
                .first()
                .filter(|c| c.content_type == "text")
                .map(|c| c.text.clone())
                .ok_or_else(|| {
                    LlmError::InvalidResponseFormat("No text content in response".to_string())
                })?;

            debug!(response_len = text.len(), "Received Anthropic API response");
            Ok(text)
        })
    }
}
