//! OpenAI chat-completions backend.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{build_http_client, check_error_response, LlmClient, LlmError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f32 = 0.7;

/// OpenAI API request message.
#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

/// OpenAI API request body.
#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

/// OpenAI API response choice.
#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

/// OpenAI API response message.
#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenAI API response.
#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<Choice>,
}

/// OpenAI API client.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Creates a client against the public OpenAI endpoint.
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
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl LlmClient for OpenAiClient {
    fn send_request<'a>(
        &'a self,
        prompt: &'a str,
        max_tokens: u32,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let request = OpenAiRequest {
                model: MODEL.to_string(),
                messages: vec![Message {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                }],
                temperature: TEMPERATURE,
                max_tokens,
            };

            let api_url = self.api_url();
            debug!(url = %api_url, model = MODEL, max_tokens, "Sending request to OpenAI API");

            let response = self
                .client
                .post(&api_url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&request)
                .send()
                .await
                .map_err(|e| LlmError::NetworkError(e.to_string()))?;

            let response = check_error_response(response).await?;

            let openai_response: OpenAiResponse = response
                .json()
                .await
                .map_err(|e| LlmError::InvalidResponseFormat(e.to_string()))?;

            let text = openai_response
                .choices
                .first()
                .and_then(|choice| choice.message.content.clone())
                .ok_or_else(|| {
                    LlmError::InvalidResponseFormat("No choices in response".to_string())
                })?;

            debug!(response_len = text.len(), "Received OpenAI API response");
            Ok(text)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn extracts_text_from_chat_completion_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "max_tokens": 50
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "feature-add-auth"}}]
            })))
            .mount(&server)
            .await;

        let client = OpenAiClient::with_base_url("sk-test".to_string(), server.uri());
        let text = client.send_request("prompt", 50).await.unwrap();
        assert_eq!(text, "feature-add-auth");
    }

    #[tokio::test]
    async fn non_success_status_is_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let client = OpenAiClient::with_base_url("sk-test".to_string(), server.uri());
        let err = client.send_request("prompt", 50).await.unwrap_err();
        assert!(err.to_string().contains("HTTP 401"));
    }

    #[tokio::test]
    async fn empty_choices_is_an_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = OpenAiClient::with_base_url("sk-test".to_string(), server.uri());
        let err = client.send_request("prompt", 50).await.unwrap_err();
        assert!(err.to_string().contains("Invalid response format"));
    }
}
