//! LLM provider abstraction: one trait, three interchangeable HTTP backends.

pub mod anthropic;
pub mod error;
pub mod gemini;
pub mod openai;
pub mod prompts;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

pub use anthropic::AnthropicClient;
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

use crate::config::Provider;
use crate::git::GitChanges;

/// HTTP request timeout for provider API calls.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Trait for provider backends.
///
/// A backend only knows how to send one prompt and extract plain text from
/// its provider-specific response shape; prompt construction and output
/// normalization live in [`Llm`] so all backends behave identically.
pub trait LlmClient: Send + Sync {
    /// Sends a single-turn request and returns the raw response text.
    fn send_request<'a>(
        &'a self,
        prompt: &'a str,
        max_tokens: u32,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
}

/// Builds an HTTP client with the standard request timeout.
pub(crate) fn build_http_client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// Checks an HTTP response for error status.
///
/// On success, returns the response unchanged for further processing. On
/// failure, reads the error body and returns an
/// [`LlmError::ApiRequestFailed`].
pub(crate) async fn check_error_response(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let error_text = response.text().await.unwrap_or_else(|e| {
        tracing::debug!("Failed to read error response body: {e}");
        String::new()
    });
    Err(LlmError::ApiRequestFailed(format!("HTTP {status}: {error_text}")).into())
}

/// Reads the credential for a provider, failing before any network call.
fn env_api_key(
    provider: &'static str,
    variable: &'static str,
    names: &[&str],
) -> Result<String, LlmError> {
    names
        .iter()
        .find_map(|name| std::env::var(name).ok())
        .filter(|key| !key.is_empty())
        .ok_or(LlmError::ApiKeyNotFound { provider, variable })
}

/// Handle on a selected provider backend, exposing the two generation
/// capabilities the workflow needs.
pub struct Llm {
    client: Box<dyn LlmClient>,
}

impl Llm {
    /// Creates a handle for the given provider, reading its credential from
    /// the environment.
    pub fn for_provider(provider: Provider) -> Result<Self> {
        let client: Box<dyn LlmClient> = match provider {
            Provider::OpenAi => {
                let key = env_api_key("OpenAI", "OPENAI_API_KEY", &["OPENAI_API_KEY"])?;
                Box::new(OpenAiClient::new(key))
            }
            Provider::Anthropic => {
                let key = env_api_key("Anthropic", "ANTHROPIC_API_KEY", &["ANTHROPIC_API_KEY"])?;
                Box::new(AnthropicClient::new(key))
            }
            Provider::Gemini => {
                let key = env_api_key(
                    "Gemini",
                    "GEMINI_API_KEY (or GOOGLE_API_KEY)",
                    &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
                )?;
                Box::new(GeminiClient::new(key))
            }
        };

        Ok(Self { client })
    }

    /// Wraps an already-constructed backend. Used by tests to inject fakes.
    pub fn with_client(client: Box<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Generates a normalized branch name from a change snapshot.
    ///
    /// The raw response is always cleaned into `[a-z0-9-/]`, since providers
    /// may ignore the formatting rules in the prompt.
    pub async fn generate_branch_name(&self, changes: &GitChanges) -> Result<String> {
        let prompt = prompts::branch_name_prompt(changes);
        let raw = self
            .client
            .send_request(&prompt, prompts::BRANCH_NAME_MAX_TOKENS)
            .await?;
        Ok(prompts::clean_branch_name(raw.trim()))
    }

    /// Generates a commit message from the staged diff.
    ///
    /// Output is trimmed only; an empty response falls back to a fixed
    /// `chore` message.
    pub async fn generate_commit_message(&self, staged_diff: &str) -> Result<String> {
        let prompt = prompts::commit_message_prompt(staged_diff);
        let raw = self
            .client
            .send_request(&prompt, prompts::COMMIT_MESSAGE_MAX_TOKENS)
            .await?;

        let message = raw.trim();
        if message.is_empty() {
            return Ok(prompts::FALLBACK_COMMIT_MESSAGE.to_string());
        }
        Ok(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedClient(String);

    impl LlmClient for CannedClient {
        fn send_request<'a>(
            &'a self,
            _prompt: &'a str,
            _max_tokens: u32,
        ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
            let response = self.0.clone();
            Box::pin(async move { Ok(response) })
        }
    }

    fn changes() -> GitChanges {
        GitChanges {
            status: " M src/lib.rs".to_string(),
            diff: "+fn demo() {}".to_string(),
            has_staged_changes: false,
            has_unstaged_changes: true,
        }
    }

    #[tokio::test]
    async fn branch_names_are_normalized_even_when_well_formed() {
        let llm = Llm::with_client(Box::new(CannedClient(
            "Feature: Add Demo Function\n".to_string(),
        )));
        let name = llm.generate_branch_name(&changes()).await.unwrap();
        assert_eq!(name, "feature-add-demo-function");
    }

    #[tokio::test]
    async fn commit_messages_are_trimmed_only() {
        let llm = Llm::with_client(Box::new(CannedClient(
            "  feat: add demo function\n".to_string(),
        )));
        let message = llm.generate_commit_message("+fn demo() {}").await.unwrap();
        assert_eq!(message, "feat: add demo function");
    }

    #[tokio::test]
    async fn empty_commit_message_uses_fallback() {
        let llm = Llm::with_client(Box::new(CannedClient("   \n".to_string())));
        let message = llm.generate_commit_message("+x").await.unwrap();
        assert_eq!(message, prompts::FALLBACK_COMMIT_MESSAGE);
    }
}
