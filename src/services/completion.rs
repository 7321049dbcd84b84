use crate::models::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const MAX_RETRIES: u32 = 3;

/// Errors that can occur when calling the text-completion service
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Completion returned no content")]
    EmptyContent,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Sampling options for a completion call
#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub json_object: bool,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            json_object: false,
        }
    }
}

/// A text-completion service: accepts a conversation and returns text or fails
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completions endpoint (Groq by default)
///
/// Retries rate-limit and server errors with exponential backoff.
pub struct ChatCompletionClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
    retry_base: Duration,
}

impl ChatCompletionClient {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        timeout_secs: u64,
    ) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            model,
            client,
            retry_base: Duration::from_millis(1000),
        })
    }

    /// Shorten the backoff between retries
    pub fn with_retry_base(mut self, retry_base: Duration) -> Self {
        self.retry_base = retry_base;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionService for ChatCompletionClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: options.temperature,
            response_format: options
                .json_object
                .then_some(ResponseFormat { kind: "json_object" }),
        };

        let mut last_error: Option<CompletionError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = self.retry_base * (1 << (attempt - 1));
                tracing::warn!(
                    "Completion attempt {} failed, retrying after {}ms",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    last_error = Some(CompletionError::RequestError(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                tracing::warn!("Completion API returned {}: {}", status, message);
                last_error = Some(CompletionError::ApiError {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(CompletionError::ApiError {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: ChatCompletionResponse = response
                .json()
                .await
                .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

            let content = parsed
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .filter(|content| !content.trim().is_empty())
                .ok_or(CompletionError::EmptyContent)?;

            tracing::debug!("Completion succeeded with model {} ({} chars)", self.model, content.len());
            return Ok(content);
        }

        Err(last_error.unwrap_or(CompletionError::EmptyContent))
    }
}

/// Slice out the outermost `open ... close` span of a model reply
///
/// Models often wrap JSON in prose or code fences.
pub fn extract_delimited(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(server: &mockito::ServerGuard) -> ChatCompletionClient {
        ChatCompletionClient::new(server.url(), "test_key".to_string(), "test-model".to_string(), 5)
            .unwrap()
            .with_retry_base(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test_key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "hello"}}]}"#)
            .create_async()
            .await;

        let reply = client(&server)
            .complete(&[ChatMessage::user("hi")], CompletionOptions::default())
            .await
            .unwrap();

        assert_eq!(reply, "hello");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_retries_server_errors() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let result = client(&server)
            .complete(&[ChatMessage::user("hi")], CompletionOptions::default())
            .await;

        assert!(matches!(result, Err(CompletionError::ApiError { status: 503, .. })));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_does_not_retry_client_errors() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body("bad key")
            .expect(1)
            .create_async()
            .await;

        let result = client(&server)
            .complete(&[ChatMessage::user("hi")], CompletionOptions::default())
            .await;

        assert!(matches!(result, Err(CompletionError::ApiError { status: 401, .. })));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_content_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let result = client(&server)
            .complete(&[ChatMessage::user("hi")], CompletionOptions::default())
            .await;

        assert!(matches!(result, Err(CompletionError::EmptyContent)));
    }

    #[test]
    fn test_extract_delimited() {
        assert_eq!(
            extract_delimited("Sure! ```json\n[\"a\", \"b\"]\n```", '[', ']'),
            Some("[\"a\", \"b\"]")
        );
        assert_eq!(extract_delimited("score: {\"score\": 8}", '{', '}'), Some("{\"score\": 8}"));
        assert_eq!(extract_delimited("no json here", '{', '}'), None);
    }
}
