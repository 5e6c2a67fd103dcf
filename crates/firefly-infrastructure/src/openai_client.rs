//! OpenAiCompletionClient - Chat Completions REST client.
//!
//! Sends the whole session history to the OpenAI Chat Completions endpoint and
//! returns the assistant reply.

use async_trait::async_trait;
use firefly_core::completion::CompletionClient;
use firefly_core::config::OpenAiConfig;
use firefly_core::error::{FireflyError, Result};
use firefly_core::session::ChatMessage;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Completion client that talks to the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAiCompletionClient {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    base_url: String,
}

impl OpenAiCompletionClient {
    /// Builds a client from the `[openai]` config section.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if no API key is configured, and a `Completion`
    /// error if the HTTP client cannot be built.
    pub fn from_config(config: &OpenAiConfig) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| FireflyError::config("OPENAI_API_KEY is not set"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                FireflyError::completion(None, format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            base_url: config.base_url.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, history: &[ChatMessage]) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: history
                .iter()
                .map(|m| RequestMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                FireflyError::completion(None, format!("OpenAI API request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            FireflyError::completion(None, format!("Failed to parse OpenAI response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, history: &[ChatMessage]) -> Result<String> {
        let request = self.build_request(history);
        tracing::debug!(
            "[OpenAiCompletionClient] Requesting completion: model={}, messages={}",
            request.model,
            request.messages.len()
        );
        self.send_request(&request).await
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<RequestMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct RequestMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| {
            FireflyError::completion(None, "OpenAI API returned no content in the response")
        })
}

fn map_http_error(status: StatusCode, body: &str) -> FireflyError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());

    FireflyError::completion(Some(status.as_u16()), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use firefly_core::config::OpenAiConfig;

    fn config_with_key() -> OpenAiConfig {
        OpenAiConfig {
            api_key: Some("sk-test".to_string()),
            ..OpenAiConfig::default()
        }
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = OpenAiCompletionClient::from_config(&OpenAiConfig::default())
            .err()
            .unwrap();
        assert!(err.is_config());
    }

    #[test]
    fn test_request_carries_history_and_settings() {
        let client = OpenAiCompletionClient::from_config(&config_with_key()).unwrap();
        let history = vec![
            ChatMessage::user("Hi"),
            ChatMessage::assistant("Hello!"),
            ChatMessage::user("How are you?"),
        ];

        let request = client.build_request(&history);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["max_tokens"], 1200);
        assert_eq!(json["messages"].as_array().unwrap().len(), 3);
        assert_eq!(json["messages"][1]["role"], "assistant");
        assert_eq!(json["messages"][2]["content"], "How are you?");
    }

    #[test]
    fn test_extract_trims_content() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  Paris.\n"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text_response(response).unwrap(), "Paris.");
    }

    #[test]
    fn test_extract_without_choices_fails() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(extract_text_response(response).unwrap_err().is_completion());
    }

    #[test]
    fn test_http_error_uses_api_message() {
        let err = map_http_error(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#,
        );
        assert_eq!(
            err.to_string(),
            "Completion error (HTTP 401): Incorrect API key provided"
        );
    }

    #[test]
    fn test_http_error_falls_back_to_raw_body() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream unavailable");
        assert_eq!(err.to_string(), "Completion error (HTTP 502): upstream unavailable");
    }
}
