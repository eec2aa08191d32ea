//! OpenAI-compatible provider using the Chat Completions API.
//!
//! Any endpoint speaking the same wire format (OpenAI, xAI, Groq, a local
//! gateway) works by pointing `llm.endpoint` at it.

use super::provider::{normalize_completion, LlmProvider, LlmRequest, LlmResponse};
use crate::error::PipelineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// OpenAI-compatible chat completions provider.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl OpenAiProvider {
    pub fn new(endpoint: &str, api_key: &str, model: &str, timeout: Duration) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            timeout,
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    model: Option<String>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, PipelineError> {
        let start = Instant::now();

        let body = ChatRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| PipelineError::Llm {
                message: format!("request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Llm {
                message: format!("HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let chat_resp: ChatResponse = resp.json().await.map_err(|e| PipelineError::Llm {
            message: format!("Failed to parse chat response: {e}"),
            status_code: None,
        })?;

        let text = chat_resp
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| PipelineError::Llm {
                message: "response has no choices[0].message.content".to_string(),
                status_code: None,
            })?;

        Ok(LlmResponse {
            text: normalize_completion(text),
            model: chat_resp.model.unwrap_or_else(|| self.model.clone()),
            tokens_used: chat_resp.usage.map(|u| u.total_tokens),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::EMPTY_COMPLETION_PLACEHOLDER;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OpenAiProvider {
        OpenAiProvider::new(
            &format!("{}/v1/chat/completions", server.uri()),
            "sk-test",
            "gpt-4o-mini",
            Duration::from_secs(5),
        )
    }

    fn completion(content: serde_json::Value) -> serde_json::Value {
        json!({
            "model": "gpt-4o-mini-2024-07-18",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}],
            "usage": {"prompt_tokens": 40, "completion_tokens": 12, "total_tokens": 52}
        })
    }

    #[tokio::test]
    async fn test_generate_sends_system_and_user_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "stream": false,
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "price this"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!("  $4,000  "))))
            .expect(1)
            .mount(&server)
            .await;

        let response = provider_for(&server)
            .generate(&LlmRequest::new("be brief", "price this"))
            .await
            .unwrap();
        assert_eq!(response.text, "$4,000");
        assert_eq!(response.model, "gpt-4o-mini-2024-07-18");
        assert_eq!(response.tokens_used, Some(52));
    }

    #[tokio::test]
    async fn test_generate_http_error_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .generate(&LlmRequest::new("s", "p"))
            .await
            .unwrap_err();
        match err {
            PipelineError::Llm {
                status_code,
                message,
            } => {
                assert_eq!(status_code, Some(500));
                assert!(message.contains("upstream exploded"));
            }
            other => panic!("expected Llm error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_empty_choices_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .generate(&LlmRequest::new("s", "p"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("choices[0].message.content"));
    }

    #[tokio::test]
    async fn test_generate_null_content_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!(null))))
            .mount(&server)
            .await;

        let result = provider_for(&server)
            .generate(&LlmRequest::new("s", "p"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_generate_empty_content_uses_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!(""))))
            .mount(&server)
            .await;

        let response = provider_for(&server)
            .generate(&LlmRequest::new("s", "p"))
            .await
            .unwrap();
        assert_eq!(response.text, EMPTY_COMPLETION_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_generate_malformed_json_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .generate(&LlmRequest::new("s", "p"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to parse chat response"));
    }
}
