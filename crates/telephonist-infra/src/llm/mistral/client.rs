//! MistralClient -- concrete [`ChatCompletionClient`] for Mistral AI.
//!
//! Sends the full transcript to `/v1/chat/completions` with the caller's
//! bearer credential. The client holds no credential of its own: every end
//! user brings their own key, so it is supplied per call as a
//! [`SecretString`] and only exposed when building the request header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use telephonist_core::llm::client::ChatCompletionClient;
use telephonist_types::config::LlmConfig;
use telephonist_types::error::LlmError;
use telephonist_types::message::Message;

use super::types::{MistralMessage, MistralRequest, MistralResponse, to_domain};

/// Mistral chat-completions client.
pub struct MistralClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl MistralClient {
    /// Create a client for `model` against the public Mistral API.
    pub fn new(model: impl Into<String>, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: "https://api.mistral.ai".to_string(),
            model: model.into(),
        })
    }

    /// Build a client from the `[llm]` configuration section.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        Ok(Self::new(config.model.clone(), Duration::from_secs(config.timeout_secs))?
            .with_base_url(config.base_url.clone()))
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn to_request(&self, messages: &[Message]) -> MistralRequest {
        MistralRequest {
            model: self.model.clone(),
            messages: messages.iter().map(MistralMessage::from).collect(),
        }
    }
}

impl ChatCompletionClient for MistralClient {
    fn name(&self) -> &str {
        "mistral"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        credential: &SecretString,
        messages: &[Message],
    ) -> Result<Option<Message>, LlmError> {
        let body = self.to_request(messages);

        let response = self
            .client
            .post(self.url())
            .bearer_auth(credential.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited,
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let mistral_resp: MistralResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        let Some(choice) = mistral_resp.choices.into_iter().last() else {
            tracing::debug!("Mistral response has no choices");
            return Ok(None);
        };

        if let Some(reason) = &choice.finish_reason {
            tracing::debug!(index = choice.index, finish_reason = ?reason, "Mistral choice");
        }

        to_domain(choice.message).map_err(LlmError::Deserialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use telephonist_types::message::Role;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> MistralClient {
        MistralClient::new("mistral-small-latest", Duration::from_secs(20)).unwrap()
    }

    fn key() -> SecretString {
        SecretString::from("user-key".to_string())
    }

    fn transcript() -> Vec<Message> {
        vec![
            Message::system("persona"),
            Message::user("Hallo"),
            Message::primer("ANSWER:"),
        ]
    }

    async fn server_replying(template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(template)
            .mount(&server)
            .await;
        server
    }

    async fn complete_against(server: &MockServer) -> Result<Option<Message>, LlmError> {
        client()
            .with_base_url(server.uri())
            .complete(&key(), &transcript())
            .await
    }

    #[test]
    fn test_url_uses_completions_path() {
        let client = client().with_base_url("http://localhost:9000/");
        assert_eq!(client.url(), "http://localhost:9000/v1/chat/completions");
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(client().url(), "https://api.mistral.ai/v1/chat/completions");
    }

    #[test]
    fn test_from_config() {
        let config = LlmConfig {
            base_url: "http://proxy.local".to_string(),
            model: "mistral-large-latest".to_string(),
            timeout_secs: 5,
        };
        let client = MistralClient::from_config(&config).unwrap();

        assert_eq!(client.name(), "mistral");
        assert_eq!(client.model(), "mistral-large-latest");
        assert_eq!(client.url(), "http://proxy.local/v1/chat/completions");
    }

    #[test]
    fn test_request_marks_primer_as_prefix() {
        let messages = vec![
            Message::system("persona"),
            Message::user("Hallo"),
            Message::primer("ANSWER:"),
        ];
        let request = client().to_request(&messages);

        assert_eq!(request.model, "mistral-small-latest");
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0].role, "system");
        assert!(!request.messages[1].prefix);
        assert!(request.messages[2].prefix);
    }

    #[tokio::test]
    async fn test_complete_sends_bearer_and_reads_last_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer user-key"))
            .and(body_partial_json(json!({"model": "mistral-small-latest"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    {
                        "index": 0,
                        "message": {"role": "assistant", "content": "ANSWER: erste"},
                        "finish_reason": "stop"
                    },
                    {
                        "index": 1,
                        "message": {"role": "assistant", "content": "ANSWER: zweite"},
                        "finish_reason": "length"
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = complete_against(&server).await.unwrap().unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.content, "ANSWER: zweite");
        assert!(!reply.is_primer);
    }

    #[tokio::test]
    async fn test_complete_without_choices_is_none() {
        let server = server_replying(
            ResponseTemplate::new(200).set_body_json(json!({"id": "x", "choices": []})),
        )
        .await;
        assert!(complete_against(&server).await.unwrap().is_none());

        let server = server_replying(ResponseTemplate::new(200).set_body_json(json!({}))).await;
        assert!(complete_against(&server).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_complete_maps_error_statuses() {
        let server = server_replying(ResponseTemplate::new(401)).await;
        let err = complete_against(&server).await.unwrap_err();
        assert!(matches!(err, LlmError::AuthenticationFailed));

        let server = server_replying(ResponseTemplate::new(429)).await;
        let err = complete_against(&server).await.unwrap_err();
        assert!(matches!(err, LlmError::RateLimited));

        let server =
            server_replying(ResponseTemplate::new(500).set_body_string("overloaded")).await;
        match complete_against(&server).await.unwrap_err() {
            LlmError::Provider { message } => {
                assert!(message.contains("500"));
                assert!(message.contains("overloaded"));
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_with_malformed_body_is_deserialization_error() {
        let server = server_replying(ResponseTemplate::new(200).set_body_string("not json")).await;
        let err = complete_against(&server).await.unwrap_err();
        assert!(matches!(err, LlmError::Deserialization(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_provider_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let client = MistralClient::new("m", Duration::from_secs(2))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let key = SecretString::from("k".to_string());

        let err = client
            .complete(&key, &[Message::user("Hallo")])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Provider { .. }));
    }
}
