//! Completion provider client (Chat Completions API)
//!
//! One fixed OpenAI-compatible endpoint, one fixed model, fixed decoding
//! parameters. Each call sends the built system prompt, the replayed
//! conversation history, and the new user turn, and constrains the reply
//! to a single JSON object via `response_format`. The base URL is
//! overridable so tests can point the client at a local mock server.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoachError, Result};
use crate::history::ChatEntry;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Fixed model identifier for every exchange
pub const MODEL: &str = "gpt-4o-mini";

/// Fixed decoding temperature; no sampling configuration is exposed
const TEMPERATURE: f64 = 0.2;

/// Client for the completion provider
pub struct CompletionClient {
    http: reqwest::Client,
    api_base: String,
}

impl CompletionClient {
    pub fn new() -> Self {
        Self::with_base_url(OPENAI_API_BASE)
    }

    /// Point the client at a different OpenAI-compatible endpoint
    pub fn with_base_url(api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
        }
    }

    /// Run one exchange and return the first choice's content verbatim.
    ///
    /// `history` is replayed oldest-first with roles mapped directly; the
    /// new turn is sent as a final user message carrying both the typed
    /// text and the extracted code.
    pub async fn complete(
        &self,
        credential: &str,
        system_prompt: &str,
        history: &[ChatEntry],
        user_text: &str,
        extracted_code: &str,
    ) -> Result<String> {
        let body = ChatCompletionRequest {
            model: MODEL.into(),
            messages: build_messages(system_prompt, history, user_text, extracted_code),
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                format_type: "json_object".into(),
            },
            stream: false,
        };

        debug!(messages = body.messages.len(), "sending completion request");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(credential)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("(failed to read body: {})", e));
            // Invalid credentials must stay distinguishable from transport
            // failures even though the UI may show them uniformly.
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(CoachError::Auth(body));
            }
            return Err(CoachError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let result: ChatCompletionResponse = response.json().await?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(CoachError::EmptyCompletion)
    }
}

impl Default for CompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the provider message sequence for one turn
fn build_messages(
    system_prompt: &str,
    history: &[ChatEntry],
    user_text: &str,
    extracted_code: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);

    messages.push(ChatMessage {
        role: "system".into(),
        content: system_prompt.into(),
    });

    for entry in history {
        messages.push(ChatMessage {
            role: entry.role.as_str().into(),
            content: entry.raw_message.clone(),
        });
    }

    messages.push(ChatMessage {
        role: "user".into(),
        content: format!("User Prompt: {}\n\nCode: {}", user_text, extracted_code),
    });

    messages
}

// ============================================================================
// Wire types (OpenAI Chat Completions format)
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    response_format: ResponseFormat,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{AssistantPayload, ChatEntry, ASSISTANT_RAW_PLACEHOLDER};

    #[test]
    fn test_message_sequence() {
        let history = vec![ChatEntry::user("a"), {
            let mut e = ChatEntry::assistant(AssistantPayload::default());
            e.raw_message = "b".into();
            e
        }];

        let messages = build_messages("prompt", &history, "c", "code1");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "prompt");
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "a");
        assert_eq!(messages[2].role, "assistant");
        assert_eq!(messages[2].content, "b");
        assert_eq!(messages[3].role, "user");
        assert_eq!(messages[3].content, "User Prompt: c\n\nCode: code1");
    }

    #[test]
    fn test_assistant_history_replays_sentinel() {
        let history = vec![ChatEntry::assistant(AssistantPayload::default())];
        let messages = build_messages("p", &history, "q", "");
        assert_eq!(messages[1].content, ASSISTANT_RAW_PLACEHOLDER);
    }

    #[test]
    fn test_request_serialization() {
        let body = ChatCompletionRequest {
            model: MODEL.into(),
            messages: build_messages("sys", &[], "hi", ""),
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                format_type: "json_object".into(),
            },
            stream: false,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("gpt-4o-mini"));
        assert!(json.contains("\"response_format\":{\"type\":\"json_object\"}"));
        assert!(json.contains("\"stream\":false"));
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"{\"output\":{}}"}}]}"#)
            .create_async()
            .await;

        let client = CompletionClient::with_base_url(server.url());
        let raw = client
            .complete("sk-test", "sys", &[], "hello", "")
            .await
            .unwrap();

        assert_eq!(raw, r#"{"output":{}}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_maps_401_to_auth_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body("invalid api key")
            .create_async()
            .await;

        let client = CompletionClient::with_base_url(server.url());
        let err = client.complete("bad", "sys", &[], "hi", "").await.unwrap_err();
        assert!(err.is_auth());
    }

    #[tokio::test]
    async fn test_complete_empty_choices_is_empty_completion() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = CompletionClient::with_base_url(server.url());
        let err = client.complete("k", "sys", &[], "hi", "").await.unwrap_err();
        assert!(matches!(err, CoachError::EmptyCompletion));
    }

    #[tokio::test]
    async fn test_complete_server_error_keeps_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let client = CompletionClient::with_base_url(server.url());
        let err = client.complete("k", "sys", &[], "hi", "").await.unwrap_err();
        match err {
            CoachError::Provider { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
