use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::InsightsConfig;

pub(crate) const JSON_SYSTEM_PROMPT: &str =
    "You are an expert customer-experience data analyst. Reply ONLY with valid JSON.";

/// A single prompt sent to the text-generation provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub json_mode: bool,
}

impl CompletionRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            json_mode: false,
        }
    }

    pub fn json(prompt: impl Into<String>) -> Self {
        Self {
            system: Some(JSON_SYSTEM_PROMPT.to_string()),
            prompt: prompt.into(),
            json_mode: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("provider response had no content")]
    EmptyResponse,
    #[error("provider returned malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// External text-generation collaborator.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}

/// Client for OpenAI-compatible `chat/completions` endpoints.
pub struct OpenAiChatClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiChatClient {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Builds a client from configuration, `None` when no API key is set.
    pub fn from_config(config: &InsightsConfig) -> Result<Option<Self>, ProviderError> {
        match &config.api_key {
            Some(key) => Self::new(&config.base_url, key.clone(), &config.model, config.timeout)
                .map(Some),
            None => Ok(None),
        }
    }

    fn body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        ChatRequest {
            model: &self.model,
            messages,
            response_format: request.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiChatClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        debug!(model = %self.model, json_mode = request.json_mode, "requesting completion");
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.body(&request))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = resp.json().await?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAiChatClient {
        OpenAiChatClient::new(
            "https://llm.example.test/v1/",
            "sk-test",
            "gpt-4o-mini",
            Duration::from_secs(5),
        )
        .expect("client builds")
    }

    #[test]
    fn endpoint_drops_trailing_slash() {
        assert_eq!(
            client().endpoint,
            "https://llm.example.test/v1/chat/completions"
        );
    }

    #[test]
    fn json_requests_carry_system_prompt_and_response_format() {
        let client = client();
        let request = CompletionRequest::json("List topics");
        let body = serde_json::to_value(client.body(&request)).expect("serialize");
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "List topics");
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn text_requests_send_only_the_user_message() {
        let client = client();
        let request = CompletionRequest::text("Summarize");
        let body = serde_json::to_value(client.body(&request)).expect("serialize");
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn from_config_without_key_is_disabled() {
        let config = InsightsConfig {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert!(OpenAiChatClient::from_config(&config)
            .expect("no error")
            .is_none());
    }
}
