use crate::config::CompletionSettings;
use crate::llm::gateway::{CompletionGateway, GatewayError};
use crate::llm::model::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
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

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// client for an openai-compatible `/chat/completions` endpoint
pub struct OpenAiClient {
    http: reqwest::Client,
    settings: CompletionSettings,
}

impl OpenAiClient {
    pub fn new(settings: CompletionSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionGateway for OpenAiClient {
    #[tracing::instrument(
        skip(self, messages),
        fields(llm.model = %self.settings.model.model, message_count = messages.len())
    )]
    async fn complete(&self, messages: Vec<Message>) -> Result<String, GatewayError> {
        let body = ChatRequest {
            model: &self.settings.model.model,
            messages: &messages,
            temperature: self.settings.model.temperature,
            max_tokens: self.settings.model.max_tokens,
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "completion request rejected");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                reason: error_reason(&text),
            });
        }

        let completion = parse_completion(&text)?;
        tracing::debug!(completion_len = completion.len(), "completion received");

        Ok(completion)
    }
}

/// pull the first choice's text out of a chat completion payload
fn parse_completion(body: &str) -> Result<String, GatewayError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::Transport(format!("malformed completion payload: {}", e)))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(GatewayError::EmptyResponse)
}

/// provider error message when the body is an openai error envelope, else the raw body
fn error_reason(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
