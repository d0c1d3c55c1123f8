use crate::llm::model::Message;
use async_trait::async_trait;
use thiserror::Error;

/// failures of the completion service. none of these are retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("status {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("response carried no completion text")]
    EmptyResponse,
}

impl GatewayError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GatewayError::Status { status: 401 | 403, .. })
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GatewayError::Status { status: 429, .. })
    }
}

/// text-in, text-out boundary to a language model
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, messages: Vec<Message>) -> Result<String, GatewayError>;
}
