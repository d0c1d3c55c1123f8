use thiserror::Error;

use crate::db::ExecutionError;
use crate::llm::GatewayError;

#[derive(Error, Debug)]
pub enum Nl2SqlError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("completion gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("schema introspection failed: {0}")]
    Schema(#[source] ExecutionError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("tracing initialization failed: {0}")]
    Tracing(String),
}

pub type Result<T> = std::result::Result<T, Nl2SqlError>;
