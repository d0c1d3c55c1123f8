pub mod gateway;
pub mod model;
pub mod openai;

pub use gateway::{CompletionGateway, GatewayError};
pub use model::{Message, MessageRole, ModelConfig};
pub use openai::OpenAiClient;
