use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

pub struct StructuredPrompt {
    pub text: String,
    /// JSON schema the response text must conform to.
    pub schema: serde_json::Value,
}

pub struct ImagePrompt {
    pub text: String,
    pub aspect_ratio: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    /// Base64 encoded image bytes.
    pub data: String,
}

pub struct ChatPrompt {
    pub system_instruction: Option<String>,
    pub text: String,
    pub backend_context: String,
}

impl ChatPrompt {
    pub fn new(system_instruction: Option<String>, text: &str, backend_context: &str) -> ChatPrompt {
        return ChatPrompt {
            system_instruction,
            text: text.to_string(),
            backend_context: backend_context.to_string(),
        };
    }
}

pub struct ChatResponse {
    pub text: Option<String>,
    pub context: String,
}

#[async_trait]
pub trait Backend {
    /// Used at startup to verify all configurations are available to work with
    /// the backend.
    async fn health_check(&self) -> Result<()>;

    /// Lists models able to serve generation requests.
    async fn list_models(&self) -> Result<Vec<String>>;

    /// Requests JSON text matching `prompt.schema`. `None` when the model
    /// answered without any text.
    async fn generate_structured(&self, prompt: StructuredPrompt) -> Result<Option<String>>;

    /// Renders one image. `None` when no response part carried image data.
    async fn generate_image(&self, prompt: ImagePrompt) -> Result<Option<InlineImage>>;

    /// Sends one chat turn. Conversation history is opaque to callers: the
    /// returned `context` is handed back on the next turn.
    async fn get_chat_completion(&self, prompt: ChatPrompt) -> Result<ChatResponse>;
}

pub type BackendBox = Arc<dyn Backend + Send + Sync>;
