use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::domain::models::Backend;
use crate::domain::models::BackendBox;
use crate::domain::models::ChatPrompt;
use crate::domain::models::ChatResponse;
use crate::domain::models::ImagePrompt;
use crate::domain::models::InlineImage;
use crate::domain::models::StructuredPrompt;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Structured {
        text: String,
        schema: serde_json::Value,
    },
    Image {
        text: String,
        aspect_ratio: String,
    },
    Chat {
        system_instruction: Option<String>,
        text: String,
        backend_context: String,
    },
}

/// In-memory backend that records every request it receives.
#[derive(Default)]
pub struct FakeBackend {
    strategy: Option<String>,
    strategy_error: bool,
    failing_images: Vec<String>,
    chat_reply: Option<String>,
    chat_error: bool,
    image_counter: AtomicUsize,
    calls: Mutex<Vec<Call>>,
}

impl FakeBackend {
    pub fn with_strategy(strategy: &str) -> FakeBackend {
        return FakeBackend {
            strategy: Some(strategy.to_string()),
            chat_reply: Some("Happy to help!".to_string()),
            ..Default::default()
        };
    }

    pub fn failing_strategy(mut self) -> FakeBackend {
        self.strategy_error = true;
        return self;
    }

    /// Image requests for this prompt come back without image data.
    pub fn failing_image(mut self, prompt: &str) -> FakeBackend {
        self.failing_images.push(prompt.to_string());
        return self;
    }

    pub fn chat_reply(mut self, reply: Option<&str>) -> FakeBackend {
        self.chat_reply = reply.map(|reply| return reply.to_string());
        return self;
    }

    pub fn failing_chat(mut self) -> FakeBackend {
        self.chat_error = true;
        return self;
    }

    pub fn shared(self) -> Arc<FakeBackend> {
        return Arc::new(self);
    }

    pub fn calls(&self) -> Vec<Call> {
        return self.calls.lock().unwrap().clone();
    }

    pub fn image_prompts(&self) -> Vec<String> {
        return self
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Image { text, .. } => return Some(text),
                _ => return None,
            })
            .collect();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn as_backend(fake: &Arc<FakeBackend>) -> BackendBox {
    return fake.clone();
}

#[async_trait]
impl Backend for FakeBackend {
    async fn health_check(&self) -> Result<()> {
        return Ok(());
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        return Ok(vec!["models/fake".to_string()]);
    }

    async fn generate_structured(&self, prompt: StructuredPrompt) -> Result<Option<String>> {
        self.record(Call::Structured {
            text: prompt.text,
            schema: prompt.schema,
        });
        if self.strategy_error {
            bail!("connection reset");
        }

        return Ok(self.strategy.clone());
    }

    async fn generate_image(&self, prompt: ImagePrompt) -> Result<Option<InlineImage>> {
        self.record(Call::Image {
            text: prompt.text.to_string(),
            aspect_ratio: prompt.aspect_ratio,
        });
        if self.failing_images.contains(&prompt.text) {
            return Ok(None);
        }

        // Every render differs, like the real service.
        let n = self.image_counter.fetch_add(1, Ordering::SeqCst);
        return Ok(Some(InlineImage {
            mime_type: "image/png".to_string(),
            data: STANDARD.encode(format!("{n}:{}", prompt.text)),
        }));
    }

    async fn get_chat_completion(&self, prompt: ChatPrompt) -> Result<ChatResponse> {
        self.record(Call::Chat {
            system_instruction: prompt.system_instruction,
            text: prompt.text.to_string(),
            backend_context: prompt.backend_context.to_string(),
        });
        if self.chat_error {
            bail!("connection reset");
        }

        return Ok(ChatResponse {
            text: self.chat_reply.clone(),
            context: format!("{}|{}", prompt.backend_context, prompt.text),
        });
    }
}
