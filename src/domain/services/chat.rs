#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;

use crate::domain::models::Artifact;
use crate::domain::models::BackendBox;
use crate::domain::models::BrandError;
use crate::domain::models::BrandStrategy;
use crate::domain::models::ChatMessage;
use crate::domain::models::ChatPrompt;
use crate::domain::models::Role;

pub const GENERIC_INSTRUCTION: &str = "You are a helpful Brand Identity Assistant.";
pub const EMPTY_REPLY: &str = "I'm having trouble thinking of a response right now.";
pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

pub fn system_instruction(strategy: Option<&BrandStrategy>) -> String {
    let strategy = match strategy {
        Some(strategy) => strategy,
        None => return GENERIC_INSTRUCTION.to_string(),
    };

    let colors = strategy
        .colors
        .iter()
        .map(|color| return color.name.as_str())
        .collect::<Vec<&str>>()
        .join(", ");
    let voice = strategy.brand_voice.as_deref().unwrap_or("not specified");

    return [
        "You are the Brand Assistant for a company with the following identity:".to_string(),
        format!("Colors: {colors}."),
        format!(
            "Fonts: {} & {}.",
            strategy.typography.header_font, strategy.typography.body_font
        ),
        format!("Voice: {voice}"),
        "Help the user refine their brand, suggest marketing copy, or explain design choices."
            .to_string(),
    ]
    .join("\n");
}

/// One conversation with the brand assistant. Every `init` starts a new
/// conversation, so both the remote history and the transcript are reset.
pub struct ChatSession {
    backend: BackendBox,
    system_instruction: Option<String>,
    backend_context: String,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(backend: BackendBox) -> ChatSession {
        return ChatSession {
            backend,
            system_instruction: None,
            backend_context: "".to_string(),
            messages: vec![],
        };
    }

    /// Starts over with a new system instruction. Previous turns are dropped
    /// from both the remote history and the transcript.
    pub fn init(&mut self, strategy: Option<&BrandStrategy>) {
        self.system_instruction = Some(system_instruction(strategy));
        self.backend_context = "".to_string();
        self.messages.clear();
        tracing::debug!(seeded = strategy.is_some(), "Chat session initialized");
    }

    pub fn is_initialized(&self) -> bool {
        return self.system_instruction.is_some();
    }

    pub fn system_instruction(&self) -> Option<&str> {
        return self.system_instruction.as_deref();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        return &self.messages;
    }

    pub async fn send_message(&mut self, text: &str) -> Result<String, BrandError> {
        if text.trim().is_empty() {
            return Err(BrandError::Validation("Type a message first.".to_string()));
        }
        if !self.is_initialized() {
            self.init(None);
        }

        self.messages.push(ChatMessage::new(Role::User, text));

        let prompt = ChatPrompt::new(
            self.system_instruction.clone(),
            text,
            &self.backend_context,
        );
        let res = match self.backend.get_chat_completion(prompt).await {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = %err, "Chat request failed");
                self.messages.push(ChatMessage::new(Role::Model, APOLOGY));
                return Err(BrandError::generation(Artifact::ChatReply, err));
            }
        };

        self.backend_context = res.context;
        let reply = res
            .text
            .filter(|reply| return !reply.trim().is_empty())
            .unwrap_or_else(|| return EMPTY_REPLY.to_string());
        self.messages.push(ChatMessage::new(Role::Model, &reply));

        return Ok(reply);
    }

    /// Like `send_message`, but failures turn into a canned apology.
    pub async fn reply(&mut self, text: &str) -> String {
        match self.send_message(text).await {
            Ok(reply) => return reply,
            Err(BrandError::Validation(msg)) => return msg,
            Err(_) => return APOLOGY.to_string(),
        }
    }
}
