#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Backend;
use crate::domain::models::ChatPrompt;
use crate::domain::models::ChatResponse;
use crate::domain::models::ImagePrompt;
use crate::domain::models::InlineImage;
use crate::domain::models::StructuredPrompt;

// The API key travels as a header, never in the URL.
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Model {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ModelListResponse {
    #[serde(default)]
    models: Vec<Model>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentPartsBlob {
    mime_type: String,
    data: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentParts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<ContentPartsBlob>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

impl ContentParts {
    fn text(text: &str) -> ContentParts {
        return ContentParts {
            text: Some(text.to_string()),
            ..Default::default()
        };
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    role: String,
    #[serde(default)]
    parts: Vec<ContentParts>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompletionRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<serde_json::Value>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Content,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    finish_reason: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn parts(&self) -> &[ContentParts] {
        return self
            .candidates
            .first()
            .map(|candidate| return candidate.content.parts.as_slice())
            .unwrap_or_default();
    }

    /// Joined text of the first candidate, skipping thought summaries.
    fn text(&self) -> Option<String> {
        let text = self
            .parts()
            .iter()
            .filter(|part| return !part.thought.unwrap_or(false))
            .filter_map(|part| return part.text.as_deref())
            .collect::<Vec<&str>>()
            .join("");

        if text.trim().is_empty() {
            return None;
        }

        return Some(text);
    }

    fn inline_image(&self) -> Option<InlineImage> {
        return self
            .parts()
            .iter()
            .filter_map(|part| return part.inline_data.as_ref())
            .find(|blob| return !blob.data.is_empty())
            .map(|blob| {
                return InlineImage {
                    mime_type: blob.mime_type.to_string(),
                    data: blob.data.to_string(),
                };
            });
    }

    fn finish_reason(&self) -> String {
        return self
            .candidates
            .first()
            .and_then(|candidate| return candidate.finish_reason.clone())
            .unwrap_or_default();
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorDetails {
    #[serde(default)]
    message: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorResponse {
    error: ErrorDetails,
}

fn model_path(model: &str) -> String {
    if model.starts_with("models/") {
        return model.to_string();
    }

    return format!("models/{model}");
}

pub struct Gemini {
    url: String,
    token: String,
    timeout: String,
    strategy_model: String,
    image_model: String,
    chat_model: String,
    strategy_max_tokens: String,
    strategy_thinking_budget: String,
}

impl Default for Gemini {
    fn default() -> Gemini {
        return Gemini {
            url: Config::get(ConfigKey::GeminiURL),
            token: Config::get(ConfigKey::GeminiToken),
            timeout: Config::get(ConfigKey::RequestTimeout),
            strategy_model: Config::get(ConfigKey::StrategyModel),
            image_model: Config::get(ConfigKey::ImageModel),
            chat_model: Config::get(ConfigKey::ChatModel),
            strategy_max_tokens: Config::get(ConfigKey::StrategyMaxTokens),
            strategy_thinking_budget: Config::get(ConfigKey::StrategyThinkingBudget),
        };
    }
}

impl Gemini {
    fn timeout(&self) -> Result<Duration> {
        return Ok(Duration::from_millis(self.timeout.parse::<u64>()?));
    }

    async fn generate_content(
        &self,
        model: &str,
        req: &CompletionRequest,
    ) -> Result<GenerateContentResponse> {
        tracing::debug!(model = model, "Sending generate content request to Gemini");

        let res = reqwest::Client::new()
            .post(format!(
                "{url}/v1beta/{model}:generateContent",
                url = self.url,
                model = model_path(model),
            ))
            .header(API_KEY_HEADER, &self.token)
            .timeout(self.timeout()?)
            .json(req)
            .send()
            .await
            .map_err(|err| return err.without_url())?;

        let status = res.status().as_u16();
        if !res.status().is_success() {
            let body = res.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|err| return err.error.message)
                .unwrap_or_default();

            tracing::error!(
                status = status,
                model = model,
                message = message.as_str(),
                "Failed to make generate content request to Gemini"
            );
            if message.is_empty() {
                bail!(format!("Gemini returned status {status}"));
            }
            bail!(format!("Gemini returned status {status}: {message}"));
        }

        let payload = res
            .json::<GenerateContentResponse>()
            .await
            .map_err(|err| return err.without_url())?;

        return Ok(payload);
    }
}

#[async_trait]
impl Backend for Gemini {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if self.url.is_empty() {
            bail!("Gemini URL is not defined");
        }
        if self.token.is_empty() {
            bail!("Gemini token is not defined. Set it with --gemini-token or LUMINA_GEMINI_TOKEN");
        }

        let res = reqwest::Client::new()
            .get(format!(
                "{url}/v1beta/{model}",
                url = self.url,
                model = model_path(&self.strategy_model),
            ))
            .header(API_KEY_HEADER, &self.token)
            .timeout(self.timeout()?)
            .send()
            .await;

        let status = match res {
            Ok(res) => res.status().as_u16(),
            Err(err) => {
                tracing::error!(error = ?err.without_url(), "Gemini is not reachable");
                bail!("Gemini is not reachable");
            }
        };
        if status >= 400 {
            tracing::error!(status = status, "Gemini health check failed");
            bail!(format!("Gemini health check failed with status {status}"));
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn list_models(&self) -> Result<Vec<String>> {
        let res = reqwest::Client::new()
            .get(format!("{url}/v1beta/models", url = self.url))
            .header(API_KEY_HEADER, &self.token)
            .timeout(self.timeout()?)
            .send()
            .await
            .map_err(|err| return err.without_url())?
            .json::<ModelListResponse>()
            .await
            .map_err(|err| return err.without_url())?;

        let mut models: Vec<String> = res
            .models
            .iter()
            .filter(|model| {
                return model
                    .supported_generation_methods
                    .contains(&"generateContent".to_string());
            })
            .map(|model| {
                return model.name.to_string();
            })
            .collect();

        models.sort();

        return Ok(models);
    }

    #[allow(clippy::implicit_return)]
    async fn generate_structured(&self, prompt: StructuredPrompt) -> Result<Option<String>> {
        let req = CompletionRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![ContentParts::text(&prompt.text)],
            }],
            system_instruction: None,
            generation_config: Some(serde_json::json!({
                "responseMimeType": "application/json",
                "responseSchema": prompt.schema,
                "maxOutputTokens": self.strategy_max_tokens.parse::<u32>()?,
                "thinkingConfig": {
                    "thinkingBudget": self.strategy_thinking_budget.parse::<u32>()?,
                },
            })),
        };

        let res = self.generate_content(&self.strategy_model, &req).await?;
        let text = res.text();
        if text.is_none() {
            tracing::warn!(
                finish_reason = res.finish_reason(),
                "Gemini returned no text for structured request"
            );
        }

        return Ok(text);
    }

    #[allow(clippy::implicit_return)]
    async fn generate_image(&self, prompt: ImagePrompt) -> Result<Option<InlineImage>> {
        let req = CompletionRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![ContentParts::text(&prompt.text)],
            }],
            system_instruction: None,
            generation_config: Some(serde_json::json!({
                "imageConfig": {
                    "aspectRatio": prompt.aspect_ratio,
                },
            })),
        };

        let res = self.generate_content(&self.image_model, &req).await?;
        let image = res.inline_image();
        if image.is_none() {
            tracing::warn!(
                finish_reason = res.finish_reason(),
                "Gemini returned no image data"
            );
        }

        return Ok(image);
    }

    #[allow(clippy::implicit_return)]
    async fn get_chat_completion(&self, prompt: ChatPrompt) -> Result<ChatResponse> {
        let mut contents: Vec<Content> = vec![];
        if !prompt.backend_context.is_empty() {
            contents = serde_json::from_str(&prompt.backend_context)?;
        }
        contents.push(Content {
            role: "user".to_string(),
            parts: vec![ContentParts::text(&prompt.text)],
        });

        let req = CompletionRequest {
            contents: contents.clone(),
            system_instruction: prompt.system_instruction.map(|instruction| {
                return Content {
                    role: "".to_string(),
                    parts: vec![ContentParts::text(&instruction)],
                };
            }),
            generation_config: None,
        };

        let res = self.generate_content(&self.chat_model, &req).await?;
        let text = res.text();

        // Only complete exchanges make it into the history.
        let context = match &text {
            Some(reply) => {
                contents.push(Content {
                    role: "model".to_string(),
                    parts: vec![ContentParts::text(reply)],
                });
                serde_json::to_string(&contents)?
            }
            None => prompt.backend_context,
        };

        return Ok(ChatResponse { text, context });
    }
}
