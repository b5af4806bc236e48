#[cfg(test)]
#[path = "strategy_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::domain::models::Artifact;
use crate::domain::models::BackendBox;
use crate::domain::models::BrandError;
use crate::domain::models::BrandStrategy;
use crate::domain::models::Mission;
use crate::domain::models::StructuredPrompt;

pub const PALETTE_SIZE: usize = 5;

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r"^#([0-9a-fA-F]{6}|[0-9a-fA-F]{3})$").unwrap());

pub fn strategy_prompt(mission: &Mission) -> String {
    return format!(
        r#"You are a world-class Brand Identity Expert.
Analyze the following company mission statement and create a cohesive brand identity foundation.

MISSION:
"{mission}"

Generate:
1. A {PALETTE_SIZE}-color palette (Hex codes, creative names, usage notes).
2. A typography pairing using Google Fonts (Header + Body).
3. Detailed image generation prompts for a Primary Logo and a Secondary Mark. The prompts should be descriptive enough for a high-quality image generator.
4. A brief description of the brand voice."#,
        mission = mission.as_str()
    );
}

/// Response schema in the generative service's OpenAPI subset. Mirrors
/// `BrandStrategy`.
pub fn strategy_schema() -> serde_json::Value {
    return json!({
        "type": "OBJECT",
        "properties": {
            "colors": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "hex": { "type": "STRING", "description": "Hex color code e.g. #FF5733" },
                        "name": { "type": "STRING", "description": "Creative name for the color" },
                        "usage": { "type": "STRING", "description": "When to use this color (Primary, Accent, Background)" },
                    },
                    "required": ["hex", "name", "usage"],
                },
            },
            "typography": {
                "type": "OBJECT",
                "properties": {
                    "headerFont": { "type": "STRING", "description": "Name of a popular Google Font for headers" },
                    "bodyFont": { "type": "STRING", "description": "Name of a popular Google Font for body text" },
                    "reasoning": { "type": "STRING", "description": "Why this pairing fits the brand" },
                },
                "required": ["headerFont", "bodyFont", "reasoning"],
            },
            "logoPrompts": {
                "type": "OBJECT",
                "properties": {
                    "primary": { "type": "STRING", "description": "A highly detailed, artistic image generation prompt for the primary logo. Mention style, colors, and key symbols." },
                    "secondary": { "type": "STRING", "description": "A detailed image generation prompt for a simplified secondary mark or icon." },
                },
                "required": ["primary", "secondary"],
            },
            "brandVoice": {
                "type": "STRING",
                "description": "A short description of the brand's personality and voice.",
            },
        },
        "required": ["colors", "typography", "logoPrompts"],
    });
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        bail!(format!("{field} is empty"));
    }

    return Ok(());
}

/// Parses the structured response and checks it against the contract.
/// Hex codes come back upper cased.
pub fn parse_strategy(text: &str) -> Result<BrandStrategy> {
    let mut strategy: BrandStrategy = serde_json::from_str(text.trim())?;

    if strategy.colors.is_empty() {
        bail!("palette has no colors");
    }
    for (idx, color) in strategy.colors.iter_mut().enumerate() {
        let hex = color.hex.trim();
        if !HEX_COLOR.is_match(hex) {
            bail!(format!("color {} has an invalid hex code '{hex}'", idx + 1));
        }
        color.hex = hex.to_uppercase();
        require_text(&format!("color {} name", idx + 1), &color.name)?;
    }

    require_text("typography.headerFont", &strategy.typography.header_font)?;
    require_text("typography.bodyFont", &strategy.typography.body_font)?;
    require_text("logoPrompts.primary", &strategy.logo_prompts.primary)?;
    require_text("logoPrompts.secondary", &strategy.logo_prompts.secondary)?;

    if strategy.colors.len() != PALETTE_SIZE {
        tracing::warn!(
            colors = strategy.colors.len(),
            "Strategy palette differs from the requested size"
        );
    }

    return Ok(strategy);
}

pub struct StrategyGenerator {
    backend: BackendBox,
}

impl StrategyGenerator {
    pub fn new(backend: BackendBox) -> StrategyGenerator {
        return StrategyGenerator { backend };
    }

    pub async fn generate(&self, mission: &Mission) -> Result<BrandStrategy, BrandError> {
        let prompt = StructuredPrompt {
            text: strategy_prompt(mission),
            schema: strategy_schema(),
        };

        let text = self
            .backend
            .generate_structured(prompt)
            .await
            .map_err(|err| return BrandError::generation(Artifact::Strategy, err))?;

        let text = match text {
            Some(text) => text,
            None => {
                return Err(BrandError::generation(
                    Artifact::Strategy,
                    "No response from strategy generation",
                ));
            }
        };

        return parse_strategy(&text).map_err(|err| {
            tracing::error!(error = %err, "Strategy response failed validation");
            return BrandError::generation(
                Artifact::Strategy,
                format!("response did not match the strategy schema: {err}"),
            );
        });
    }
}
