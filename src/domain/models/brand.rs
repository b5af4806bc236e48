#[cfg(test)]
#[path = "brand_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumIter;
use strum::EnumString;
use strum::EnumVariantNames;

use super::Artifact;
use super::BrandError;

/// Free text describing a company. Only non-blank missions can be
/// constructed, the original text is kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mission(String);

impl Mission {
    pub fn parse(text: &str) -> Result<Mission, BrandError> {
        if text.trim().is_empty() {
            return Err(BrandError::Validation(
                "Describe your company mission before generating an identity.".to_string(),
            ));
        }

        return Ok(Mission(text.to_string()));
    }

    pub fn as_str(&self) -> &str {
        return &self.0;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub hex: String,
    pub name: String,
    pub usage: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub header_font: String,
    pub body_font: String,
    pub reasoning: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoPrompts {
    pub primary: String,
    pub secondary: String,
}

impl LogoPrompts {
    pub fn get(&self, slot: LogoSlot) -> &str {
        match slot {
            LogoSlot::Primary => return &self.primary,
            LogoSlot::Secondary => return &self.secondary,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandStrategy {
    pub colors: Vec<Color>,
    pub typography: Typography,
    pub logo_prompts: LogoPrompts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_voice: Option<String>,
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, EnumString, EnumVariantNames, strum::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum LogoSlot {
    Primary,
    Secondary,
}

impl LogoSlot {
    pub fn artifact(&self) -> Artifact {
        match self {
            LogoSlot::Primary => return Artifact::PrimaryLogo,
            LogoSlot::Secondary => return Artifact::SecondaryMark,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandIdentity {
    pub mission: Mission,
    pub strategy: Option<BrandStrategy>,
    pub primary_logo_url: Option<String>,
    pub secondary_mark_url: Option<String>,
}

impl BrandIdentity {
    pub fn new(mission: Mission) -> BrandIdentity {
        return BrandIdentity {
            mission,
            strategy: None,
            primary_logo_url: None,
            secondary_mark_url: None,
        };
    }

    pub fn logo(&self, slot: LogoSlot) -> Option<&str> {
        let url = match slot {
            LogoSlot::Primary => &self.primary_logo_url,
            LogoSlot::Secondary => &self.secondary_mark_url,
        };

        return url.as_deref();
    }

    /// Swaps the image of a single slot, leaving everything else as is.
    pub fn replace_logo(&mut self, slot: LogoSlot, url: String) {
        match slot {
            LogoSlot::Primary => self.primary_logo_url = Some(url),
            LogoSlot::Secondary => self.secondary_mark_url = Some(url),
        }
    }

    pub fn is_complete(&self) -> bool {
        return self.strategy.is_some()
            && self.primary_logo_url.is_some()
            && self.secondary_mark_url.is_some();
    }
}
