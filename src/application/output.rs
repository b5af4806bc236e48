#[cfg(test)]
#[path = "output_test.rs"]
mod tests;

use anyhow::Result;
use strum::EnumString;
use strum::EnumVariantNames;
use yansi::Color;
use yansi::Paint;

use crate::domain::models::BrandIdentity;
use crate::domain::models::ChatMessage;
use crate::domain::models::LogoSlot;
use crate::domain::models::Role;
use crate::domain::services::data_uri_size;

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumString, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().strip_prefix('#')?;
    if !digits.is_ascii() {
        return None;
    }
    let expanded = match digits.len() {
        3 => digits.chars().flat_map(|c| return [c, c]).collect::<String>(),
        6 => digits.to_string(),
        _ => return None,
    };

    let channel = |idx: usize| return u8::from_str_radix(&expanded[idx..idx + 2], 16).ok();
    return Some((channel(0)?, channel(2)?, channel(4)?));
}

fn swatch(hex: &str) -> String {
    if let Some((r, g, b)) = hex_to_rgb(hex) {
        return Paint::new("■■").fg(Color::RGB(r, g, b)).to_string();
    }

    return "  ".to_string();
}

pub fn describe_image(uri: Option<&str>) -> String {
    let uri = match uri {
        Some(uri) => uri,
        None => return Paint::new("not rendered").dimmed().to_string(),
    };

    let mime_type = uri
        .strip_prefix("data:")
        .and_then(|rest| return rest.split(';').next())
        .unwrap_or("image");
    match data_uri_size(uri) {
        Some(size) => return format!("{mime_type}, {size} bytes"),
        None => return uri.to_string(),
    }
}

fn slot_title(slot: LogoSlot) -> &'static str {
    match slot {
        LogoSlot::Primary => return "Primary logo",
        LogoSlot::Secondary => return "Secondary mark",
    }
}

pub fn identity_text(identity: &BrandIdentity) -> String {
    let mut lines = vec![
        Paint::new("Mission").bold().to_string(),
        format!("  {}", identity.mission.as_str()),
    ];

    if let Some(strategy) = &identity.strategy {
        lines.push("".to_string());
        lines.push(Paint::new("Palette").bold().to_string());
        for color in strategy.colors.iter() {
            lines.push(format!(
                "  {} {}  {} ({})",
                swatch(&color.hex),
                color.hex,
                color.name,
                color.usage
            ));
        }

        lines.push("".to_string());
        lines.push(Paint::new("Typography").bold().to_string());
        lines.push(format!(
            "  {} / {}",
            strategy.typography.header_font, strategy.typography.body_font
        ));
        lines.push(format!("  {}", strategy.typography.reasoning));

        if let Some(voice) = &strategy.brand_voice {
            lines.push("".to_string());
            lines.push(Paint::new("Brand voice").bold().to_string());
            lines.push(format!("  {voice}"));
        }
    }

    lines.push("".to_string());
    lines.push(Paint::new("Logos").bold().to_string());
    for slot in [LogoSlot::Primary, LogoSlot::Secondary] {
        lines.push(format!(
            "  {}: {}",
            slot_title(slot),
            describe_image(identity.logo(slot))
        ));
    }

    return lines.join("\n");
}

pub fn render_identity(identity: &BrandIdentity, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => return Ok(identity_text(identity)),
        OutputFormat::Json => return Ok(serde_json::to_string_pretty(identity)?),
        OutputFormat::Yaml => return Ok(serde_yaml::to_string(identity)?),
    }
}

pub fn chat_line(message: &ChatMessage) -> String {
    let author = match message.role {
        Role::User => Paint::cyan("You").bold().to_string(),
        Role::Model => Paint::magenta("Assistant").bold().to_string(),
    };

    return format!(
        "{} {author}: {}",
        Paint::new(message.time_label()).dimmed(),
        message.text
    );
}
