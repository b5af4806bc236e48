#[cfg(test)]
#[path = "images_test.rs"]
mod tests;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::domain::models::BackendBox;
use crate::domain::models::BrandError;
use crate::domain::models::ImagePrompt;
use crate::domain::models::InlineImage;
use crate::domain::models::LogoSlot;

pub const SQUARE_ASPECT_RATIO: &str = "1:1";
const DEFAULT_MIME_TYPE: &str = "image/png";

/// Turns inline image data into something usable directly as an image
/// source.
pub fn to_data_uri(image: &InlineImage) -> String {
    let mut mime_type = image.mime_type.trim();
    if mime_type.is_empty() {
        mime_type = DEFAULT_MIME_TYPE;
    }

    return format!("data:{mime_type};base64,{}", image.data);
}

/// Decoded payload size of a data URI, `None` for anything else.
pub fn data_uri_size(uri: &str) -> Option<usize> {
    let (_, data) = uri.strip_prefix("data:")?.split_once(";base64,")?;
    return STANDARD.decode(data).ok().map(|bytes| return bytes.len());
}

pub struct ImageGenerator {
    backend: BackendBox,
}

impl ImageGenerator {
    pub fn new(backend: BackendBox) -> ImageGenerator {
        return ImageGenerator { backend };
    }

    /// Renders a fresh square image. Identical prompts are not expected to
    /// produce identical images.
    pub async fn generate(&self, slot: LogoSlot, prompt: &str) -> Result<String, BrandError> {
        if prompt.trim().is_empty() {
            return Err(BrandError::Validation(format!(
                "The {} prompt is empty.",
                slot.artifact()
            )));
        }

        let image = self
            .backend
            .generate_image(ImagePrompt {
                text: prompt.to_string(),
                aspect_ratio: SQUARE_ASPECT_RATIO.to_string(),
            })
            .await
            .map_err(|err| return BrandError::generation(slot.artifact(), err))?;

        let image = match image {
            Some(image) => image,
            None => {
                return Err(BrandError::generation(
                    slot.artifact(),
                    "Failed to generate image",
                ));
            }
        };

        if STANDARD.decode(&image.data).is_err() {
            return Err(BrandError::generation(
                slot.artifact(),
                "image payload is not valid base64",
            ));
        }

        tracing::debug!(slot = %slot, mime_type = %image.mime_type, "Rendered image");

        return Ok(to_data_uri(&image));
    }
}
