//! Attribute extraction from a query image.
//!
//! [`AttributeExtractor`] is the seam between the pipeline and the vision
//! model; the production implementation is [`VisionExtractor`], and tests
//! substitute a stub. Extraction sends a strict-JSON prompt, optionally
//! scoped to a crop region expressed in absolute pixels.

use async_trait::async_trait;
use cura_core::attributes::VisualAttributes;
use cura_core::crop::{CropRect, PixelRect};

use crate::client::{VisionClient, VisionError};
use crate::probe;

/// One extraction request: a fetchable image URL plus an optional
/// normalized crop rectangle (already validated by the API layer).
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub image_url: String,
    pub crop: Option<CropRect>,
}

/// Turns a query image into structured attributes.
#[async_trait]
pub trait AttributeExtractor: Send + Sync {
    async fn extract(&self, request: &ExtractionRequest) -> Result<VisualAttributes, VisionError>;
}

/// Production extractor backed by the configured vision endpoint.
pub struct VisionExtractor {
    client: VisionClient,
}

impl VisionExtractor {
    pub fn new(client: VisionClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AttributeExtractor for VisionExtractor {
    async fn extract(&self, request: &ExtractionRequest) -> Result<VisualAttributes, VisionError> {
        // The model only understands absolute pixels, so a crop costs one
        // extra fetch to learn the image's native dimensions.
        let region = match request.crop {
            Some(crop) => {
                let bytes = self.client.fetch_image(&request.image_url).await?;
                let (width, height) = probe::native_dimensions(&bytes)?;
                Some(crop.to_pixel_bounds(width, height))
            }
            None => None,
        };

        let prompt = build_extraction_prompt(region.as_ref());
        let reply = self
            .client
            .describe_image(&request.image_url, &prompt)
            .await?;

        tracing::debug!(
            model = self.client.model(),
            reply_len = reply.len(),
            "Received vision reply"
        );
        parse_attributes(&reply)
    }
}

/// Build the extraction prompt, optionally scoped to a pixel region.
pub fn build_extraction_prompt(region: Option<&PixelRect>) -> String {
    let mut prompt = String::from(
        "You are a fashion expert analyzing a garment photo for visual \
         similarity search. ",
    );

    if let Some(r) = region {
        prompt.push_str(&format!(
            "Analyze ONLY the item inside the pixel region x={}, y={}, \
             width={}, height={} of the image; ignore everything outside it. ",
            r.x, r.y, r.width, r.height
        ));
    }

    prompt.push_str(
        "Respond with a single JSON object and nothing else, using exactly \
         these keys (omit a key when not visible): \
         item_type, category, fabric_type, fabric_texture, \
         primary_colors (array, most prominent first), pattern, silhouette, \
         sleeve_type, neckline_collar, length, era, aesthetic, \
         distinctive_features (array), text_description, \
         search_queries (object with primary, fallback, keywords array). \
         Use lowercase descriptors. text_description is 1-2 sentences. \
         search_queries.primary is the best resale search query for this \
         exact item.",
    );
    prompt
}

/// Parse the model's reply into attributes.
///
/// Models wrap JSON in markdown fences often enough that the fence is
/// stripped before parsing. Replies with no matchable signal are rejected
/// so a bad extraction fails the session instead of silently matching
/// nothing.
pub fn parse_attributes(reply: &str) -> Result<VisualAttributes, VisionError> {
    let body = strip_code_fence(reply);
    let attributes: VisualAttributes = serde_json::from_str(body)
        .map_err(|e| VisionError::MalformedReply(format!("{e}: {body:.200}")))?;
    if !attributes.is_scorable() {
        return Err(VisionError::Unscorable);
    }
    Ok(attributes)
}

/// Strip a surrounding markdown code fence (with or without a language
/// tag), returning the inner text.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
