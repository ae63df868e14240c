use serde::{Deserialize, Serialize};
use std::fmt;

use super::style::AdStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    #[default]
    Square,
    Landscape,
    Portrait,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 3] = [
        AspectRatio::Square,
        AspectRatio::Landscape,
        AspectRatio::Portrait,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "square",
            AspectRatio::Landscape => "landscape",
            AspectRatio::Portrait => "portrait",
        }
    }

    /// Output size in pixels as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            AspectRatio::Square => (1024, 1024),
            AspectRatio::Landscape => (1344, 768),
            AspectRatio::Portrait => (768, 1344),
        }
    }

    /// Ratio notation, e.g. `16:9`.
    pub fn ratio(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/generate`.
///
/// `product_image` is optional on the wire so that a missing image is
/// reported as a validation error rather than a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<AdStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
}

impl GenerationRequest {
    pub fn new(product_image: impl Into<String>) -> Self {
        Self {
            product_image: Some(product_image.into()),
            ..Default::default()
        }
    }

    pub fn with_style(mut self, style: AdStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_custom_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.custom_prompt = Some(prompt.into());
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(aspect_ratio);
        self
    }

    /// The product image, treating an empty string as absent.
    pub fn product_image(&self) -> Option<&str> {
        self.product_image.as_deref().filter(|image| !image.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl GenerationResponse {
    pub fn success(image_url: impl Into<String>, request_id: Option<String>) -> Self {
        Self {
            success: true,
            image_url: Some(image_url.into()),
            error: None,
            request_id,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            image_url: None,
            error: Some(error.into()),
            request_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let request: GenerationRequest = serde_json::from_value(json!({
            "productImage": "data:image/png;base64,AAAA",
            "customPrompt": "on a beach",
            "aspectRatio": "landscape"
        }))
        .unwrap();

        assert_eq!(request.product_image(), Some("data:image/png;base64,AAAA"));
        assert_eq!(request.custom_prompt.as_deref(), Some("on a beach"));
        assert_eq!(request.aspect_ratio, Some(AspectRatio::Landscape));
        assert!(request.style.is_none());
    }

    #[test]
    fn test_missing_and_empty_image() {
        let request: GenerationRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.product_image().is_none());

        let request = GenerationRequest::new("");
        assert!(request.product_image().is_none());
    }

    #[test]
    fn test_unknown_aspect_ratio_is_rejected() {
        let parsed = serde_json::from_value::<GenerationRequest>(json!({
            "productImage": "x",
            "aspectRatio": "panorama"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_response_omits_empty_fields() {
        let value = serde_json::to_value(GenerationResponse::failure("nope")).unwrap();
        assert_eq!(value, json!({ "success": false, "error": "nope" }));

        let value = serde_json::to_value(GenerationResponse::success(
            "https://cdn.example/ad.png",
            Some("req-1".into()),
        ))
        .unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "imageUrl": "https://cdn.example/ad.png",
                "requestId": "req-1"
            })
        );
    }

    #[test]
    fn test_aspect_ratio_helpers() {
        assert_eq!(AspectRatio::Landscape.dimensions(), (1344, 768));
        assert_eq!(AspectRatio::Portrait.ratio(), "9:16");
        assert_eq!(AspectRatio::Square.to_string(), "square");
        assert_eq!(AspectRatio::default(), AspectRatio::Square);
    }
}
