use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A named visual aesthetic and the prompt fragment that describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdStyle {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "prompt", alias = "promptFragment")]
    pub prompt_fragment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl AdStyle {
    fn preset(id: &str, name: &str, description: &str, prompt_fragment: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            prompt_fragment: prompt_fragment.to_string(),
            preview: None,
        }
    }

    /// The fragment to put in a prompt. A style sent by id alone resolves
    /// through the built-in catalog.
    pub fn resolved_fragment(&self) -> Option<&str> {
        if !self.prompt_fragment.trim().is_empty() {
            return Some(&self.prompt_fragment);
        }
        find_style(&self.id).map(|preset| preset.prompt_fragment.as_str())
    }
}

pub static DEFAULT_AD_STYLES: Lazy<Vec<AdStyle>> = Lazy::new(|| {
    vec![
        AdStyle::preset(
            "modern-minimal",
            "Modern Minimal",
            "Clean, modern design with plenty of white space",
            "modern minimal clean design, white background, professional product photography, high-end luxury feel, simple typography",
        ),
        AdStyle::preset(
            "vibrant-colorful",
            "Vibrant & Colorful",
            "Bold, eye-catching colors and dynamic composition",
            "vibrant colorful background, dynamic composition, bold colors, energetic feel, modern graphics, eye-catching design",
        ),
        AdStyle::preset(
            "elegant-luxury",
            "Elegant Luxury",
            "Sophisticated and premium aesthetic",
            "luxury elegant design, premium feel, sophisticated lighting, gold accents, high-end product presentation, refined aesthetics",
        ),
        AdStyle::preset(
            "retro-vintage",
            "Retro Vintage",
            "Nostalgic vintage-inspired design",
            "retro vintage style, nostalgic feel, classic typography, warm color palette, aged texture, timeless design",
        ),
        AdStyle::preset(
            "tech-futuristic",
            "Tech Futuristic",
            "Cutting-edge technology aesthetic",
            "futuristic tech design, digital elements, neon accents, modern technology feel, sleek interface, innovative presentation",
        ),
        AdStyle::preset(
            "natural-organic",
            "Natural Organic",
            "Earth-friendly, natural, and organic feel",
            "natural organic design, earth tones, sustainable feel, nature-inspired elements, eco-friendly aesthetic, green lifestyle",
        ),
    ]
});

/// The built-in catalog, in display order.
pub fn default_styles() -> &'static [AdStyle] {
    &DEFAULT_AD_STYLES
}

pub fn find_style(id: &str) -> Option<&'static AdStyle> {
    DEFAULT_AD_STYLES.iter().find(|style| style.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_six_unique_presets() {
        let styles = default_styles();
        assert_eq!(styles.len(), 6);

        let ids: HashSet<_> = styles.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), 6);
        assert!(styles.iter().all(|s| !s.prompt_fragment.is_empty()));
    }

    #[test]
    fn test_find_style() {
        let style = find_style("retro-vintage").unwrap();
        assert_eq!(style.name, "Retro Vintage");
        assert!(find_style("brutalist").is_none());
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(find_style("modern-minimal").unwrap()).unwrap();
        assert!(json.get("prompt").is_some());
        assert!(json.get("preview").is_none());

        let parsed: AdStyle = serde_json::from_str(
            r#"{"id":"x","name":"X","description":"d","promptFragment":"shiny"}"#,
        )
        .unwrap();
        assert_eq!(parsed.prompt_fragment, "shiny");
    }

    #[test]
    fn test_style_by_id_only() {
        let parsed: AdStyle = serde_json::from_str(r#"{"id":"modern-minimal"}"#).unwrap();
        assert!(parsed.prompt_fragment.is_empty());
        assert_eq!(
            parsed.resolved_fragment(),
            Some(find_style("modern-minimal").unwrap().prompt_fragment.as_str())
        );

        let unknown: AdStyle = serde_json::from_str(r#"{"id":"brutalist"}"#).unwrap();
        assert_eq!(unknown.resolved_fragment(), None);
    }
}
