use crate::models::{AdStyle, AspectRatio, GenerationRequest};

pub const BASE_INSTRUCTION: &str = "Create a beautiful advertisement for this product. ";
pub const FALLBACK_STYLE: &str =
    "modern clean design, professional product presentation, marketing advertisement";

/// Composes the provider prompt. A non-empty custom prompt wins over the
/// style preset, which wins over the generic fallback.
pub fn build_prompt(
    custom_prompt: Option<&str>,
    style: Option<&AdStyle>,
    aspect_ratio: Option<AspectRatio>,
) -> String {
    let mut prompt = String::from(BASE_INSTRUCTION);

    match (custom_prompt.filter(|p| !p.is_empty()), style) {
        (Some(custom), _) => prompt.push_str(custom),
        (None, style) => {
            prompt.push_str(style.and_then(AdStyle::resolved_fragment).unwrap_or(FALLBACK_STYLE))
        }
    }

    if let Some(ratio) = aspect_ratio {
        prompt.push_str(&format!(", {} aspect ratio", ratio));
    }

    prompt
}

impl GenerationRequest {
    pub fn prompt(&self) -> String {
        build_prompt(
            self.custom_prompt.as_deref(),
            self.style.as_ref(),
            self.aspect_ratio,
        )
    }
}
