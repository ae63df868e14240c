//! Upload checks shared by the session controller and the generate handler.

use crate::error::{AdGenError, Result};
use crate::reader::decode_data_url;

pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

pub const MSG_UNSUPPORTED_TYPE: &str = "Please upload a JPEG, PNG, or WebP image.";
pub const MSG_TOO_LARGE: &str = "File size must be less than 10MB.";
pub const MSG_UNREADABLE_IMAGE: &str = "The image data could not be read.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileValidation {
    pub valid: bool,
    pub error: Option<String>,
}

impl FileValidation {
    fn accept() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn reject(reason: &str) -> Self {
        Self {
            valid: false,
            error: Some(reason.to_string()),
        }
    }

    pub fn into_result(self) -> Result<()> {
        match self.error {
            Some(reason) if !self.valid => Err(AdGenError::ValidationError(reason)),
            _ => Ok(()),
        }
    }
}

pub fn is_allowed_type(mime_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&mime_type)
}

/// Checks a declared MIME type and byte size. Type is checked first.
pub fn validate_image_file(mime_type: &str, size: u64) -> FileValidation {
    if !is_allowed_type(mime_type) {
        return FileValidation::reject(MSG_UNSUPPORTED_TYPE);
    }
    if size > MAX_IMAGE_BYTES {
        return FileValidation::reject(MSG_TOO_LARGE);
    }
    FileValidation::accept()
}

/// Applies [`validate_image_file`] to an inline image. Inputs that are not
/// data URLs (remote URLs, bare base64) are left to the provider.
pub fn validate_product_image(product_image: &str) -> Result<()> {
    if !product_image.starts_with("data:") {
        return Ok(());
    }
    let data_url = decode_data_url(product_image)
        .map_err(|_| AdGenError::ValidationError(MSG_UNREADABLE_IMAGE.to_string()))?;
    validate_image_file(&data_url.mime_type, data_url.data.len() as u64).into_result()
}

/// Human-readable size, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::encode_data_url;

    #[test]
    fn test_allowed_types_within_limit() {
        for mime in ALLOWED_IMAGE_TYPES {
            assert!(validate_image_file(mime, 0).valid);
            assert!(validate_image_file(mime, 512 * 1024).valid);
            assert!(validate_image_file(mime, MAX_IMAGE_BYTES).valid);
        }
    }

    #[test]
    fn test_rejects_oversized_files() {
        let result = validate_image_file("image/png", MAX_IMAGE_BYTES + 1);
        assert!(!result.valid);
        assert_eq!(result.error.as_deref(), Some(MSG_TOO_LARGE));
    }

    #[test]
    fn test_rejects_disallowed_types() {
        for mime in ["image/gif", "image/svg+xml", "application/pdf", "", "IMAGE/PNG"] {
            let result = validate_image_file(mime, 10);
            assert!(!result.valid, "{} should be rejected", mime);
            assert_eq!(result.error.as_deref(), Some(MSG_UNSUPPORTED_TYPE));
        }
    }

    #[test]
    fn test_type_checked_before_size() {
        let result = validate_image_file("image/gif", MAX_IMAGE_BYTES * 2);
        assert_eq!(result.error.as_deref(), Some(MSG_UNSUPPORTED_TYPE));
    }

    #[test]
    fn test_into_result() {
        assert!(validate_image_file("image/webp", 1).into_result().is_ok());
        let err = validate_image_file("text/plain", 1).into_result().unwrap_err();
        assert!(matches!(err, AdGenError::ValidationError(_)));
    }

    #[test]
    fn test_validate_product_image() {
        let png = encode_data_url("image/png", b"\x89PNG\r\n\x1a\nrest");
        assert!(validate_product_image(&png).is_ok());

        let gif = encode_data_url("image/gif", b"GIF89a");
        assert!(validate_product_image(&gif).is_err());

        assert!(matches!(
            validate_product_image(&gif),
            Err(AdGenError::ValidationError(msg)) if msg == MSG_UNSUPPORTED_TYPE
        ));

        assert!(matches!(
            validate_product_image("data:image/png;base64,***"),
            Err(AdGenError::ValidationError(msg)) if msg == MSG_UNREADABLE_IMAGE
        ));
        assert!(validate_product_image("https://cdn.example/shoe.png").is_ok());
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(500), "500 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(MAX_IMAGE_BYTES), "10 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }
}
