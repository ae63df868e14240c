use thiserror::Error;

pub const MSG_API_KEY_MISSING: &str = "API key not configured";
pub const MSG_IMAGE_REQUIRED: &str = "Product image is required";
pub const MSG_GENERATION_FAILED: &str = "Failed to generate image";
pub const MSG_INTERNAL: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum AdGenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Provider error: {0}")]
    ProviderError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("File read error: {0}")]
    FileReadError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AdGenError {
    /// HTTP status used when this error leaves the `/api/generate` boundary.
    pub fn http_status(&self) -> u16 {
        match self {
            AdGenError::ValidationError(_) => 400,
            _ => 500,
        }
    }

    /// The short message returned to callers. Provider and internal details
    /// stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AdGenError::ConfigError(_) => MSG_API_KEY_MISSING.to_string(),
            AdGenError::ValidationError(msg) => msg.clone(),
            AdGenError::ProviderError(_) | AdGenError::ResponseError(_) => {
                MSG_GENERATION_FAILED.to_string()
            }
            _ => MSG_INTERNAL.to_string(),
        }
    }
}

impl From<serde_json::Error> for AdGenError {
    fn from(e: serde_json::Error) -> Self {
        AdGenError::SerializationError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AdGenError>;
