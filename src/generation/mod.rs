pub mod fal_client;
pub mod imagen_client;

use crate::{
    config::{ProviderConfig, ProviderKind},
    error::{AdGenError, Result, MSG_API_KEY_MISSING, MSG_IMAGE_REQUIRED},
    logger,
    models::{AspectRatio, GenerationRequest, GenerationResponse},
    validation::validate_product_image,
};
use async_trait::async_trait;
use std::sync::Arc;

pub use fal_client::FalClient;
pub use imagen_client::ImagenClient;

/// What a provider receives: the composed prompt plus the raw inputs it may
/// need for provider-specific parameters.
#[derive(Debug, Clone, Copy)]
pub struct ProviderRequest<'a> {
    pub prompt: &'a str,
    pub product_image: &'a str,
    pub aspect_ratio: Option<AspectRatio>,
}

/// Where a provider put the generated image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderImage {
    /// Base64 payload returned in the response body.
    Inline { mime_type: String, base64: String },
    /// URL to an image hosted by the provider.
    Remote { url: String },
}

impl ProviderImage {
    pub fn into_image_url(self) -> String {
        match self {
            ProviderImage::Inline { mime_type, base64 } => {
                format!("data:{};base64,{}", mime_type, base64)
            }
            ProviderImage::Remote { url } => url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOutput {
    pub image: ProviderImage,
    pub request_id: Option<String>,
}

#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// One outbound call, no retries.
    async fn generate(&self, request: &ProviderRequest<'_>) -> Result<ProviderOutput>;

    fn kind(&self) -> ProviderKind;
}

#[derive(Clone)]
pub struct GenerationClient {
    provider: Option<Arc<dyn ImageProvider>>,
}

impl GenerationClient {
    /// Builds the configured provider. Without an API key the client is still
    /// constructed, and every call reports a configuration error.
    pub fn new(config: ProviderConfig) -> Self {
        let provider: Option<Arc<dyn ImageProvider>> = match config.api_key.clone() {
            Some(api_key) => {
                let provider: Arc<dyn ImageProvider> = match config.kind {
                    ProviderKind::Imagen => Arc::new(ImagenClient::new(api_key, &config)),
                    ProviderKind::Fal => Arc::new(FalClient::new(api_key, &config)),
                };
                Some(provider)
            }
            None => {
                log::warn!(
                    "{} is not set; generation requests will fail until it is configured",
                    config.kind.api_key_var()
                );
                None
            }
        };

        Self { provider }
    }

    pub fn with_provider(provider: Arc<dyn ImageProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn unconfigured() -> Self {
        Self { provider: None }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_kind(&self) -> Option<ProviderKind> {
        self.provider.as_ref().map(|p| p.kind())
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| AdGenError::ConfigError(MSG_API_KEY_MISSING.into()))?;

        let product_image = request
            .product_image()
            .ok_or_else(|| AdGenError::ValidationError(MSG_IMAGE_REQUIRED.into()))?;
        validate_product_image(product_image)?;

        let prompt = request.prompt();
        log::debug!("Composed prompt: {}", prompt);

        let provider_request = ProviderRequest {
            prompt: &prompt,
            product_image,
            aspect_ratio: request.aspect_ratio,
        };

        let output = {
            let _timer = logger::timer(&format!("{} generation", provider.kind()));
            provider.generate(&provider_request).await?
        };

        Ok(GenerationResponse::success(
            output.image.into_image_url(),
            output.request_id,
        ))
    }

    /// Like [`generate`](Self::generate), with errors folded into the uniform
    /// response shape. Returns the HTTP status alongside.
    pub async fn respond(&self, request: &GenerationRequest) -> (u16, GenerationResponse) {
        match self.generate(request).await {
            Ok(response) => (200, response),
            Err(e) => {
                log::error!("Generation error: {}", e);
                (e.http_status(), GenerationResponse::failure(e.public_message()))
            }
        }
    }
}
