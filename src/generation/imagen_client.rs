use crate::{
    config::{ProviderConfig, ProviderKind},
    error::{AdGenError, Result},
    generation::{ImageProvider, ProviderImage, ProviderOutput, ProviderRequest},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const IMAGEN_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const IMAGEN_MODEL: &str = "imagen-4.0-generate-001";

/// Google Imagen text-to-image. The product photo is not sent: the
/// `:predict` endpoint only takes a prompt.
#[derive(Clone)]
pub struct ImagenClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct ImagenRequest<'a> {
    instances: [ImagenInstance<'a>; 1],
    parameters: ImagenParameters,
}

#[derive(Debug, Serialize)]
struct ImagenInstance<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImagenParameters {
    sample_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
pub struct ImagenResponse {
    #[serde(default)]
    pub predictions: Vec<ImagenPrediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagenPrediction {
    pub bytes_base64_encoded: Option<String>,
    pub mime_type: Option<String>,
}

impl ImagenClient {
    pub fn new(api_key: String, config: &ProviderConfig) -> Self {
        let base_url = config.base_url.as_deref().unwrap_or(IMAGEN_BASE_URL);
        let model = config.model.as_deref().unwrap_or(IMAGEN_MODEL);

        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: format!("{}/models/{}:predict", base_url.trim_end_matches('/'), model),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_payload<'a>(request: &ProviderRequest<'a>) -> ImagenRequest<'a> {
        ImagenRequest {
            instances: [ImagenInstance {
                prompt: request.prompt,
            }],
            parameters: ImagenParameters {
                sample_count: 1,
                aspect_ratio: request.aspect_ratio.map(|ratio| ratio.ratio()),
            },
        }
    }

    /// First prediction carrying image bytes, as an inline image.
    pub fn normalize(response: ImagenResponse) -> Result<ProviderOutput> {
        let prediction = response
            .predictions
            .into_iter()
            .find(|p| p.bytes_base64_encoded.is_some())
            .ok_or_else(|| AdGenError::ResponseError("No image in Imagen response".into()))?;

        Ok(ProviderOutput {
            image: ProviderImage::Inline {
                mime_type: prediction
                    .mime_type
                    .unwrap_or_else(|| "image/png".to_string()),
                base64: prediction.bytes_base64_encoded.unwrap_or_default(),
            },
            request_id: None,
        })
    }
}

#[async_trait]
impl ImageProvider for ImagenClient {
    async fn generate(&self, request: &ProviderRequest<'_>) -> Result<ProviderOutput> {
        let payload = Self::build_payload(request);
        log::info!("Generating image with Imagen: {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AdGenError::ProviderError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Google Imagen API error ({}): {}", status, body);
            return Err(AdGenError::ProviderError(format!(
                "Imagen returned {}",
                status
            )));
        }

        let body: ImagenResponse = response
            .json()
            .await
            .map_err(|e| AdGenError::ResponseError(e.to_string()))?;

        Self::normalize(body)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Imagen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AspectRatio;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ImagenClient {
        let config = ProviderConfig::new(ProviderKind::Imagen).with_base_url(server.uri());
        ImagenClient::new("test-key".into(), &config)
    }

    #[test]
    fn test_default_endpoint() {
        let client = ImagenClient::new("k".into(), &ProviderConfig::new(ProviderKind::Imagen));
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/imagen-4.0-generate-001:predict"
        );
    }

    #[test]
    fn test_payload_shape() {
        let request = ProviderRequest {
            prompt: "a shoe",
            product_image: "data:image/png;base64,AAAA",
            aspect_ratio: Some(AspectRatio::Landscape),
        };
        let value = serde_json::to_value(ImagenClient::build_payload(&request)).unwrap();
        assert_eq!(
            value,
            json!({
                "instances": [{ "prompt": "a shoe" }],
                "parameters": { "sampleCount": 1, "aspectRatio": "16:9" }
            })
        );

        let request = ProviderRequest {
            aspect_ratio: None,
            ..request
        };
        let value = serde_json::to_value(ImagenClient::build_payload(&request)).unwrap();
        assert!(value["parameters"].get("aspectRatio").is_none());
    }

    #[test]
    fn test_normalize_without_predictions() {
        let response: ImagenResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            ImagenClient::normalize(response),
            Err(AdGenError::ResponseError(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_returns_inline_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/imagen-4.0-generate-001:predict"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_json(json!({
                "instances": [{ "prompt": "a bottle" }],
                "parameters": { "sampleCount": 1, "aspectRatio": "1:1" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "predictions": [{ "bytesBase64Encoded": "iVBORw0K", "mimeType": "image/png" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let output = client_for(&server)
            .generate(&ProviderRequest {
                prompt: "a bottle",
                product_image: "data:image/png;base64,AAAA",
                aspect_ratio: Some(AspectRatio::Square),
            })
            .await
            .unwrap();

        assert_eq!(output.image.into_image_url(), "data:image/png;base64,iVBORw0K");
        assert!(output.request_id.is_none());
    }

    #[tokio::test]
    async fn test_non_success_status_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate(&ProviderRequest {
                prompt: "a bottle",
                product_image: "x",
                aspect_ratio: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AdGenError::ProviderError(_)));
        assert!(!err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_response_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate(&ProviderRequest {
                prompt: "p",
                product_image: "x",
                aspect_ratio: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AdGenError::ResponseError(_)));
    }
}
