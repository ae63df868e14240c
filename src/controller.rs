//! Headless state for one ad-generation session: what the user picked, what
//! came back, and what went wrong.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Path, PathBuf};

use crate::{
    error::{AdGenError, Result},
    generation::GenerationClient,
    models::{AdStyle, AspectRatio, GenerationRequest, GenerationResponse, UploadedFile},
    reader::{decode_data_url, load_upload},
};

pub const MSG_GENERATE_FAILED: &str = "Failed to generate ad";
pub const MSG_UNEXPECTED: &str = "An unexpected error occurred. Please try again.";
pub const MSG_READ_FAILED: &str = "Could not read the selected file. Please try again.";

/// Whatever answers `POST /api/generate`.
#[async_trait]
pub trait GenerateApi: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse>;
}

/// Talks to a running server over HTTP.
#[derive(Clone)]
pub struct HttpGenerateApi {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGenerateApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/generate", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerateApi for HttpGenerateApi {
    /// Error statuses still carry a JSON body in the uniform shape, so the
    /// body is decoded regardless of status.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| AdGenError::RequestError(e.to_string()))?;

        response
            .json::<GenerationResponse>()
            .await
            .map_err(|e| AdGenError::ResponseError(e.to_string()))
    }
}

/// In-process use, without a server in between.
#[async_trait]
impl GenerateApi for GenerationClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        Ok(self.respond(request).await.1)
    }
}

/// Preset styles and a custom prompt are alternatives; switching clears the
/// other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    Preset,
    Custom,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdSession {
    file: Option<UploadedFile>,
    style: Option<AdStyle>,
    custom_prompt: String,
    aspect_ratio: AspectRatio,
    mode: SelectionMode,
    generated_image: Option<String>,
    is_generating: bool,
    error: Option<String>,
}

impl AdSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    pub fn style(&self) -> Option<&AdStyle> {
        self.style.as_ref()
    }

    pub fn custom_prompt(&self) -> &str {
        &self.custom_prompt
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn generated_image(&self) -> Option<&str> {
        self.generated_image.as_deref()
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn select_file(&mut self, file: Option<UploadedFile>) {
        self.file = file;
        self.error = None;
    }

    /// Validates and reads `path`. A failure is kept in [`error`](Self::error)
    /// and the current selection is left as it was.
    pub async fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.error = None;
        match load_upload(path).await {
            Ok(upload) => {
                log::info!("Selected {} ({})", upload.name, upload.display_size());
                self.file = Some(upload);
                Ok(())
            }
            Err(e) => {
                log::warn!("Upload rejected: {}", e);
                self.error = Some(match &e {
                    AdGenError::ValidationError(reason) => reason.clone(),
                    _ => MSG_READ_FAILED.to_string(),
                });
                Err(e)
            }
        }
    }

    pub fn select_style(&mut self, style: Option<AdStyle>) {
        self.style = style;
    }

    pub fn set_custom_prompt(&mut self, prompt: impl Into<String>) {
        self.custom_prompt = prompt.into();
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: AspectRatio) {
        self.aspect_ratio = aspect_ratio;
    }

    pub fn set_mode(&mut self, mode: SelectionMode) {
        if mode == self.mode {
            return;
        }
        match mode {
            SelectionMode::Custom => self.style = None,
            SelectionMode::Preset => self.custom_prompt.clear(),
        }
        self.mode = mode;
    }

    fn has_custom_prompt(&self) -> bool {
        !self.custom_prompt.trim().is_empty()
    }

    pub fn can_generate(&self) -> bool {
        self.file.is_some() && (self.style.is_some() || self.has_custom_prompt())
    }

    /// The request `generate` would send, if the session is generatable.
    pub fn build_request(&self) -> Option<GenerationRequest> {
        if !self.can_generate() {
            return None;
        }
        let file = self.file.as_ref()?;
        let request =
            GenerationRequest::new(file.preview.clone()).with_aspect_ratio(self.aspect_ratio);

        Some(if self.has_custom_prompt() {
            request.with_custom_prompt(self.custom_prompt.clone())
        } else {
            match &self.style {
                Some(style) => request.with_style(style.clone()),
                None => request,
            }
        })
    }

    /// Sends the current selections. `&mut self` keeps a session to one
    /// request at a time.
    pub async fn generate<A>(&mut self, api: &A)
    where
        A: GenerateApi + ?Sized,
    {
        let Some(request) = self.build_request() else {
            return;
        };

        self.is_generating = true;
        self.error = None;
        self.generated_image = None;

        match api.generate(&request).await {
            Ok(GenerationResponse {
                success: true,
                image_url: Some(image_url),
                ..
            }) if !image_url.is_empty() => {
                log::info!("Ad generated");
                self.generated_image = Some(image_url);
            }
            Ok(response) => {
                self.error = Some(
                    response
                        .error
                        .unwrap_or_else(|| MSG_GENERATE_FAILED.to_string()),
                );
            }
            Err(e) => {
                log::error!("Generation error: {}", e);
                self.error = Some(MSG_UNEXPECTED.to_string());
            }
        }

        self.is_generating = false;
    }

    /// Saves the generated image into `dir` as `generated-ad-<millis>.png`.
    pub async fn download(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let image = self
            .generated_image
            .as_deref()
            .ok_or_else(|| AdGenError::ValidationError("No generated image to download".into()))?;

        let bytes = if image.starts_with("data:") {
            decode_data_url(image)?.data
        } else if image.starts_with("http://") || image.starts_with("https://") {
            fetch_image(image).await?
        } else {
            STANDARD
                .decode(image)
                .map_err(|e| AdGenError::SerializationError(e.to_string()))?
        };

        let path = dir.as_ref().join(format!(
            "generated-ad-{}.png",
            chrono::Utc::now().timestamp_millis()
        ));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AdGenError::InternalError(format!("{}: {}", path.display(), e)))?;

        log::info!("💾 Saved ad to {}", path.display());
        Ok(path)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

async fn fetch_image(url: &str) -> Result<Vec<u8>> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| AdGenError::RequestError(e.to_string()))?;
    if !response.status().is_success() {
        return Err(AdGenError::RequestError(format!(
            "download returned {}",
            response.status()
        )));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| AdGenError::RequestError(e.to_string()))?;
    Ok(bytes.to_vec())
}
