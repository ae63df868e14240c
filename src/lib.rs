//! Product-photo advertisement generator: style presets, prompt building,
//! upload handling and a thin proxy to one image-generation provider.

pub mod config;
pub mod controller;
pub mod error;
pub mod generation;
pub mod logger;
pub mod models;
pub mod prompt;
pub mod reader;
#[cfg(feature = "server")]
pub mod server;
pub mod validation;

pub use config::{Config, ProviderConfig, ProviderKind};
pub use controller::{AdSession, GenerateApi, HttpGenerateApi, SelectionMode};
pub use error::{AdGenError, Result};
pub use generation::{
    FalClient, GenerationClient, ImageProvider, ImagenClient, ProviderImage, ProviderOutput,
    ProviderRequest,
};
pub use models::{
    default_styles, find_style, AdStyle, AspectRatio, GenerationRequest, GenerationResponse,
    UploadedFile,
};
pub use prompt::build_prompt;
pub use reader::{FileReader, PendingRead};
pub use validation::{format_file_size, validate_image_file, FileValidation};
