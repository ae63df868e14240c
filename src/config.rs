use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::AdGenError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// The external image-generation service a deployment talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    Imagen,
    Fal,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Imagen => "imagen",
            ProviderKind::Fal => "fal",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            ProviderKind::Imagen => "GEMINI_API_KEY",
            ProviderKind::Fal => "FAL_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = AdGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "imagen" | "google" | "gemini" => Ok(ProviderKind::Imagen),
            "fal" | "fal-ai" | "flux" => Ok(ProviderKind::Fal),
            other => Err(AdGenError::ConfigError(format!(
                "Unknown provider '{}', expected 'imagen' or 'fal'",
                other
            ))),
        }
    }
}

#[derive(Clone, Default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

// Hand-written so the key never reaches a log line.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(kind: ProviderKind) -> Self {
        ProviderConfig {
            kind,
            ..Default::default()
        }
    }

    /// Reads `ADGEN_PROVIDER` and the matching key variable. An unknown
    /// provider name falls back to the default with a warning.
    pub fn from_env() -> Self {
        let kind = match env::var("ADGEN_PROVIDER") {
            Ok(raw) => raw.parse().unwrap_or_else(|e: AdGenError| {
                log::warn!("{}; falling back to {}", e, ProviderKind::default());
                ProviderKind::default()
            }),
            Err(_) => ProviderKind::default(),
        };
        let api_key = env::var(kind.api_key_var())
            .ok()
            .filter(|key| !key.trim().is_empty());

        ProviderConfig {
            kind,
            api_key,
            base_url: None,
            model: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub json_logs: bool,
    pub provider: ProviderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            json_logs: false,
            provider: ProviderConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let json_logs = env::var("ADGEN_LOG_JSON")
            .ok()
            .map_or(false, |val| val == "true");

        Config {
            host,
            port,
            json_logs,
            provider: ProviderConfig::from_env(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.provider = provider;
        self
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
