//! Configuration (layered: code > env > `.env` file).

use std::fmt;

use crate::error::ConduitError;
use crate::types::GenerationSettings;

/// Model used for every completion request.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Output token ceiling for every completion request.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

const API_KEY_ENV: &str = "OPENAI_API_KEY";
const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Runtime configuration for the backend.
#[derive(Clone, Default)]
pub struct ConduitConfig {
    api_key: Option<String>,
    base_url: Option<String>,
}

impl fmt::Debug for ConduitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConduitConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ConduitConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from environment variables (`OPENAI_API_KEY`, `OPENAI_BASE_URL`).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Self {
            api_key: non_empty(API_KEY_ENV),
            base_url: non_empty(BASE_URL_ENV),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Resolve the backend credential or fail before anything is spawned.
    pub fn require_api_key(&self) -> Result<&str, ConduitError> {
        self.api_key().ok_or_else(|| {
            ConduitError::Configuration(format!(
                "{API_KEY_ENV} environment variable not set. Add it to your .env file."
            ))
        })
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn model(&self) -> &'static str {
        DEFAULT_MODEL
    }

    /// Settings applied to every completion request.
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings::builder()
            .max_tokens(DEFAULT_MAX_TOKENS)
            .build()
    }
}
