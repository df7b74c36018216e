use crate::error::{AnalyzerError, Result};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Where requests go and how they are authenticated.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Build a config from the environment, failing early when no key is set.
    pub fn from_env() -> Result<Self> {
        let api_key = validate_api_key()?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("VIDSIGHT_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var("VIDSIGHT_MODEL") {
            config.model = model;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub(crate) fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Validate that an API key is set
pub fn validate_api_key() -> Result<String> {
    API_KEY_ENV_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|key| !key.trim().is_empty()))
        .ok_or_else(|| AnalyzerError::MissingApiKey {
            env_vars: API_KEY_ENV_VARS.join(", "),
        })
}
