//! Gatekeeper configuration

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use spamgate_domain::KeywordSet;
use spamgate_extractor::{ExtractorConfig, ToolConfig};
use spamgate_llm::chat::{
    DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS, DEFAULT_VISION_MODEL,
};
use spamgate_llm::{ProviderSettings, OPENAI_CHAT_COMPLETIONS_URL};
use std::path::Path;
use std::time::Duration;

/// Keywords used when none are configured explicitly
pub const DEFAULT_SPAM_KEYWORDS: &str = "viagra, casino, lottery, winner, click here, buy now, \
limited offer, earn money fast, work from home, make money online, free money, get paid, amazing offer";

/// Close-reason template used when none is configured explicitly
pub const DEFAULT_CLOSE_REASON: &str =
    "This ticket has been automatically closed as spam based on content analysis.";

/// Which chat-completions endpoint to talk to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiProvider {
    /// The official OpenAI endpoint; `api_url` is ignored
    #[default]
    OpenAi,
    /// Any OpenAI-compatible endpoint given by `api_url`
    Custom,
}

/// Configuration for spam triage
///
/// Every field has a default, so a config file only needs the values it
/// changes.
///
/// # Examples
///
/// ```
/// use spamgate_gatekeeper::SpamGateConfig;
///
/// let config = SpamGateConfig::from_toml(r#"
///     api_key = "sk-live"
///     spam_keywords = "casino; lottery"
///     auto_close = false
/// "#).unwrap();
///
/// assert_eq!(config.model, "gpt-4o-mini");
/// assert_eq!(config.keywords().len(), 2);
/// assert!(config.is_ai_configured());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpamGateConfig {
    /// Endpoint selection
    pub api_provider: ApiProvider,

    /// Bearer token; AI classification is disabled when blank
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Endpoint URL for the `custom` provider
    pub api_url: String,

    /// Classification model
    pub model: String,

    /// Model used for image text extraction
    pub vision_model: String,

    /// HTTP request timeout (seconds)
    pub timeout_secs: u64,

    /// Sampling temperature for classification (0.0-2.0)
    pub temperature: f64,

    /// Raw keyword list, separated by `,` or `;`
    pub spam_keywords: String,

    /// Text placed in the note written when a ticket is closed
    pub close_reason: String,

    /// Run the close flow automatically for new tickets
    pub auto_close: bool,

    /// Verbose diagnostics (debug info in results, payload logging)
    pub enable_logging: bool,

    /// Attachments above this size (megabytes) are skipped
    pub max_file_size_mb: u64,

    /// External decoder programs
    pub tools: ToolConfig,
}

impl Default for SpamGateConfig {
    fn default() -> Self {
        Self {
            api_provider: ApiProvider::OpenAi,
            api_key: String::new(),
            api_url: String::new(),
            model: DEFAULT_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: DEFAULT_TEMPERATURE,
            spam_keywords: DEFAULT_SPAM_KEYWORDS.to_string(),
            close_reason: DEFAULT_CLOSE_REASON.to_string(),
            auto_close: true,
            enable_logging: false,
            max_file_size_mb: 10,
            tools: ToolConfig::default(),
        }
    }
}

impl SpamGateConfig {
    /// Analysis without automatic closing of new tickets
    pub fn review_only() -> Self {
        Self {
            auto_close: false,
            ..Self::default()
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the raw keyword list
    pub fn with_spam_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.spam_keywords = keywords.into();
        self
    }

    /// Enable or disable verbose diagnostics
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Enable or disable automatic closing of new tickets
    pub fn with_auto_close(mut self, enabled: bool) -> Self {
        self.auto_close = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be greater than 0".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".to_string()));
        }
        if self.vision_model.trim().is_empty() {
            return Err(ConfigError::Invalid("vision_model must not be empty".to_string()));
        }
        if self.api_provider == ApiProvider::Custom && self.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "api_url is required when api_provider is \"custom\"".to_string(),
            ));
        }
        self.extractor_config().validate().map_err(ConfigError::Invalid)
    }

    /// Load configuration from TOML string and validate it
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file and validate it
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Serialize configuration to TOML (the API key is left out)
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parsed keyword list
    pub fn keywords(&self) -> KeywordSet {
        KeywordSet::parse(&self.spam_keywords)
    }

    /// Whether an API key is present
    pub fn is_ai_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Endpoint the classifier talks to
    pub fn effective_api_url(&self) -> &str {
        match self.api_provider {
            ApiProvider::OpenAi => OPENAI_CHAT_COMPLETIONS_URL,
            ApiProvider::Custom => self.api_url.trim(),
        }
    }

    /// Provider settings, `None` when no API key is configured
    pub fn provider_settings(&self) -> Option<ProviderSettings> {
        if !self.is_ai_configured() {
            return None;
        }
        Some(
            ProviderSettings::new(self.api_key.trim())
                .with_api_url(self.effective_api_url())
                .with_model(self.model.trim())
                .with_vision_model(self.vision_model.trim())
                .with_temperature(self.temperature)
                .with_timeout(Duration::from_secs(self.timeout_secs))
                .with_payload_logging(self.enable_logging),
        )
    }

    /// Settings for the content extractor
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig::default()
            .with_max_file_size_mb(self.max_file_size_mb)
            .with_tools(self.tools.clone())
    }
}
