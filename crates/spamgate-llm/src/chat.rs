//! Chat-completions provider
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint.
//!
//! # Features
//!
//! - Blocking HTTP with a configurable timeout, one attempt per call
//! - Bearer-token authentication
//! - JSON-mode classification requests
//! - Vision requests for text extraction from images
//! - Optional mirroring of request/response bodies to the `spamgate_llm::wire`
//!   log target
//!
//! # Examples
//!
//! ```no_run
//! use spamgate_llm::{ChatCompletionsProvider, ProviderSettings};
//!
//! let settings = ProviderSettings::new("sk-...").with_model("gpt-4o-mini");
//! let provider = ChatCompletionsProvider::new(settings).unwrap();
//! ```

use crate::parser::parse_verdict;
use crate::prompt::{SpamPromptBuilder, CLASSIFIER_SYSTEM_PROMPT, OCR_SYSTEM_PROMPT, OCR_USER_PROMPT};
use crate::LlmError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use spamgate_domain::traits::SpamClassifier;
use spamgate_domain::{ClassificationVerdict, KeywordSet};
use std::time::Duration;
use tracing::debug;

/// OpenAI chat-completions endpoint
pub const OPENAI_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model for classification
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default vision-capable model for image text extraction
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o";

/// Default timeout for API requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// Image MIME types accepted by the vision model
pub const SUPPORTED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

const WIRE_TARGET: &str = "spamgate_llm::wire";

/// Whether the vision model accepts this MIME type
pub fn is_supported_image_type(mime_type: &str) -> bool {
    let mime_type = mime_type.trim().to_ascii_lowercase();
    SUPPORTED_IMAGE_TYPES.contains(&mime_type.as_str())
}

/// Connection and model settings for [`ChatCompletionsProvider`]
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Full URL of the chat-completions endpoint
    pub api_url: String,

    /// Bearer token
    pub api_key: String,

    /// Model used for classification
    pub model: String,

    /// Model used for image text extraction
    pub vision_model: String,

    /// Sampling temperature
    pub temperature: f64,

    /// Per-request timeout
    pub timeout: Duration,

    /// Mirror request/response bodies to the wire log target
    pub log_payloads: bool,
}

impl ProviderSettings {
    /// Settings for the OpenAI endpoint with default models
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: OPENAI_CHAT_COMPLETIONS_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_payloads: false,
        }
    }

    /// Use a different endpoint
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Use a different classification model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use a different vision model
    pub fn with_vision_model(mut self, vision_model: impl Into<String>) -> Self {
        self.vision_model = vision_model.into();
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable payload logging
    pub fn with_payload_logging(mut self, enabled: bool) -> Self {
        self.log_payloads = enabled;
        self
    }
}

/// Chat-completions API provider
pub struct ChatCompletionsProvider {
    settings: ProviderSettings,
    client: Client,
}

/// Request body for the chat-completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

/// Successful response from the chat-completions API
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Error body returned with non-200 responses
#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

impl ChatMessage {
    fn system(text: &str) -> Self {
        Self {
            role: "system",
            content: MessageContent::Text(text.to_string()),
        }
    }

    fn user(text: String) -> Self {
        Self {
            role: "user",
            content: MessageContent::Text(text),
        }
    }
}

impl ChatCompletionsProvider {
    /// Create a new provider
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] when the API key or URL is blank or the
    /// HTTP client cannot be built.
    pub fn new(settings: ProviderSettings) -> Result<Self, LlmError> {
        if settings.api_key.trim().is_empty() {
            return Err(LlmError::Config("API key is empty".to_string()));
        }
        if settings.api_url.trim().is_empty() {
            return Err(LlmError::Config("API URL is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            settings: ProviderSettings {
                api_key: settings.api_key.trim().to_string(),
                ..settings
            },
            client,
        })
    }

    /// Settings this provider was built with
    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// POST one chat-completions request and return `choices[0].message.content`
    fn send(&self, request: &ChatRequest<'_>) -> Result<String, LlmError> {
        let body = serde_json::to_string(request)?;

        if self.settings.log_payloads {
            debug!(target: WIRE_TARGET, body = %body, "API request");
        }

        let response = self
            .client
            .post(&self.settings.api_url)
            .bearer_auth(&self.settings.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| LlmError::Communication(format!("Failed to read response: {}", e)))?;

        if self.settings.log_payloads {
            debug!(target: WIRE_TARGET, status = status.as_u16(), body = %text, "API response");
        }

        if status != StatusCode::OK {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
                .ok()
                .and_then(|envelope| envelope.error.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ChatResponse = serde_json::from_str(&text)
            .map_err(|_| LlmError::InvalidResponse("Invalid API response format".to_string()))?;

        envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("Invalid API response format".to_string()))
    }
}

impl SpamClassifier for ChatCompletionsProvider {
    type Error = LlmError;

    fn classify_spam(
        &self,
        content: &str,
        known_keywords: &KeywordSet,
    ) -> Result<ClassificationVerdict, Self::Error> {
        let prompt = SpamPromptBuilder::new(content)
            .with_known_keywords(known_keywords)
            .build();

        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage::system(CLASSIFIER_SYSTEM_PROMPT), ChatMessage::user(prompt)],
            temperature: self.settings.temperature,
            response_format: Some(ResponseFormat { kind: "json_object" }),
        };

        debug!(model = %self.settings.model, content_len = content.len(), "Requesting spam classification");

        let answer = self.send(&request)?;

        parse_verdict(&answer)
    }

    fn extract_text(&self, image: &[u8], mime_type: &str) -> Result<String, Self::Error> {
        if !is_supported_image_type(mime_type) {
            return Err(LlmError::UnsupportedImageType(mime_type.to_string()));
        }

        let data_url = format!(
            "data:{};base64,{}",
            mime_type.trim().to_ascii_lowercase(),
            STANDARD.encode(image)
        );

        let request = ChatRequest {
            model: &self.settings.vision_model,
            messages: vec![
                ChatMessage::system(OCR_SYSTEM_PROMPT),
                ChatMessage {
                    role: "user",
                    content: MessageContent::Parts(vec![
                        ContentPart::Text {
                            text: OCR_USER_PROMPT.to_string(),
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl { url: data_url },
                        },
                    ]),
                },
            ],
            temperature: self.settings.temperature,
            response_format: None,
        };

        debug!(model = %self.settings.vision_model, image_bytes = image.len(), "Requesting image text extraction");

        self.send(&request)
    }
}
